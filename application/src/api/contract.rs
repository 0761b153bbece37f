//! [`Contract`]-related definitions.

use common::{Date, DateTime, Money, Percent};
use derive_more::{Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Rental [`Contract`] binding a tenant to a property.
#[derive(Clone, Debug, From)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// [`domain::Contract`] representing this [`Contract`].
    contract: OnceCell<domain::Contract>,
}

impl From<domain::Contract> for Contract {
    fn from(contract: domain::Contract) -> Self {
        Self {
            id: contract.id.into(),
            contract: OnceCell::new_with(Some(contract)),
        }
    }
}

impl Contract {
    /// Creates a new [`Contract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Contract`] with the provided ID exists,
    /// otherwise accessing this [`Contract`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            contract: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Contract`] representing this [`Contract`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Contract`] doesn't exist.
    async fn contract(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Contract, Error> {
        let id = self.id.into();
        self.contract
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ContractError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Rental `Contract` binding a tenant to a property.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Property` rented under this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.property",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn property(
        &self,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let id = self.contract(ctx).await?.property_id;
        #[expect(
            unsafe_code,
            reason = "foreign key guarantees `Property` existence"
        )]
        Ok(unsafe { api::Property::new_unchecked(id) })
    }

    /// Tenant `Client` renting under this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.tenant",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tenant(&self, ctx: &Context) -> Result<api::Client, Error> {
        let id = self.contract(ctx).await?.tenant_id;
        #[expect(
            unsafe_code,
            reason = "foreign key guarantees `Client` existence"
        )]
        Ok(unsafe { api::Client::new_unchecked(id) })
    }

    /// First day this `Contract` is in force.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.startsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn starts_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.starts_on)
    }

    /// Last day this `Contract` is in force.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.endsOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ends_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.contract(ctx).await?.ends_on)
    }

    /// Monthly rent at the moment this `Contract` was signed.
    ///
    /// `Payment`s scheduled after an escalation boundary carry the escalated
    /// amount instead.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.rent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rent(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.contract(ctx).await?.rent)
    }

    /// Day of month every rent `Payment` is due on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.dueDay",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn due_day(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.contract(ctx).await?.due_day.day().into())
    }

    /// Number of months between two consecutive rent escalations.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.escalationPeriod",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn escalation_period(
        &self,
        ctx: &Context,
    ) -> Result<i32, Error> {
        Ok(self.contract(ctx).await?.escalation_period.months().into())
    }

    /// `Percent` the rent grows by on every escalation boundary.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.escalationPercent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn escalation_percent(
        &self,
        ctx: &Context,
    ) -> Result<Percent, Error> {
        Ok(self.contract(ctx).await?.escalation_percent)
    }

    /// Scheduled rent `Payment`s of this `Contract`, ordered by their due
    /// date.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::payments::ForContract::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Contract` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.contract(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Contract`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);
