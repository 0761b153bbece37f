//! GraphQL [`Query`]s definitions.

use itertools::Itertools as _;
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Looks up the [`domain::Client`] profile linked to the currently
    /// authenticated `User`, if any.
    ///
    /// # Errors
    ///
    /// Errors if the current HTTP request is not authorized.
    async fn my_client_profile(
        ctx: &Context,
    ) -> Result<Option<domain::Client>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::client::ByUserId::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Client` profile of the currently authenticated `User`.
    ///
    /// No `Client` is returned if no profile is linked to the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myClient",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_client(
        ctx: &Context,
    ) -> Result<Option<api::Client>, Error> {
        Self::my_client_profile(ctx).await.map(|c| c.map(Into::into))
    }

    /// Returns the rental `Contract`s of the currently authenticated `User`.
    ///
    /// No `Contract`s are returned if no `Client` profile is linked to the
    /// current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myContracts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_contracts(
        ctx: &Context,
    ) -> Result<Vec<api::Contract>, Error> {
        let Some(client) = Self::my_client_profile(ctx).await? else {
            return Ok(vec![]);
        };
        ctx.service()
            .execute(query::contracts::ForClient::by(client.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|contracts| contracts.into_iter().map(Into::into).collect())
    }

    /// Returns the `Payment`s scheduled under the specified `Contract` of the
    /// currently authenticated `User`, ordered by their due date.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist, or belongs to another tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            contract_id = %contract_id,
            gql.name = "myPayments",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_payments(
        contract_id: api::contract::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        let client = Self::my_client_profile(ctx)
            .await?
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())?;
        let contract = ctx
            .service()
            .execute(query::contract::ById::by(contract_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|c| c.tenant_id == client.id)
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())?;
        ctx.service()
            .execute(query::payments::ForContract::by(contract.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// Returns the unpaid past-due `Payment`s of the currently authenticated
    /// `User`, ordered by their due date.
    ///
    /// No `Payment`s are returned if no `Client` profile is linked to the
    /// current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myOverduePayments",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_overdue_payments(
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        let Some(client) = Self::my_client_profile(ctx).await? else {
            return Ok(vec![]);
        };
        ctx.service()
            .execute(query::payments::OverdueForClient::by(client.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| {
                payments
                    .into_iter()
                    .map(|read::payment::Overdue(p)| p.into())
                    .collect()
            })
    }

    /// Returns the next upcoming `Payment` of the currently authenticated
    /// `User`, if any.
    ///
    /// No `Payment` is returned if no `Client` profile is linked to the
    /// current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUpcomingPayment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_upcoming_payment(
        ctx: &Context,
    ) -> Result<Option<api::Payment>, Error> {
        let Some(client) = Self::my_client_profile(ctx).await? else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::payment::NextForClient::by(client.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.map(|read::payment::Upcoming(p)| p.into()))
    }

    /// Returns the `Property` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "property",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::property::list::Edge, Error> {
        Self::properties(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| PropertyError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Property`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "properties",
            last = ?last,
            operation = ?operation,
            otel.name = Self::SPAN_NAME,
            search = ?search.as_ref().map(ToString::to_string),
            status = ?status,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn properties(
        first: Option<i32>,
        after: Option<api::property::list::Cursor>,
        last: Option<i32>,
        before: Option<api::property::list::Cursor>,
        operation: Option<api::property::Operation>,
        status: Option<api::property::Status>,
        search: Option<api::property::SearchTerm>,
        ctx: &Context,
    ) -> Result<api::property::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let filter = read::property::list::Filter {
            operation: operation.map(Into::into),
            status: status.map(Into::into),
            term: search.map(Into::into),
        };
        ctx.service()
            .execute(query::properties::List::by(
                read::property::list::Selector {
                    arguments: read::property::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::property::list::Connection::new(page, filter))
    }

    /// Fetches the newest available `Property`s put up for the specified
    /// operation.
    ///
    /// Defaults to the 6 newest `Property`s put up for rent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "newestProperties",
            limit = ?limit,
            operation = ?operation,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn newest_properties(
        operation: Option<api::property::Operation>,
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Property>, Error> {
        let default = read::property::Newest::default();
        ctx.service()
            .execute(query::properties::Newest::by(read::property::Newest {
                operation: operation.map_or(default.operation, Into::into),
                limit: limit.map_or(default.limit, |l| {
                    u8::try_from(l).unwrap_or(default.limit)
                }),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|properties| {
                properties.into_iter().map(Into::into).collect()
            })
    }
}

define_error! {
    enum ClientError {
        #[code = "CLIENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Client` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
