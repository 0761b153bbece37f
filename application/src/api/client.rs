//! [`Client`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`Client`] of the agency: a tenant or an owner.
#[derive(Clone, Debug, From)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`domain::Client`] representing this [`Client`].
    client: OnceCell<domain::Client>,
}

impl From<domain::Client> for Client {
    fn from(client: domain::Client) -> Self {
        Self {
            id: client.id.into(),
            client: OnceCell::new_with(Some(client)),
        }
    }
}

impl Client {
    /// Creates a new [`Client`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Client`] with the provided ID exists,
    /// otherwise accessing this [`Client`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            client: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Client`] representing this [`Client`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Client`] doesn't exist.
    async fn client(&self, ctx: &Context) -> Result<&domain::Client, Error> {
        let id = self.id.into();
        self.client
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::client::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ClientError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Client` of the agency: a tenant or an owner.
#[graphql_object(context = Context)]
impl Client {
    /// Unique identifier of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Full name of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.client(ctx).await?.name.clone().into())
    }

    /// Email address of this `Client`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.client(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone number of this `Client`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.client(ctx).await?.phone.clone().map(Into::into))
    }

    /// `User` this `Client` is able to sign in as, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        Ok(self.client(ctx).await?.user_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "foreign key guarantees `User` existence"
            )]
            unsafe {
                api::User::new_unchecked(id)
            }
        }))
    }

    /// `DateTime` when this `Client` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.client(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Client`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::client::Id)]
#[into(domain::client::Id)]
#[graphql(name = "ClientId", transparent)]
pub struct Id(Uuid);

/// Full name of a `Client`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientName",
    with = scalar::Via::<domain::client::Name>,
)]
pub struct Name(domain::client::Name);

/// Email address of a `Client`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientEmail",
    with = scalar::Via::<domain::client::Email>,
)]
pub struct Email(domain::client::Email);

/// Phone number of a `Client`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientPhone",
    with = scalar::Via::<domain::client::Phone>,
)]
pub struct Phone(domain::client::Phone);
