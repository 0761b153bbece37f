//! [`Property`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, read, Query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`Property`] listed by the agency.
#[derive(Clone, Debug, From)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`domain::Property`] representing this [`Property`].
    property: OnceCell<domain::Property>,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        Self {
            id: property.id.into(),
            property: OnceCell::new_with(Some(property)),
        }
    }
}

impl Property {
    /// Creates a new [`Property`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Property`] with the provided ID exists,
    /// otherwise accessing this [`Property`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            property: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Property`] representing this [`Property`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Property`] doesn't exist.
    async fn property(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Property, Error> {
        let id = self.id.into();
        self.property
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::property::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::PropertyError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Property` listed by the agency.
#[graphql_object(context = Context)]
impl Property {
    /// Unique identifier of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Title of this `Property` listing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.property(ctx).await?.title.clone().into())
    }

    /// Description of this `Property` listing, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.property(ctx).await?.description.clone().map(Into::into))
    }

    /// Operation this `Property` is offered for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.operation",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn operation(&self, ctx: &Context) -> Result<Operation, Error> {
        Ok(self.property(ctx).await?.operation.into())
    }

    /// Current status of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.property(ctx).await?.status.into())
    }

    /// Price of this `Property`: monthly rent when offered for rent, or the
    /// full price when offered for sale.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.property(ctx).await?.price)
    }

    /// Address of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.property(ctx).await?.address.clone().into())
    }

    /// City this `Property` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.city",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn city(&self, ctx: &Context) -> Result<City, Error> {
        Ok(self.property(ctx).await?.city.clone().into())
    }

    /// Number of rooms in this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.rooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.property(ctx).await?.rooms.into())
    }

    /// Number of bathrooms in this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.bathrooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bathrooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.property(ctx).await?.bathrooms.into())
    }

    /// Area of this `Property` in square meters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.area",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn area(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.property(ctx).await?.area.into())
    }

    /// URL of the main photo of this `Property` listing, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.mainPhoto",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn main_photo(
        &self,
        ctx: &Context,
    ) -> Result<Option<photo::Url>, Error> {
        Ok(self.property(ctx).await?.main_photo.clone().map(Into::into))
    }

    /// Gallery photos of this `Property` listing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.photos",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn photos(
        &self,
        ctx: &Context,
    ) -> Result<Vec<photo::Photo>, Error> {
        ctx.service()
            .execute(query::property::Photos::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|photos| photos.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Property` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.property(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Property`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::property::Id)]
#[into(domain::property::Id)]
#[graphql(name = "PropertyId", transparent)]
pub struct Id(Uuid);

/// Title of a `Property` listing.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyTitle",
    with = scalar::Via::<domain::property::Title>,
)]
pub struct Title(domain::property::Title);

/// Description of a `Property` listing.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyDescription",
    with = scalar::Via::<domain::property::Description>,
)]
pub struct Description(domain::property::Description);

/// Address of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyAddress",
    with = scalar::Via::<domain::property::Address>,
)]
pub struct Address(domain::property::Address);

/// City a `Property` is located in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyCity",
    with = scalar::Via::<domain::property::City>,
)]
pub struct City(domain::property::City);

/// Free-text term to fuzzy search `Property`s with.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertySearchTerm",
    with = scalar::Via::<read::property::SearchTerm>,
)]
pub struct SearchTerm(read::property::SearchTerm);

/// Operation a `Property` is offered for.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PropertyOperation")]
pub enum Operation {
    /// The `Property` is offered for rent.
    Rent,

    /// The `Property` is offered for sale.
    Sale,
}

impl From<domain::property::Operation> for Operation {
    fn from(operation: domain::property::Operation) -> Self {
        match operation {
            domain::property::Operation::Rent => Self::Rent,
            domain::property::Operation::Sale => Self::Sale,
        }
    }
}

impl From<Operation> for domain::property::Operation {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Rent => Self::Rent,
            Operation::Sale => Self::Sale,
        }
    }
}

/// Status of a `Property`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PropertyStatus")]
pub enum Status {
    /// The `Property` is available on the market.
    Available,

    /// The `Property` is rented out.
    Rented,

    /// The `Property` is sold.
    Sold,
}

impl From<domain::property::Status> for Status {
    fn from(status: domain::property::Status) -> Self {
        match status {
            domain::property::Status::Available => Self::Available,
            domain::property::Status::Rented => Self::Rented,
            domain::property::Status::Sold => Self::Sold,
        }
    }
}

impl From<Status> for domain::property::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Available => Self::Available,
            Status::Rented => Self::Rented,
            Status::Sold => Self::Sold,
        }
    }
}

pub mod photo {
    //! [`Photo`]-related definitions.

    use derive_more::{AsRef, Display, From, Into};
    use juniper::{GraphQLInputObject, GraphQLObject, GraphQLScalar};
    use service::{command, domain};
    use uuid::Uuid;

    use crate::{api::scalar, Context};

    /// Gallery photo of a `Property` listing.
    #[derive(Clone, Debug, GraphQLObject)]
    #[graphql(context = Context, name = "PropertyPhoto")]
    pub struct Photo {
        /// Unique identifier of this `PropertyPhoto`.
        pub id: Id,

        /// URL this `PropertyPhoto` is served from.
        pub url: Url,

        /// Caption of this `PropertyPhoto`, if any.
        pub caption: Option<Caption>,
    }

    impl From<domain::property::Photo> for Photo {
        fn from(photo: domain::property::Photo) -> Self {
            let domain::property::Photo {
                id,
                property_id: _,
                url,
                caption,
            } = photo;
            Self {
                id: id.into(),
                url: url.into(),
                caption: caption.map(Into::into),
            }
        }
    }

    /// Details of a `PropertyPhoto` to be attached to a `Property`.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "PropertyPhotoInput")]
    pub struct Input {
        /// URL the `PropertyPhoto` is served from.
        pub url: Url,

        /// Caption of the `PropertyPhoto`, if any.
        pub caption: Option<Caption>,
    }

    impl From<Input> for command::create_property::Photo {
        fn from(input: Input) -> Self {
            let Input { url, caption } = input;
            Self {
                url: url.into(),
                caption: caption.map(Into::into),
            }
        }
    }

    /// Unique identifier of a `PropertyPhoto`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::property::photo::Id)]
    #[into(domain::property::photo::Id)]
    #[graphql(name = "PropertyPhotoId", transparent)]
    pub struct Id(Uuid);

    /// URL a `PropertyPhoto` is served from.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "PropertyPhotoUrl",
        with = scalar::Via::<domain::property::photo::Url>,
    )]
    pub struct Url(domain::property::photo::Url);

    /// Caption of a `PropertyPhoto`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "PropertyPhotoCaption",
        with = scalar::Via::<domain::property::photo::Caption>,
    )]
    pub struct Caption(domain::property::photo::Caption);
}

pub mod list {
    //! Definitions related to [`Property`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use crate::{api::scalar, AsError, Context, Error};

    use super::{Id, Property};

    /// Cursor for the `Property` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::property::list::Cursor)]
    #[graphql(
        name = "PropertyListCursor",
        with = scalar::Via::<read::property::list::Cursor>,
    )]
    pub struct Cursor(pub read::property::list::Cursor);

    /// Edge in the [`Property`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::property::list::Edge);

    /// Edge in the `Property` list.
    #[graphql_object(name = "PropertyListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PropertyListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PropertyListEdge`.
        #[must_use]
        pub fn node(&self) -> Property {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Property` \
                          existence"
            )]
            unsafe {
                Property::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Property`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Page of the [`Property`] list.
        page: read::property::list::Page,

        /// [`Filter`] the page was selected with.
        ///
        /// [`Filter`]: read::property::list::Filter
        filter: read::property::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the provided page selected
        /// with the provided filter.
        #[must_use]
        pub fn new(
            page: read::property::list::Page,
            filter: read::property::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Property` list.
    #[graphql_object(name = "PropertyListConnection", context = Context)]
    impl Connection {
        /// Edges in this `PropertyListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.page.page_info(),
                start_cursor: self.page.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.page.edges.last().map(|e| e.cursor.into()),
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::property::list::PageInfo`].
        info: read::property::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`Filter`] the page was selected with.
        ///
        /// [`Filter`]: read::property::list::Filter
        filter: read::property::list::Filter,
    }

    /// Information about a `PropertyListConnection` page.
    #[graphql_object(name = "PropertyListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total count of `Property`s matching the applied filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::properties::TotalCount::by(
                    self.filter.clone(),
                ))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
