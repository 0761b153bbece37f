//! [`Property`] definitions.

pub mod photo;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::photo::Photo;

/// Real-estate property listed for rent or sale.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Title`] of this [`Property`] listing.
    pub title: Title,

    /// [`Description`] of this [`Property`] listing, if any.
    pub description: Option<Description>,

    /// [`Operation`] this [`Property`] is offered for.
    pub operation: Operation,

    /// Current [`Status`] of this [`Property`].
    pub status: Status,

    /// Price of this [`Property`]: monthly rent for [`Operation::Rent`], or
    /// the full price for [`Operation::Sale`].
    pub price: common::Money,

    /// [`Address`] of this [`Property`].
    pub address: Address,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// Number of rooms in this [`Property`].
    pub rooms: RoomCount,

    /// Number of bathrooms in this [`Property`].
    pub bathrooms: BathroomCount,

    /// Area of this [`Property`] in square meters.
    pub area: Area,

    /// Main [`photo::Url`] of this [`Property`] listing, if any.
    pub main_photo: Option<photo::Url>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`Property`] listing.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 250
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Property`] listing.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Address of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 255
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// City a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 100
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Number of rooms in a [`Property`].
pub type RoomCount = u16;

/// Number of bathrooms in a [`Property`].
pub type BathroomCount = u16;

/// Area of a [`Property`] in square meters.
pub type Area = u16;

define_kind! {
    #[doc = "Operation a [`Property`] is offered for."]
    enum Operation {
        #[doc = "The [`Property`] is offered for rent."]
        Rent = 1,

        #[doc = "The [`Property`] is offered for sale."]
        Sale = 2,
    }
}

define_kind! {
    #[doc = "Status of a [`Property`]."]
    enum Status {
        #[doc = "The [`Property`] is available on the market."]
        Available = 1,

        #[doc = "The [`Property`] is rented out."]
        Rented = 2,

        #[doc = "The [`Property`] is sold."]
        Sold = 3,
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;
