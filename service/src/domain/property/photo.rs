//! [`Photo`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::property;
#[cfg(doc)]
use crate::domain::Property;

/// Gallery photo of a [`Property`].
#[derive(Clone, Debug)]
pub struct Photo {
    /// ID of this [`Photo`].
    pub id: Id,

    /// ID of the [`Property`] this [`Photo`] belongs to.
    pub property_id: property::Id,

    /// [`Url`] this [`Photo`] is served from.
    pub url: Url,

    /// [`Caption`] of this [`Photo`], if any.
    pub caption: Option<Caption>,
}

/// ID of a [`Photo`].
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

/// URL a [`Photo`] is served from.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Url(String);

impl Url {
    /// Creates a new [`Url`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`Url`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`Url`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url
            && !url.is_empty()
            && url.len() <= 2048
            && !url.chars().any(char::is_whitespace)
    }
}

impl FromStr for Url {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Url`")
    }
}

/// Caption of a [`Photo`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Caption(String);

impl Caption {
    /// Creates a new [`Caption`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `caption` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(caption: impl Into<String>) -> Self {
        Self(caption.into())
    }

    /// Creates a new [`Caption`] if the given `caption` is valid.
    #[must_use]
    pub fn new(caption: impl Into<String>) -> Option<Self> {
        let caption = caption.into();
        Self::check(&caption).then_some(Self(caption))
    }

    /// Checks whether the given `caption` is a valid [`Caption`].
    fn check(caption: impl AsRef<str>) -> bool {
        let caption = caption.as_ref();
        caption.trim() == caption && !caption.is_empty() && caption.len() <= 255
    }
}

impl FromStr for Caption {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Caption`")
    }
}
