//! [`Property`]-related read definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use smart_default::SmartDefault;

use crate::domain::property;
#[cfg(doc)]
use crate::domain::Property;

/// Selection of the newest [`Property`]s put up for the [`Operation`].
///
/// Only [`Status::Available`] [`Property`]s are considered, ordered from the
/// most recently created one.
///
/// [`Operation`]: property::Operation
/// [`Status::Available`]: property::Status::Available
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Newest {
    /// [`property::Operation`] to select [`Property`]s put up for.
    #[default(property::Operation::Rent)]
    pub operation: property::Operation,

    /// Maximum number of [`Property`]s to select.
    #[default = 6]
    pub limit: u8,
}

/// Free-text term to fuzzy search [`Property`]s with.
///
/// Matched against the title, description, address and city of a
/// [`Property`]. Leading and trailing whitespace is stripped.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Maximum length of a [`SearchTerm`] in characters.
    pub const MAX_LEN: usize = 250;

    /// Creates a new [`SearchTerm`] out of the provided `value`, if it
    /// represents a valid [`SearchTerm`].
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        Self::check(trimmed).then(|| Self(trimmed.into()))
    }

    /// Checks whether the provided `value` represents a valid [`SearchTerm`].
    fn check(value: &str) -> bool {
        !value.is_empty() && value.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for SearchTerm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("Invalid `read::property::SearchTerm` provided")
    }
}

pub mod list {
    //! [`Property`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::property;
    #[cfg(doc)]
    use crate::domain::Property;

    use super::SearchTerm;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = property::Id;

    /// Cursor pointing to a specific [`Property`] in a list.
    pub type Cursor = property::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`property::Operation`] to select [`Property`]s put up for.
        pub operation: Option<property::Operation>,

        /// [`property::Status`] to select [`Property`]s in.
        pub status: Option<property::Status>,

        /// [`SearchTerm`] to fuzzy search [`Property`]s with.
        pub term: Option<SearchTerm>,
    }

    /// Total count of [`Property`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}

#[cfg(test)]
mod spec {
    use super::SearchTerm;

    #[test]
    fn trims_surrounding_whitespace() {
        let term = SearchTerm::new("  centro historico ").unwrap();

        assert_eq!(AsRef::<str>::as_ref(&term), "centro historico");
    }

    #[test]
    fn rejects_blank_input() {
        assert!(SearchTerm::new("").is_none());
        assert!(SearchTerm::new("   ").is_none());
        assert!(SearchTerm::new("\t\n").is_none());
    }

    #[test]
    fn rejects_overlong_input() {
        assert!(SearchTerm::new("a".repeat(250)).is_some());
        assert!(SearchTerm::new("a".repeat(251)).is_none());
    }
}
