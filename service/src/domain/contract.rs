//! [`Contract`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf, Money, Percent};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{client, property};
#[cfg(doc)]
use crate::domain::{Client, Payment, Property};

/// Lease agreement renting a [`Property`] out to a tenant [`Client`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the rented [`Property`].
    pub property_id: property::Id,

    /// ID of the tenant [`Client`].
    pub tenant_id: client::Id,

    /// First day this [`Contract`] is in force.
    pub starts_on: Date,

    /// Last day this [`Contract`] is in force.
    pub ends_on: Date,

    /// Monthly rent at the moment this [`Contract`] was signed.
    ///
    /// [`Payment`]s scheduled after an escalation boundary carry the
    /// escalated amount instead.
    pub rent: Money,

    /// [`DueDay`] of month every rent [`Payment`] is due on.
    pub due_day: DueDay,

    /// [`EscalationPeriod`] between two consecutive rent escalations.
    pub escalation_period: EscalationPeriod,

    /// [`Percent`] the rent grows by on every escalation boundary.
    pub escalation_percent: Percent,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Contract`].
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

/// Day of month a rent [`Payment`] is due on.
///
/// Months shorter than the picked day produce a [`Payment`] due on their last
/// day instead.
///
/// [`Payment`]: crate::domain::Payment
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct DueDay(u8);

impl DueDay {
    /// Creates a new [`DueDay`] by checking the provided value is a valid
    /// day-of-month.
    #[must_use]
    pub fn new(day: u8) -> Option<Self> {
        Self::check(day).then_some(Self(day))
    }

    /// Creates a new [`DueDay`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be in `1..=31` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(day: u8) -> Self {
        Self(day)
    }

    /// Returns the day-of-month of this [`DueDay`].
    #[must_use]
    pub const fn day(self) -> u8 {
        self.0
    }

    /// Checks whether the given `day` is a valid [`DueDay`].
    fn check(day: u8) -> bool {
        (1..=31).contains(&day)
    }
}

impl FromStr for DueDay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `DueDay` value")
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for DueDay {
    accepts!(INT2);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let day = u8::try_from(i16::from_sql(ty, raw)?)?;
        Self::new(day).ok_or_else(|| format!("invalid `DueDay`: {day}").into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for DueDay {
    accepts!(INT2);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        i16::from(self.0).to_sql(ty, w)
    }
}

/// Number of months between two consecutive rent escalations of a
/// [`Contract`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct EscalationPeriod(u16);

impl EscalationPeriod {
    /// Creates a new [`EscalationPeriod`] by checking the provided number of
    /// months is within the `1..=1200` range.
    #[must_use]
    pub fn new(months: u16) -> Option<Self> {
        (1..=1200).contains(&months).then_some(Self(months))
    }

    /// Creates a new [`EscalationPeriod`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided number of months must be within the `1..=1200` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(months: u16) -> Self {
        Self(months)
    }

    /// Returns the number of months of this [`EscalationPeriod`].
    #[must_use]
    pub const fn months(self) -> u16 {
        self.0
    }
}

impl FromStr for EscalationPeriod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `EscalationPeriod` value")
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for EscalationPeriod {
    accepts!(INT2);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let months = u16::try_from(i16::from_sql(ty, raw)?)?;
        Self::new(months).ok_or_else(|| {
            format!("invalid `EscalationPeriod`: {months}").into()
        })
    }
}

#[cfg(feature = "postgres")]
impl ToSql for EscalationPeriod {
    accepts!(INT2);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        i16::try_from(self.0)?.to_sql(ty, w)
    }
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;
