//! [`Payment`] definitions.

pub mod schedule;

use common::{define_kind, Date, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contract;
#[cfg(doc)]
use crate::domain::Contract;

/// One scheduled monthly rent installment of a [`Contract`].
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Contract`] this [`Payment`] belongs to.
    pub contract_id: contract::Id,

    /// Amount of this [`Payment`].
    ///
    /// Reflects the escalated rent in effect at the due date, not necessarily
    /// the [`Contract`]'s current rate.
    pub amount: Money,

    /// [`Date`] this [`Payment`] is due on.
    pub due_on: Date,

    /// Current [`Status`] of this [`Payment`].
    pub status: Status,

    /// [`Date`] this [`Payment`] was confirmed on.
    ///
    /// Only set once the [`Status`] transitions to [`Status::Paid`].
    pub paid_on: Option<Date>,
}

/// ID of a [`Payment`].
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

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "The [`Payment`] is awaiting confirmation."]
        Pending = 1,

        #[doc = "The [`Payment`] is confirmed as received."]
        Paid = 2,

        #[doc = "The [`Payment`] is past its due date and unconfirmed."]
        Overdue = 3,
    }
}
