//! [`Query`] collection related to the multiple [`Payment`]s.

use common::operations::By;

use crate::{
    domain::{client, contract, Payment},
    read::payment::Overdue,
};
#[cfg(doc)]
use crate::{
    domain::{Client, Contract},
    Query,
};

use super::DatabaseQuery;

/// Queries all [`Payment`]s of a [`Contract`] by the [`contract::Id`],
/// ordered by their due date.
pub type ForContract = DatabaseQuery<By<Vec<Payment>, contract::Id>>;

/// Queries unpaid past-due [`Payment`]s of a tenant [`Client`] by the
/// [`client::Id`], ordered by their due date.
pub type OverdueForClient =
    DatabaseQuery<By<Vec<Overdue<Payment>>, client::Id>>;
