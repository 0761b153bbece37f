//! [`Query`] collection related to a single [`Payment`].

use common::operations::By;

use crate::{
    domain::{client, Payment},
    read::payment::Upcoming,
};
#[cfg(doc)]
use crate::{domain::Client, Query};

use super::DatabaseQuery;

/// Queries the next [`Upcoming`] [`Payment`] of a tenant [`Client`] by the
/// [`client::Id`].
pub type NextForClient =
    DatabaseQuery<By<Option<Upcoming<Payment>>, client::Id>>;
