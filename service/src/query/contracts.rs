//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

use crate::domain::{client, Contract};
#[cfg(doc)]
use crate::{domain::Client, Query};

use super::DatabaseQuery;

/// Queries all [`Contract`]s of a tenant [`Client`] by the [`client::Id`].
pub type ForClient = DatabaseQuery<By<Vec<Contract>, client::Id>>;
