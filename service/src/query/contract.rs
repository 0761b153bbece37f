//! [`Query`] collection related to a single [`Contract`].

use common::operations::By;

use crate::domain::{contract, Contract};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;
