//! [`Query`] collection related to the multiple [`Property`]s.

use common::operations::By;

use crate::{domain::Property, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Property`]s.
pub type List = DatabaseQuery<
    By<read::property::list::Page, read::property::list::Selector>,
>;

/// Queries total count of [`Property`] list items.
pub type TotalCount = DatabaseQuery<
    By<read::property::list::TotalCount, read::property::list::Filter>,
>;

/// Queries the newest available [`Property`]s put up for an operation.
pub type Newest = DatabaseQuery<By<Vec<Property>, read::property::Newest>>;
