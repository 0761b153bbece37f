//! [`Query`] collection related to a single [`Client`].

use common::operations::By;

use crate::domain::{client, user, Client};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries a [`Client`] by its [`client::Id`].
pub type ById = DatabaseQuery<By<Option<Client>, client::Id>>;

/// Queries the [`Client`] linked to a [`User`] by the [`user::Id`].
pub type ByUserId = DatabaseQuery<By<Option<Client>, user::Id>>;
