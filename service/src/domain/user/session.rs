//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::DateTimeOf;
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Authenticated session of a [`User`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] signed into this [`Session`].
    pub user_id: user::Id,

    /// [`DateTime`] this [`Session`] stays valid until.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Signed token proving a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// Marker type indicating [`Session`] expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, Expiration)>;
