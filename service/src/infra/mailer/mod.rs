//! [`Mailer`]-related implementations.

#[cfg(feature = "http-mailer")]
pub mod http;

use derive_more::{Display, Error as StdError, From};

use crate::domain::client;

#[cfg(feature = "http-mailer")]
pub use self::http::Http;

/// Mailer operation.
pub use common::Handler as Mailer;

/// Single email message to be dispatched by a [`Mailer`].
#[derive(Clone, Debug)]
pub struct Message {
    /// [`client::Email`] address to deliver this [`Message`] to.
    pub to: client::Email,

    /// Subject line of this [`Message`].
    pub subject: String,

    /// Plain text body of this [`Message`].
    pub text: String,

    /// HTML body of this [`Message`].
    pub html: String,
}

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "http-mailer")]
    /// [`Http`] mailer error.
    Http(http::Error),
}
