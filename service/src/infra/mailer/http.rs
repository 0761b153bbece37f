//! HTTP [`Mailer`] implementation.

use common::operations::Dispatch;
use derive_more::{Display, Error as StdError, From};
use reqwest::{header, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use tracerr::Traced;

use crate::infra::mailer::{self, Mailer};

use super::Message;

/// Configuration of an [`Http`] mailer.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the mailer API endpoint to `POST` [`Message`]s to.
    pub endpoint: String,

    /// Bearer token authorizing requests to the mailer API.
    pub token: SecretString,

    /// Sender address stamped onto every dispatched [`Message`].
    pub from: String,
}

/// HTTP JSON API [`Mailer`] client.
#[derive(Clone, Debug)]
pub struct Http {
    /// HTTP client to perform requests with, carrying the authorization
    /// header.
    client: reqwest::Client,

    /// URL of the mailer API endpoint.
    endpoint: String,

    /// Sender address for dispatched [`Message`]s.
    from: String,
}

impl Http {
    /// Creates a new [`Http`] mailer with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create the underlying HTTP client.
    pub fn new(conf: &Config) -> Result<Self, Traced<mailer::Error>> {
        let mut auth = header::HeaderValue::from_str(&format!(
            "Bearer {}",
            conf.token.expose_secret(),
        ))
        .map_err(tracerr::from_and_wrap!(=> Error))
        .map_err(tracerr::map_from)?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        _ = headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            client,
            endpoint: conf.endpoint.clone(),
            from: conf.from.clone(),
        })
    }
}

impl Mailer<Dispatch<Message>> for Http {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Dispatch(message): Dispatch<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&Payload {
                from: &self.from,
                to: message.to.as_ref(),
                subject: &message.subject,
                text: &message.text,
                html: &message.html,
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(tracerr::new!(Error::BadStatus(status, body)))
                .map_err(tracerr::map_from);
        }
        Ok(())
    }
}

/// Wire representation of a [`Message`] accepted by the mailer API.
#[derive(Debug, Serialize)]
struct Payload<'a> {
    /// Sender address.
    from: &'a str,

    /// Recipient address.
    to: &'a str,

    /// Subject line.
    subject: &'a str,

    /// Plain text body.
    text: &'a str,

    /// HTML body.
    html: &'a str,
}

/// HTTP [`Mailer`] [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Mailer API responded with a non-success status.
    #[display("Mailer API responded with `{_0}` status: {_1}")]
    #[from(ignore)]
    BadStatus(
        #[error(not(source))] StatusCode,
        #[error(not(source))] String,
    ),

    /// Bearer token cannot be encoded as an HTTP header.
    #[display("Invalid bearer token: {_0}")]
    InvalidToken(header::InvalidHeaderValue),

    /// Failed to perform an HTTP request.
    #[display("HTTP request failed: {_0}")]
    Request(reqwest::Error),
}
