//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::error::Error;

use common::operations::{By, Start};
use derive_more::Debug;

#[cfg(doc)]
use infra::{Database, Mailer};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`task::ReconcilePayments`] configuration.
    pub reconcile_payments: task::reconcile_payments::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, M> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Mailer`] of this [`Service`].
    mailer: M,
}

impl<Db, M> Service<Db, M> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        mailer: M,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ReconcilePayments<Self>,
                        task::reconcile_payments::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            mailer,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().reconcile_payments)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Mailer`] of this [`Service`].
    #[must_use]
    pub fn mailer(&self) -> &M {
        &self.mailer
    }
}
