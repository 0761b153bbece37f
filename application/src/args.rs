//! [`Args`] definitions.

use clap::{Parser, Subcommand};

/// Server of the rental management system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// One-shot [`Command`] to run instead of serving the API.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot command running a single unit of work and exiting.
#[derive(Clone, Copy, Debug, Subcommand)]
pub enum Command {
    /// Performs a single payment reconciliation run and exits.
    ///
    /// Exits with a non-zero code if the run fails, so external schedulers
    /// can detect it.
    ReconcilePayments,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
