//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── odoo: OdooConfig   # host, database, user, password, TLS, timeouts
//! └── command: Command   # what to run
//! ```
//!
//! Every connection option can be provided as an argument or through its
//! environment variable. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! odoo --odoo-host https://erp.example.com --odoo-database prod search res.partner
//!
//! # Or via environment variables
//! odoo_host=https://erp.example.com odoo_database=prod odoo search res.partner
//! ```

use std::process;

use clap::Parser;
use odoo_api::OdooConfig;

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "odoo")]
#[command(about = "Query an Odoo instance over XML-RPC")]
#[command(version)]
pub struct Cli {
    /// Odoo connection configuration.
    #[clap(flatten)]
    pub odoo: OdooConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// values serve as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs build information and configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            command = self.command.name(),
            "Parsed command line"
        );

        self.odoo.log();
    }
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [cfg!(feature = "dotenv").then_some("dotenv")]
        .into_iter()
        .flatten()
        .collect()
}
