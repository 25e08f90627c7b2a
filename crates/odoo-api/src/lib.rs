#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the main library
pub const TRACING_TARGET: &str = "odoo_api";

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "odoo_api::client";

/// Tracing target for transport operations
pub const TRACING_TARGET_PROVIDER: &str = "odoo_api::provider";

/// Tracing target for configuration loading
pub const TRACING_TARGET_CONFIG: &str = "odoo_api::config";

mod client;
mod config;
mod credentials;
mod error;
#[doc(hidden)]
pub mod prelude;
pub mod provider;
pub mod query;

pub use odoo_xmlrpc::{Fault, FaultCode, Value, deserialize_odoo_nullable};

pub use crate::client::{OdooClient, ServerVersion};
pub use crate::config::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_ID, ENV_DATABASE, ENV_HOST, ENV_HTTP_TIMEOUT,
    ENV_PASSWORD, ENV_USER, ENV_USER_AGENT, ENV_VERIFY_TLS, OdooConfig, OdooConfigBuilder,
};
pub use crate::credentials::Credentials;
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::query::{
    Domain, DomainTerm, Operator, QueryType, ReadOptions, Record, SearchOptions,
    SearchReadOptions, Values,
};
