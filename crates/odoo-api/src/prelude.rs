//! Prelude module for odoo-api.
//!
//! This module re-exports the types needed for everyday queries. Import it
//! to get the client, the query builders and the error type in one line.

pub use crate::client::OdooClient;
pub use crate::config::OdooConfig;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::query::{
    Domain, Operator, QueryType, ReadOptions, Record, SearchOptions, SearchReadOptions, Values,
};
pub use odoo_xmlrpc::Value;
