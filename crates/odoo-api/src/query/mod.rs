//! Query building blocks: query types, domains, options and records.

mod domain;
mod options;
mod record;

pub use domain::{Domain, DomainTerm, Operator};
pub use options::{ReadOptions, SearchOptions, SearchReadOptions};
pub use record::{Record, Values};
pub(crate) use record::records_from;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// The model methods that may be issued through `execute_kw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum QueryType {
    Search,
    Create,
    Read,
    Write,
    Unlink,
    SearchRead,
}

impl QueryType {
    /// Every supported query type, in documentation order.
    pub const ALL: [QueryType; 6] = [
        Self::Search,
        Self::Create,
        Self::Read,
        Self::Write,
        Self::Unlink,
        Self::SearchRead,
    ];

    /// Parses a query type name.
    ///
    /// # Errors
    ///
    /// Returns an input error on field `query_type` listing the available
    /// types when `name` is not one of them.
    pub fn parse(name: &str) -> Result<Self> {
        name.parse().map_err(|_| {
            let available: Vec<&str> = Self::ALL.iter().map(QueryType::method).collect();
            Error::input(
                "query_type",
                format!(
                    "Incorrect Type of query. Available types are: {}",
                    available.join(", ")
                ),
            )
        })
    }

    /// Returns the Odoo method name.
    pub fn method(&self) -> &'static str {
        self.into()
    }
}

/// Checks that `model` looks like an Odoo model name such as `res.partner`.
pub(crate) fn validate_model(model: &str) -> Result<()> {
    let valid = !model.is_empty()
        && !model.starts_with('.')
        && !model.ends_with('.')
        && model
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');

    if valid {
        Ok(())
    } else {
        Err(Error::input(
            "model",
            format!("'{model}' is not a valid model name, expected something like 'res.partner'"),
        ))
    }
}
