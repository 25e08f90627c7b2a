//! Error types for XML-RPC encoding and decoding.

use thiserror::Error;

/// Result type alias for odoo-xmlrpc operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for odoo-xmlrpc operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The XML document is not well formed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Writing the XML document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The XML is well formed but is not a valid XML-RPC document.
    #[error("Invalid XML-RPC document: {0}")]
    Syntax(String),
    /// A scalar value could not be parsed from its text.
    #[error("Invalid <{tag}> value '{text}'")]
    Value { tag: &'static str, text: String },
}

impl Error {
    /// Creates a syntax error with the given message.
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Creates a scalar value error.
    pub(crate) fn value(tag: &'static str, text: impl Into<String>) -> Self {
        Self::Value {
            tag,
            text: text.into(),
        }
    }
}
