//! Error types for the HTTP transport.

use odoo_xmlrpc::Fault;
use reqwest::StatusCode;
use thiserror::Error;

/// Longest body excerpt kept on an HTTP status error.
const MAX_BODY_EXCERPT: usize = 1024;

/// Error type for HTTP transport operations.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP status {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The request could not be encoded or the response decoded.
    #[error("XML-RPC error: {0}")]
    Codec(#[from] odoo_xmlrpc::Error),
    /// The server answered with a fault.
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl Error {
    /// Creates a status error keeping the start of `body`.
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((end, _)) => format!("{}...", &body[..end]),
            None => body.to_owned(),
        };
        Self::Status { status, body }
    }
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::network_error()
                        .with_message("Connection failed, check the odoo_host value")
                        .with_source(e)
                } else {
                    crate::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Status { status, .. } => {
                let error = match status {
                    StatusCode::UNAUTHORIZED => crate::Error::authentication(),
                    StatusCode::FORBIDDEN => crate::Error::new(crate::ErrorKind::Authorization),
                    StatusCode::NOT_FOUND => crate::Error::new(crate::ErrorKind::NotFound),
                    StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                        crate::Error::timeout()
                    }
                    StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
                        crate::Error::network_error()
                    }
                    _ => crate::Error::external_error(),
                };
                error.with_message(err.to_string()).with_source(err)
            }
            Error::Codec(e) => e.into(),
            Error::Fault(fault) => fault.into(),
        }
    }
}
