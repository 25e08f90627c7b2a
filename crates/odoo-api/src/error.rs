//! Structured error handling for Odoo API operations.

use hipstr::HipStr;
use odoo_xmlrpc::{Fault, FaultCode};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur when talking to Odoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// An input value (configuration field, query type, model, domain) is not correct.
    InvalidInput,
    /// The client could not be configured.
    Configuration,
    /// Network-related error occurred.
    NetworkError,
    /// Timeout occurred.
    Timeout,
    /// Odoo rejected the credentials.
    Authentication,
    /// The user may not perform the operation.
    Authorization,
    /// The record or resource does not exist.
    NotFound,
    /// Odoo reported a failure, or answered with an HTTP error status.
    ExternalError,
    /// A request or response could not be encoded or decoded.
    Serialization,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

impl ErrorKind {
    /// Check if this error kind is typically retryable.
    ///
    /// The client never retries on its own; this is for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError | Self::Timeout)
    }
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error(
    "[{kind}]{}{}",
    field.as_ref().map(|f| format!(" {f}")).unwrap_or_default(),
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<HipStr<'static>>,
    /// The input field the error was encountered in, for input errors.
    pub field: Option<HipStr<'static>>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            field: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Creates an input error for `field` explaining how to fix it.
    pub fn input(
        field: impl Into<HipStr<'static>>,
        message: impl Into<HipStr<'static>>,
    ) -> Self {
        Self::new(ErrorKind::InvalidInput)
            .with_field(field)
            .with_message(message)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new external error.
    pub fn external_error() -> Self {
        Self::new(ErrorKind::ExternalError)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<HipStr<'static>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the input field this error refers to.
    pub fn with_field(mut self, field: impl Into<HipStr<'static>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the input field, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the fault sent by Odoo, if this error came from one.
    pub fn fault(&self) -> Option<&Fault> {
        self.source.as_ref()?.downcast_ref::<Fault>()
    }

    /// Check if this error is retryable based on its kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        let kind = match &fault.code {
            FaultCode::Int(3) => ErrorKind::Authentication,
            FaultCode::Int(4) => ErrorKind::Authorization,
            FaultCode::Int(2) => match classify_fault_text(fault.summary()) {
                ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::InvalidInput,
            },
            FaultCode::Int(_) => classify_fault_text(fault.summary()),
            FaultCode::Text(code) => classify_fault_text(code),
        };

        let message = fault.summary().to_owned();
        Self::from_source(kind, fault).with_message(message)
    }
}

/// Maps an Odoo exception name found in fault text to an error kind.
fn classify_fault_text(text: &str) -> ErrorKind {
    if text.contains("AccessDenied") || text.contains("Access Denied") {
        ErrorKind::Authentication
    } else if text.contains("AccessError") {
        ErrorKind::Authorization
    } else if text.contains("MissingError") {
        ErrorKind::NotFound
    } else if text.contains("ValidationError")
        || text.contains("UserError")
        || text.starts_with("warning")
    {
        ErrorKind::InvalidInput
    } else {
        ErrorKind::ExternalError
    }
}

impl From<odoo_xmlrpc::Error> for Error {
    fn from(error: odoo_xmlrpc::Error) -> Self {
        let message = error.to_string();
        Self::from_source(ErrorKind::Serialization, error).with_message(message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        let message = error.to_string();
        Self::from_source(ErrorKind::Serialization, error).with_message(message)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Self::from_source(ErrorKind::Configuration, error).with_message("Invalid endpoint URL")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_new() {
        let error = Error::new(ErrorKind::Unknown);
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(error.message.is_none());
        assert!(error.field.is_none());
        assert!(error.source.is_none());
    }

    #[test]
    fn test_input_error_display() {
        let error = Error::input("odoo_host", "The hostname of your Odoo instance is required");
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.field(), Some("odoo_host"));
        assert_eq!(
            error.to_string(),
            "[invalid_input] odoo_host: The hostname of your Odoo instance is required"
        );
    }

    #[test]
    fn test_error_display_without_field() {
        let error = Error::timeout().with_message("request timed out");
        assert_eq!(error.to_string(), "[timeout]: request timed out");
    }

    #[test]
    fn test_fault_codes_map_to_kinds() {
        let cases = [
            (Fault::new(3, "Access Denied"), ErrorKind::Authentication),
            (Fault::new(4, "You are not allowed"), ErrorKind::Authorization),
            (Fault::new(2, "Record does not exist"), ErrorKind::InvalidInput),
            (
                Fault::new(2, "Traceback...\nodoo.exceptions.MissingError: gone"),
                ErrorKind::NotFound,
            ),
            (
                Fault::new(1, "Traceback...\nValueError: Invalid field 'x'"),
                ErrorKind::ExternalError,
            ),
            (
                Fault::new(1, "Traceback...\nodoo.exceptions.MissingError: gone"),
                ErrorKind::NotFound,
            ),
        ];

        for (fault, kind) in cases {
            assert_eq!(Error::from(fault).kind, kind);
        }
    }

    #[test]
    fn test_fault_is_kept_as_source() {
        let error = Error::from(Fault::new(1, "Traceback...\nValueError: boom"));
        assert_eq!(error.message.as_deref(), Some("ValueError: boom"));
        assert_eq!(error.fault().map(|f| f.code.as_i64()), Some(Some(1)));
    }

    #[test]
    fn test_text_fault_codes() {
        let fault = Fault {
            code: FaultCode::Text("AccessDenied".into()),
            message: String::new(),
        };
        assert_eq!(Error::from(fault).kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::NetworkError.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());

        assert!(!ErrorKind::InvalidInput.is_retryable());
        assert!(!ErrorKind::Authentication.is_retryable());
        assert!(!ErrorKind::ExternalError.is_retryable());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ErrorKind::from_str("not_found").unwrap(),
            ErrorKind::NotFound
        );
        assert!(ErrorKind::from_str("invalid").is_err());
    }
}
