//! XML-RPC faults.

use std::fmt;

use thiserror::Error;

use crate::error::{Error, Result};
use crate::value::Value;

/// The `faultCode` of a fault.
///
/// Odoo's `/xmlrpc/2` endpoints send integers; the legacy `/xmlrpc`
/// endpoints send the exception name or message as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCode {
    Int(i64),
    Text(String),
}

impl FaultCode {
    /// Returns the numeric code, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(code) => Some(*code),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

/// A fault returned by the server in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("XML-RPC fault {code}: {message}")]
pub struct Fault {
    /// The `faultCode` member.
    pub code: FaultCode,
    /// The `faultString` member. For Odoo this is usually a server traceback.
    pub message: String,
}

impl Fault {
    /// Creates a fault with a numeric code.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Int(code),
            message: message.into(),
        }
    }

    /// Returns the last non-empty line of the fault string.
    ///
    /// Odoo puts the exception summary (`odoo.exceptions.AccessError: ...`)
    /// at the end of the traceback.
    pub fn summary(&self) -> &str {
        self.message
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .unwrap_or_default()
    }

    /// Decodes the fault struct.
    pub(crate) fn from_value(value: Value) -> Result<Self> {
        let Some(mut members) = value.into_struct() else {
            return Err(Error::syntax("<fault> value is not a struct"));
        };

        let code = match members.remove("faultCode") {
            Some(Value::Int(code)) => FaultCode::Int(code),
            Some(Value::String(code)) => FaultCode::Text(code),
            Some(other) => {
                return Err(Error::syntax(format!(
                    "faultCode has unexpected type <{}>",
                    other.type_name()
                )));
            }
            None => return Err(Error::syntax("<fault> is missing faultCode")),
        };

        let message = match members.remove("faultString") {
            Some(Value::String(message)) => message,
            Some(Value::Nil) | None => String::new(),
            Some(other) => {
                return Err(Error::syntax(format!(
                    "faultString has unexpected type <{}>",
                    other.type_name()
                )));
            }
        };

        Ok(Self { code, message })
    }

    /// Encodes the fault struct.
    pub(crate) fn to_value(&self) -> Value {
        let code = match &self.code {
            FaultCode::Int(code) => Value::Int(*code),
            FaultCode::Text(code) => Value::String(code.clone()),
        };

        [
            ("faultCode", code),
            ("faultString", Value::String(self.message.clone())),
        ]
        .into_iter()
        .collect()
    }
}
