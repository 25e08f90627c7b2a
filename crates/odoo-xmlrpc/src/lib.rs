#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod fault;
mod json;
mod request;
mod response;
mod tree;
mod value;

pub use crate::error::{Error, Result};
pub use crate::fault::{Fault, FaultCode};
pub use crate::json::deserialize_odoo_nullable;
pub use crate::request::MethodCall;
pub use crate::response::MethodResponse;
pub use crate::value::{DATETIME_FORMAT, Value};
