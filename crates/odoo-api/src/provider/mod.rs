//! Transport for XML-RPC calls.
//!
//! This module separates the client from the wire:
//! - [`RpcProvider`]: core trait for anything that can deliver a [`MethodCall`]
//! - [`RpcService`]: wrapper adding structured logging around a provider
//! - [`ReqwestProvider`]: HTTP implementation posting to an Odoo instance
//!
//! # Example
//!
//! ```rust,ignore
//! use odoo_api::provider::{Endpoint, ReqwestProvider, RpcService};
//!
//! let service = RpcService::new(ReqwestProvider::new(&config)?);
//! let call = MethodCall::new("version", []);
//! let version = service.call(Endpoint::Common, &call).await?;
//! ```

mod error;
mod http;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

pub use http::ReqwestProvider;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::MockProvider;
use odoo_xmlrpc::{MethodCall, Value};
pub use service::RpcService;
use strum::{AsRefStr, Display, IntoStaticStr};
use url::Url;

pub use crate::error::{Error, Result};

/// The XML-RPC services exposed by an Odoo instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    /// Unauthenticated metadata and login, `/xmlrpc/2/common`.
    Common,
    /// Model methods through `execute_kw`, `/xmlrpc/2/object`.
    Object,
}

impl Endpoint {
    /// Returns the path relative to the instance root.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Common => "xmlrpc/2/common",
            Self::Object => "xmlrpc/2/object",
        }
    }

    /// Resolves the endpoint against the instance URL.
    ///
    /// A path already present on `base` is kept, so instances served under a
    /// prefix work as well.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let prefix = base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}/{}", self.path()));
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

/// Core trait for delivering XML-RPC calls.
///
/// Implementations return the decoded result value. A fault sent by the
/// server is returned as an [`Error`] carrying the [`odoo_xmlrpc::Fault`].
#[async_trait::async_trait]
pub trait RpcProvider: Send + Sync {
    /// Sends `call` to `endpoint` and returns the result value.
    async fn call(&self, endpoint: Endpoint, call: &MethodCall) -> Result<Value>;
}
