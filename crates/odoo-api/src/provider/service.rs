//! RPC service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use odoo_xmlrpc::{MethodCall, Value};

use super::{Endpoint, Result, RpcProvider};
use crate::TRACING_TARGET_PROVIDER;

/// RPC service wrapper with observability.
///
/// This wrapper adds structured logging to any [`RpcProvider`]. The inner
/// provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct RpcService {
    inner: Arc<dyn RpcProvider>,
}

impl fmt::Debug for RpcService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcService").finish_non_exhaustive()
    }
}

impl RpcService {
    /// Create a new RPC service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: RpcProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Wraps an already shared provider.
    pub fn from_shared(provider: Arc<dyn RpcProvider>) -> Self {
        Self { inner: provider }
    }

    /// Sends `call` to `endpoint`.
    pub async fn call(&self, endpoint: Endpoint, call: &MethodCall) -> Result<Value> {
        let started_at = Instant::now();

        tracing::trace!(
            target: TRACING_TARGET_PROVIDER,
            endpoint = %endpoint,
            method = %call.method_name,
            params = call.params.len(),
            "Sending XML-RPC call"
        );

        let result = self.inner.call(endpoint, call).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(value) => {
                tracing::debug!(
                    target: TRACING_TARGET_PROVIDER,
                    endpoint = %endpoint,
                    method = %call.method_name,
                    result_type = value.type_name(),
                    elapsed_ms = elapsed.as_millis(),
                    "XML-RPC call succeeded"
                );
            }
            Err(error) if error.fault().is_some() => {
                tracing::warn!(
                    target: TRACING_TARGET_PROVIDER,
                    endpoint = %endpoint,
                    method = %call.method_name,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "XML-RPC call returned a fault"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_PROVIDER,
                    endpoint = %endpoint,
                    method = %call.method_name,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "XML-RPC call error"
                );
            }
        }

        result
    }
}
