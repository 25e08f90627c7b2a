//! Scripted provider for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! odoo-api = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use odoo_api::provider::MockProvider;
//!
//! let provider = MockProvider::new().with_reply(Value::Array(vec![Value::Int(7)]));
//! let client = OdooClient::with_provider(credentials, provider.clone());
//! assert_eq!(client.search("res.partner", &Domain::new(), Default::default()).await?, [7]);
//! assert_eq!(provider.calls()[0].1.method_name, "execute_kw");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use odoo_xmlrpc::{Fault, MethodCall, Value};

use super::{Endpoint, Result, RpcProvider};
use crate::Error;

#[derive(Default)]
struct MockState {
    replies: VecDeque<Result<Value>>,
    calls: Vec<(Endpoint, MethodCall)>,
}

/// Provider that records every call and answers with queued replies.
///
/// Once the queue is empty each call is answered with `true`.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").finish_non_exhaustive()
    }
}

impl MockProvider {
    /// Creates a provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn with_reply(self, value: impl Into<Value>) -> Self {
        self.push(Ok(value.into()));
        self
    }

    /// Queues a fault reply.
    #[must_use]
    pub fn with_fault(self, fault: Fault) -> Self {
        self.push(Err(fault.into()));
        self
    }

    /// Queues an arbitrary error.
    #[must_use]
    pub fn with_error(self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    /// Returns the calls received so far.
    pub fn calls(&self) -> Vec<(Endpoint, MethodCall)> {
        self.lock().calls.clone()
    }

    fn push(&self, reply: Result<Value>) {
        self.lock().replies.push_back(reply);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl RpcProvider for MockProvider {
    async fn call(&self, endpoint: Endpoint, call: &MethodCall) -> Result<Value> {
        let mut state = self.lock();
        state.calls.push((endpoint, call.clone()));
        state.replies.pop_front().unwrap_or(Ok(Value::Bool(true)))
    }
}
