//! Reqwest-based XML-RPC transport.

use std::sync::Arc;

use odoo_xmlrpc::{MethodCall, MethodResponse, Value};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::error::Error;
use super::{Endpoint, RpcProvider, RpcService};
use crate::TRACING_TARGET_PROVIDER;
use crate::config::OdooConfig;

/// Inner state shared by clones of the provider.
struct ReqwestProviderInner {
    http: Client,
    base_url: Url,
}

/// Reqwest-based provider posting XML-RPC documents to an Odoo instance.
///
/// The underlying connection pool is shared by every clone, so one provider
/// can serve any number of concurrent calls.
///
/// # Examples
///
/// ```rust,ignore
/// use odoo_api::provider::{Endpoint, ReqwestProvider, RpcProvider};
///
/// let provider = ReqwestProvider::new(&config)?;
/// let version = provider.call(Endpoint::Common, &MethodCall::new("version", [])).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestProvider {
    inner: Arc<ReqwestProviderInner>,
}

impl std::fmt::Debug for ReqwestProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestProvider")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ReqwestProvider {
    /// Creates a provider for the instance named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an input error when the host is missing or not a URL, and a
    /// configuration error when the HTTP client cannot be built.
    pub fn new(config: &OdooConfig) -> crate::Result<Self> {
        let base_url = config.base_url()?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            verify_tls = config.verify_tls,
            "Creating reqwest provider"
        );

        if !config.verify_tls {
            tracing::warn!(
                target: TRACING_TARGET_PROVIDER,
                "TLS certificate verification is disabled"
            );
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| {
                crate::Error::configuration()
                    .with_message("Failed to create HTTP client")
                    .with_source(e)
            })?;

        let inner = ReqwestProviderInner { http, base_url };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the instance URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Converts this provider into an [`RpcService`].
    pub fn into_service(self) -> RpcService {
        RpcService::new(self)
    }

    async fn post(&self, endpoint: Endpoint, call: &MethodCall) -> Result<Value, Error> {
        let url = endpoint.url(&self.inner.base_url);
        let body = call.to_xml()?;

        let response = self
            .inner
            .http
            .post(url)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::status(status, &text));
        }

        Ok(match MethodResponse::from_xml(&text)? {
            MethodResponse::Success(value) => value,
            MethodResponse::Fault(fault) => return Err(fault.into()),
        })
    }
}

#[async_trait::async_trait]
impl RpcProvider for ReqwestProvider {
    async fn call(&self, endpoint: Endpoint, call: &MethodCall) -> crate::Result<Value> {
        Ok(self.post(endpoint, call).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn config(host: &str) -> OdooConfig {
        OdooConfig {
            host: Some(host.to_owned()),
            database: Some("db".to_owned()),
            password: Some("pw".to_owned()),
            ..OdooConfig::default()
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = ReqwestProvider::new(&config("https://demo.odoo.com")).unwrap();
        assert_eq!(provider.base_url().as_str(), "https://demo.odoo.com/");
    }

    #[test]
    fn test_provider_without_tls_verification() {
        let config = OdooConfig {
            verify_tls: false,
            ..config("https://localhost:8443")
        };
        assert!(ReqwestProvider::new(&config).is_ok());
    }

    #[test]
    fn test_provider_rejects_invalid_host() {
        let error = ReqwestProvider::new(&config("demo.odoo.com")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.field(), Some("odoo_host"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        let provider = ReqwestProvider::new(&config("http://127.0.0.1:1")).unwrap();
        let error = provider
            .call(Endpoint::Common, &MethodCall::new("version", []))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NetworkError);
        assert!(error.is_retryable());
    }
}
