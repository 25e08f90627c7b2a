//! Client configuration.
//!
//! Values come from the environment ([`OdooConfig::from_env`]), from the
//! command line (with the `config` feature), or from [`OdooConfig::builder`].
//! Missing values are only reported when the configuration is used, so the
//! same struct can be filled from several sources.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::TRACING_TARGET_CONFIG;

/// Environment variable holding the instance URL.
pub const ENV_HOST: &str = "odoo_host";
/// Environment variable holding the database name.
pub const ENV_DATABASE: &str = "odoo_database";
/// Environment variable holding the numeric user id.
pub const ENV_USER: &str = "odoo_user";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "odoo_pass";
/// Environment variable controlling server certificate verification.
pub const ENV_VERIFY_TLS: &str = "verify_tls";
/// Environment variable holding the HTTP timeout in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "ODOO_HTTP_TIMEOUT";
/// Environment variable holding the User-Agent header.
pub const ENV_USER_AGENT: &str = "ODOO_USER_AGENT";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Database id of Odoo's `admin` user, used when no user is configured.
pub const DEFAULT_USER_ID: i64 = 1;

/// Connection settings for an Odoo instance.
#[derive(Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "OdooConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with")
)]
pub struct OdooConfig {
    /// URL of the Odoo instance, including `http://` or `https://`
    #[cfg_attr(feature = "config", arg(long = "odoo-host", env = "odoo_host"))]
    #[builder(default)]
    #[serde(default)]
    pub host: Option<String>,

    /// Database of the Odoo instance (case sensitive)
    #[cfg_attr(feature = "config", arg(long = "odoo-database", env = "odoo_database"))]
    #[builder(default)]
    #[serde(default)]
    pub database: Option<String>,

    /// Database id of the user to connect with (defaults to 1, the admin)
    #[cfg_attr(feature = "config", arg(long = "odoo-user", env = "odoo_user"))]
    #[builder(default)]
    #[serde(default)]
    pub user: Option<i64>,

    /// Password of the user to connect with
    #[cfg_attr(
        feature = "config",
        arg(long = "odoo-pass", env = "odoo_pass", hide_env_values = true)
    )]
    #[builder(default)]
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Verify the server certificate on https connections
    #[cfg_attr(
        feature = "config",
        arg(
            long = "verify-tls",
            env = "verify_tls",
            default_value_t = true,
            action = clap::ArgAction::Set,
            value_parser = clap::builder::BoolishValueParser::new()
        )
    )]
    #[builder(default = "true")]
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "ODOO_HTTP_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)
    )]
    #[builder(default = "DEFAULT_TIMEOUT_SECS")]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(feature = "config", arg(long = "http-user-agent", env = "ODOO_USER_AGENT"))]
    #[builder(default)]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for OdooConfig {
    fn default() -> Self {
        Self {
            host: None,
            database: None,
            user: None,
            password: None,
            verify_tls: default_verify_tls(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for OdooConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdooConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("verify_tls", &self.verify_tls)
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl OdooConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> OdooConfigBuilder {
        OdooConfigBuilder::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an input error if `odoo_user`, `verify_tls` or
    /// `ODOO_HTTP_TIMEOUT` is set to a value that does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let user = value(ENV_USER)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| {
                    Error::input(
                        ENV_USER,
                        format!("The odoo user id must be an integer, got '{raw}'"),
                    )
                })
            })
            .transpose()?;

        let verify_tls = value(ENV_VERIFY_TLS)
            .map(|raw| parse_bool(&raw).ok_or_else(|| {
                Error::input(
                    ENV_VERIFY_TLS,
                    format!("Expected true or false, got '{raw}'"),
                )
            }))
            .transpose()?
            .unwrap_or_else(default_verify_tls);

        let http_timeout = value(ENV_HTTP_TIMEOUT)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    Error::input(
                        ENV_HTTP_TIMEOUT,
                        format!("Expected a number of seconds, got '{raw}'"),
                    )
                })
            })
            .transpose()?
            .unwrap_or_else(default_timeout_secs);

        Ok(Self {
            host: value(ENV_HOST),
            database: value(ENV_DATABASE),
            user,
            password: value(ENV_PASSWORD),
            verify_tls,
            http_timeout,
            user_agent: value(ENV_USER_AGENT),
        })
    }

    /// Validates that every required value is present and well formed.
    ///
    /// # Errors
    ///
    /// Returns an input error naming the first missing or invalid field,
    /// checked in the order host, database, user, password.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        self.credentials_unlogged()?;
        Ok(())
    }

    /// Returns the parsed instance URL.
    pub fn base_url(&self) -> Result<Url> {
        let host = required(&self.host, ENV_HOST, "The hostname of your Odoo instance is required")?;

        let url = Url::parse(host.trim()).map_err(|e| {
            Error::input(
                ENV_HOST,
                format!("'{host}' is not a valid URL. Include the http(s):// at the beginning"),
            )
            .with_source(e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::input(
                ENV_HOST,
                format!("Unsupported scheme '{}', use http or https", url.scheme()),
            ));
        }

        Ok(url)
    }

    /// Returns the credentials used for every `execute_kw` call.
    ///
    /// When no user id is configured the admin id is used and a warning is
    /// logged.
    pub fn credentials(&self) -> Result<Credentials> {
        let credentials = self.credentials_unlogged()?;
        if self.user.is_none() {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                user_id = DEFAULT_USER_ID,
                "The odoo user id is not set, defaulting to the admin user"
            );
        }
        Ok(credentials)
    }

    /// Returns the database name, or an input error when it is missing.
    pub(crate) fn require_database(&self) -> Result<&str> {
        required(
            &self.database,
            ENV_DATABASE,
            "The database name of your Odoo instance is required",
        )
    }

    fn credentials_unlogged(&self) -> Result<Credentials> {
        let database = self.require_database()?;
        let user_id = self.user.unwrap_or(DEFAULT_USER_ID);
        let password = required(
            &self.password,
            ENV_PASSWORD,
            "The password of your Odoo user is required",
        )?;

        Ok(Credentials::new(database, user_id, password))
    }

    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using the default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|agent| !agent.is_empty())
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("odoo-api/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Logs the configuration without the password.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = self.host.as_deref().unwrap_or_default(),
            database = self.database.as_deref().unwrap_or_default(),
            user = ?self.user,
            verify_tls = self.verify_tls,
            http_timeout_secs = self.effective_timeout().as_secs(),
            "Odoo configuration"
        );
    }
}

impl OdooConfigBuilder {
    /// Builds the configuration and validates it.
    pub fn build_validated(self) -> Result<OdooConfig> {
        let config = self.build().map_err(|e| {
            Error::configuration()
                .with_message(e.to_string())
                .with_source(e)
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn required<'a>(
    value: &'a Option<String>,
    variable: &'static str,
    what: &str,
) -> Result<&'a str> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::input(
            variable,
            format!(
                "{what}. Set this by doing `export {variable}='<value>'` and run the program again"
            ),
        )),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_HOST, "https://erp.example.com"),
            (ENV_DATABASE, "production"),
            (ENV_USER, "2"),
            (ENV_PASSWORD, "secret"),
        ]
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let config = OdooConfig::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.host.as_deref(), Some("https://erp.example.com"));
        assert_eq!(config.database.as_deref(), Some("production"));
        assert_eq!(config.user, Some(2));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert!(config.verify_tls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_values_are_reported_in_order() {
        let config = OdooConfig::from_lookup(lookup(&[])).unwrap();
        let error = config.validate().unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidInput);
        assert_eq!(error.field(), Some(ENV_HOST));

        let config = OdooConfig::from_lookup(lookup(&[(ENV_HOST, "http://localhost:8069")])).unwrap();
        assert_eq!(config.validate().unwrap_err().field(), Some(ENV_DATABASE));

        let config = OdooConfig::from_lookup(lookup(&[
            (ENV_HOST, "http://localhost:8069"),
            (ENV_DATABASE, "db"),
        ]))
        .unwrap();
        let error = config.validate().unwrap_err();
        assert_eq!(error.field(), Some(ENV_PASSWORD));
        assert!(error.to_string().contains("export odoo_pass="));
    }

    #[test]
    fn test_credentials_are_sent_verbatim() {
        let config = OdooConfig::builder()
            .with_host("https://erp.example.com")
            .with_database(" db ")
            .with_password("  pw with spaces  ")
            .build()
            .unwrap();

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.database, " db ");
        assert_eq!(credentials.password, "  pw with spaces  ");

        let blank = OdooConfig {
            password: Some("   ".to_owned()),
            ..config
        };
        assert_eq!(blank.credentials().unwrap_err().field(), Some(ENV_PASSWORD));
    }

    #[test]
    fn test_missing_user_defaults_to_admin() {
        let vars: Vec<_> = complete().into_iter().filter(|(k, _)| *k != ENV_USER).collect();
        let config = OdooConfig::from_lookup(lookup(&vars)).unwrap();
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn test_non_numeric_user_is_rejected() {
        let mut vars: Vec<_> = complete().into_iter().filter(|(k, _)| *k != ENV_USER).collect();
        vars.push((ENV_USER, "admin"));
        let error = OdooConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(error.field(), Some(ENV_USER));
    }

    #[test]
    fn test_verify_tls_parses_booleans() {
        for (raw, expected) in [("false", false), ("0", false), ("OFF", false), ("true", true)] {
            let mut vars = complete();
            vars.push((ENV_VERIFY_TLS, raw));
            let config = OdooConfig::from_lookup(lookup(&vars)).unwrap();
            assert_eq!(config.verify_tls, expected, "verify_tls={raw}");
        }

        let mut vars = complete();
        vars.push((ENV_VERIFY_TLS, "maybe"));
        let error = OdooConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(error.field(), Some(ENV_VERIFY_TLS));
    }

    #[test]
    fn test_host_must_be_http_url() {
        let config = OdooConfig::builder()
            .with_host("erp.example.com")
            .with_database("db")
            .with_password("pw")
            .build()
            .unwrap();
        assert_eq!(config.validate().unwrap_err().field(), Some(ENV_HOST));

        let config = OdooConfig::builder()
            .with_host("ftp://erp.example.com")
            .with_database("db")
            .with_password("pw")
            .build()
            .unwrap();
        assert_eq!(config.validate().unwrap_err().field(), Some(ENV_HOST));
    }

    #[test]
    fn test_builder_defaults() {
        let config = OdooConfig::builder()
            .with_host("http://localhost:8069")
            .with_database("db")
            .with_user(5)
            .with_password("pw")
            .build_validated()
            .unwrap();

        assert!(config.verify_tls);
        assert_eq!(config.http_timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.credentials().unwrap().user_id, 5);
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = OdooConfig {
            http_timeout: 0,
            ..Default::default()
        };
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_effective_user_agent_uses_default_when_none() {
        let config = OdooConfig::default();
        assert!(config.effective_user_agent().starts_with("odoo-api/"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = OdooConfig::from_lookup(lookup(&complete())).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
