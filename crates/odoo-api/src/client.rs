//! Odoo client implementation.
//!
//! [`OdooClient`] issues model methods through `execute_kw` on the object
//! endpoint and the login and version calls on the common endpoint.

use std::sync::Arc;

use odoo_xmlrpc::{MethodCall, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::OdooConfig;
use crate::credentials::Credentials;
use crate::provider::{Endpoint, ReqwestProvider, RpcProvider, RpcService};
use crate::query::{
    Domain, QueryType, ReadOptions, Record, SearchOptions, SearchReadOptions, Values,
    validate_model,
};
use crate::{Error, Result, TRACING_TARGET_CLIENT};

/// Server information returned by `common.version`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    /// Human readable version, e.g. `17.0`.
    #[serde(default)]
    pub server_version: String,
    /// Version tuple, e.g. `[17, 0, 0, "final", 0, ""]`.
    #[serde(default)]
    pub server_version_info: Vec<serde_json::Value>,
    /// Major series, e.g. `17.0`.
    #[serde(default)]
    pub server_serie: String,
    /// XML-RPC protocol version.
    #[serde(default)]
    pub protocol_version: i64,
}

struct OdooClientInner {
    service: RpcService,
    credentials: Credentials,
    config: Option<OdooConfig>,
}

/// Client for the models of one Odoo database.
///
/// Clones share the HTTP connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use odoo_api::{Domain, OdooClient, Operator, SearchReadOptions};
///
/// let client = OdooClient::from_env()?;
/// let domain = Domain::new().with("is_company", Operator::Eq, true);
/// let options = SearchReadOptions::default().with_fields(["name"]).with_limit(5);
/// for partner in client.search_and_read("res.partner", &domain, options).await? {
///     println!("{:?}", partner.get("name"));
/// }
/// ```
#[derive(Clone)]
pub struct OdooClient {
    inner: Arc<OdooClientInner>,
}

impl std::fmt::Debug for OdooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdooClient")
            .field("credentials", &self.inner.credentials)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl OdooClient {
    /// Creates a client from a configuration.
    ///
    /// No request is sent; an unreachable instance surfaces on the first call.
    ///
    /// # Errors
    ///
    /// Returns an input error for the first missing or invalid value, or a
    /// configuration error when the HTTP client cannot be built.
    pub fn new(config: OdooConfig) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials()?;
        let provider = ReqwestProvider::new(&config)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            database = %credentials.database,
            user_id = credentials.user_id,
            "Creating Odoo client"
        );

        Ok(Self::from_parts(provider.into_service(), credentials, Some(config)))
    }

    /// Creates a client from the `odoo_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OdooConfig::from_env()?)
    }

    /// Creates a client that sends its calls through `provider`.
    pub fn with_provider<P>(credentials: Credentials, provider: P) -> Self
    where
        P: RpcProvider + 'static,
    {
        Self::from_parts(RpcService::new(provider), credentials, None)
    }

    /// Resolves `login` to a user id through `common.authenticate` and
    /// creates a client for that user.
    ///
    /// The password stored in `config`, if any, is ignored.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when Odoo rejects the login.
    pub async fn login(config: OdooConfig, login: &str, password: &str) -> Result<Self> {
        let service = ReqwestProvider::new(&config)?.into_service();
        let database = config.require_database()?.to_owned();
        let credentials = authenticate(&service, database, login, password).await?;
        Ok(Self::from_parts(service, credentials, Some(config)))
    }

    fn from_parts(service: RpcService, credentials: Credentials, config: Option<OdooConfig>) -> Self {
        let inner = OdooClientInner {
            service,
            credentials,
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the credentials sent with every call.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Returns the configuration the client was created from, if any.
    pub fn config(&self) -> Option<&OdooConfig> {
        self.inner.config.as_ref()
    }

    /// Returns the server version.
    pub async fn version(&self) -> Result<ServerVersion> {
        fetch_version(&self.inner.service).await
    }

    /// Returns the version of the instance named by `config`.
    ///
    /// Only the host is needed; no credentials are sent.
    pub async fn server_version(config: &OdooConfig) -> Result<ServerVersion> {
        let service = ReqwestProvider::new(config)?.into_service();
        fetch_version(&service).await
    }

    /// Runs `query_type` on `model` through `execute_kw`.
    ///
    /// `kwargs` must be a struct; pass [`Value::empty_struct`] for none.
    ///
    /// # Errors
    ///
    /// Returns an input error before any I/O when the model name or the
    /// kwargs are malformed.
    pub async fn query(
        &self,
        query_type: QueryType,
        model: &str,
        args: Vec<Value>,
        kwargs: Value,
    ) -> Result<Value> {
        validate_model(model)?;
        if kwargs.as_struct().is_none() {
            return Err(Error::input(
                "kwargs",
                format!("Keyword arguments must be a struct, got {}", kwargs.type_name()),
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model,
            method = query_type.method(),
            "Executing query"
        );

        let [database, user_id, password] = self.inner.credentials.params();
        let params = [
            database,
            user_id,
            password,
            Value::from(model),
            Value::from(query_type.method()),
            Value::Array(args),
            kwargs,
        ];
        let call = MethodCall::new("execute_kw", params);
        self.inner.service.call(Endpoint::Object, &call).await
    }

    /// Like [`query`](Self::query), taking the query type by name.
    ///
    /// # Errors
    ///
    /// Returns an input error on field `query_type` listing the available
    /// types when `query_type` is not one of them.
    pub async fn query_by_name(
        &self,
        query_type: &str,
        model: &str,
        args: Vec<Value>,
        kwargs: Value,
    ) -> Result<Value> {
        let query_type = QueryType::parse(query_type)?;
        self.query(query_type, model, args, kwargs).await
    }

    /// Returns the ids of the records matching `domain`.
    pub async fn search(
        &self,
        model: &str,
        domain: &Domain,
        options: SearchOptions,
    ) -> Result<Vec<i64>> {
        domain.validate()?;
        let value = self
            .query(
                QueryType::Search,
                model,
                vec![domain.to_value()],
                options.to_kwargs(),
            )
            .await?;
        ids_from(value)
    }

    /// Creates one record and returns its id.
    pub async fn create(&self, model: &str, values: Values) -> Result<i64> {
        let value = self
            .query(
                QueryType::Create,
                model,
                vec![Value::Struct(values)],
                Value::empty_struct(),
            )
            .await?;
        value
            .as_i64()
            .ok_or_else(|| unexpected("create", "an id", &value))
    }

    /// Creates several records in one call and returns their ids in order.
    pub async fn create_many(&self, model: &str, records: Vec<Values>) -> Result<Vec<i64>> {
        let records = records.into_iter().map(Value::Struct).collect();
        let value = self
            .query(
                QueryType::Create,
                model,
                vec![Value::Array(records)],
                Value::empty_struct(),
            )
            .await?;
        ids_from(value)
    }

    /// Reads records by id.
    pub async fn read(&self, model: &str, ids: &[i64], options: ReadOptions) -> Result<Vec<Record>> {
        let value = self
            .query(QueryType::Read, model, vec![ids_value(ids)], options.to_kwargs())
            .await?;
        crate::query::records_from(value)
    }

    /// Reads records by id into `T`.
    pub async fn read_as<T>(&self, model: &str, ids: &[i64], options: ReadOptions) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.read(model, ids, options)
            .await?
            .into_iter()
            .map(Record::deserialize)
            .collect()
    }

    /// Writes `values` to every record in `ids`.
    pub async fn update(&self, model: &str, ids: &[i64], values: Values) -> Result<bool> {
        let value = self
            .query(
                QueryType::Write,
                model,
                vec![ids_value(ids), Value::Struct(values)],
                Value::empty_struct(),
            )
            .await?;
        value
            .as_bool()
            .ok_or_else(|| unexpected("write", "a boolean", &value))
    }

    /// Deletes the records in `ids`.
    pub async fn delete(&self, model: &str, ids: &[i64]) -> Result<bool> {
        let value = self
            .query(
                QueryType::Unlink,
                model,
                vec![ids_value(ids)],
                Value::empty_struct(),
            )
            .await?;
        value
            .as_bool()
            .ok_or_else(|| unexpected("unlink", "a boolean", &value))
    }

    /// Searches and reads in one call.
    pub async fn search_and_read(
        &self,
        model: &str,
        domain: &Domain,
        options: SearchReadOptions,
    ) -> Result<Vec<Record>> {
        domain.validate()?;
        let value = self
            .query(
                QueryType::SearchRead,
                model,
                vec![domain.to_value()],
                options.to_kwargs(),
            )
            .await?;
        crate::query::records_from(value)
    }

    /// Searches and reads into `T`.
    pub async fn search_and_read_as<T>(
        &self,
        model: &str,
        domain: &Domain,
        options: SearchReadOptions,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.search_and_read(model, domain, options)
            .await?
            .into_iter()
            .map(Record::deserialize)
            .collect()
    }
}

async fn fetch_version(service: &RpcService) -> Result<ServerVersion> {
    let call = MethodCall::new("version", []);
    let value = service.call(Endpoint::Common, &call).await?;
    Ok(value.deserialize()?)
}

/// Resolves a login name to credentials through `common.authenticate`.
pub(crate) async fn authenticate(
    service: &RpcService,
    database: String,
    login: &str,
    password: &str,
) -> Result<Credentials> {
    let params = [
        Value::from(&database),
        Value::from(login),
        Value::from(password),
        Value::empty_struct(),
    ];
    let call = MethodCall::new("authenticate", params);

    match service.call(Endpoint::Common, &call).await? {
        Value::Int(user_id) => {
            tracing::info!(
                target: TRACING_TARGET_CLIENT,
                database = %database,
                user_id,
                "Authenticated"
            );
            Ok(Credentials::new(database, user_id, password))
        }
        Value::Bool(false) => Err(Error::authentication().with_message(format!(
            "Odoo rejected the login '{login}' on database '{database}'"
        ))),
        other => Err(unexpected("authenticate", "a user id", &other)),
    }
}

fn ids_value(ids: &[i64]) -> Value {
    Value::Array(ids.iter().copied().map(Value::Int).collect())
}

fn ids_from(value: Value) -> Result<Vec<i64>> {
    let Some(items) = value.as_array() else {
        return Err(unexpected("search", "an array of ids", &value));
    };
    items
        .iter()
        .map(|item| {
            item.as_i64()
                .ok_or_else(|| unexpected("search", "an integer id", item))
        })
        .collect()
}

fn unexpected(method: &str, expected: &str, got: &Value) -> Error {
    Error::serialization().with_message(format!(
        "Unexpected '{method}' result: expected {expected}, got {}",
        got.type_name()
    ))
}
