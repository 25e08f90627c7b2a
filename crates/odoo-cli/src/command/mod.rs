//! Subcommands of the `odoo` binary.

mod check;

use anyhow::{Context, bail};
use clap::Subcommand;
use odoo_api::{
    Domain, OdooClient, OdooConfig, ReadOptions, Record, SearchOptions, SearchReadOptions,
    Value, Values,
};
use serde_json::Value as Json;

use crate::TRACING_TARGET_COMMAND;

/// What to run against the instance.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the server version (needs only the host)
    Version,

    /// Print the ids of the records matching a domain
    Search {
        /// Model name, e.g. res.partner
        model: String,
        /// Domain as JSON, e.g. '[["id","=",1]]'
        #[arg(long, value_parser = parse_json, default_value = "[]")]
        domain: Json,
        /// Maximum number of ids
        #[arg(long)]
        limit: Option<u32>,
        /// Number of matches to skip
        #[arg(long)]
        offset: Option<u32>,
        /// Sort order, e.g. "name asc"
        #[arg(long)]
        order: Option<String>,
    },

    /// Print records by id
    Read {
        /// Model name
        model: String,
        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Comma separated fields to read (all when omitted)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Print the records matching a domain
    SearchRead {
        /// Model name
        model: String,
        /// Domain as JSON
        #[arg(long, value_parser = parse_json, default_value = "[]")]
        domain: Json,
        /// Comma separated fields to read (all when omitted)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        /// Maximum number of records
        #[arg(long)]
        limit: Option<u32>,
        /// Number of matches to skip
        #[arg(long)]
        offset: Option<u32>,
        /// Sort order
        #[arg(long)]
        order: Option<String>,
    },

    /// Create a record and print its id
    Create {
        /// Model name
        model: String,
        /// Field values as a JSON object
        #[arg(value_parser = parse_json)]
        values: Json,
    },

    /// Write field values to records
    Update {
        /// Model name
        model: String,
        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Field values as a JSON object
        #[arg(long, value_parser = parse_json)]
        values: Json,
    },

    /// Delete records
    Delete {
        /// Model name
        model: String,
        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Run a query type with raw arguments
    Query {
        /// One of search, create, read, write, unlink, search_read
        query_type: String,
        /// Model name
        model: String,
        /// Positional arguments as a JSON array
        #[arg(long, value_parser = parse_json, default_value = "[]")]
        args: Json,
        /// Keyword arguments as a JSON object
        #[arg(long, value_parser = parse_json, default_value = "{}")]
        kwargs: Json,
    },

    /// Create, rename and delete a test partner to verify the connection
    Check,
}

impl Command {
    /// Returns the subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Search { .. } => "search",
            Self::Read { .. } => "read",
            Self::SearchRead { .. } => "search-read",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Query { .. } => "query",
            Self::Check => "check",
        }
    }

    /// Runs the command and prints its result as JSON on stdout.
    pub async fn run(self, config: &OdooConfig) -> anyhow::Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_COMMAND,
            command = self.name(),
            "Running command"
        );

        if matches!(self, Self::Version) {
            let version = OdooClient::server_version(config)
                .await
                .context("failed to fetch the server version")?;
            return print(&serde_json::to_value(version)?);
        }

        let client = OdooClient::new(config.clone()).context("invalid Odoo configuration")?;

        match self {
            Self::Version => Ok(()),
            Self::Search {
                model,
                domain,
                limit,
                offset,
                order,
            } => {
                let domain = Domain::from_json(domain).context("invalid --domain")?;
                let options = SearchOptions {
                    limit,
                    offset,
                    order,
                };
                let ids = client.search(&model, &domain, options).await?;
                print(&Json::from(ids))
            }
            Self::Read { model, ids, fields } => {
                let options = ReadOptions { fields };
                let records = client.read(&model, &ids, options).await?;
                print(&records_json(records))
            }
            Self::SearchRead {
                model,
                domain,
                fields,
                limit,
                offset,
                order,
            } => {
                let domain = Domain::from_json(domain).context("invalid --domain")?;
                let options = SearchReadOptions {
                    fields,
                    limit,
                    offset,
                    order,
                };
                let records = client.search_and_read(&model, &domain, options).await?;
                print(&records_json(records))
            }
            Self::Create { model, values } => {
                let id = client.create(&model, to_values(values)?).await?;
                print(&Json::from(id))
            }
            Self::Update { model, ids, values } => {
                let updated = client.update(&model, &ids, to_values(values)?).await?;
                print(&Json::from(updated))
            }
            Self::Delete { model, ids } => {
                let deleted = client.delete(&model, &ids).await?;
                print(&Json::from(deleted))
            }
            Self::Query {
                query_type,
                model,
                args,
                kwargs,
            } => {
                let Some(args) = Value::from(args).into_array() else {
                    bail!("--args must be a JSON array");
                };
                let result = client
                    .query_by_name(&query_type, &model, args, Value::from(kwargs))
                    .await?;
                print(&Json::from(result))
            }
            Self::Check => check::run(&client).await,
        }
    }
}

fn parse_json(raw: &str) -> Result<Json, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

fn to_values(json: Json) -> anyhow::Result<Values> {
    match Value::from(json) {
        Value::Struct(values) => Ok(values),
        other => bail!("values must be a JSON object, got {}", other.type_name()),
    }
}

fn records_json(records: Vec<Record>) -> Json {
    Json::Array(records.into_iter().map(Json::from).collect())
}

fn print(json: &Json) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(json)?);
    Ok(())
}
