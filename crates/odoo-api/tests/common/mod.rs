//! In-process Odoo double serving the XML-RPC endpoints over HTTP.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use odoo_api::{OdooConfig, Value};
use odoo_xmlrpc::{Fault, MethodCall, MethodResponse};
use tokio::net::TcpListener;

pub const DATABASE: &str = "test_db";
pub const USER_ID: i64 = 2;
pub const LOGIN: &str = "admin";
pub const PASSWORD: &str = "admin";

type Values = BTreeMap<String, Value>;

#[derive(Default)]
struct Records {
    partners: BTreeMap<i64, Values>,
    next_id: i64,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeOdoo {
    records: Arc<Mutex<Records>>,
}

impl FakeOdoo {
    /// Starts the server on a random local port with partner 1 seeded.
    pub async fn start() -> (Self, SocketAddr) {
        let odoo = Self::default();
        {
            let mut records = odoo.records.lock().unwrap();
            records.next_id = 2;
            records.partners.insert(
                1,
                Values::from([
                    ("id".to_owned(), Value::Int(1)),
                    ("name".to_owned(), Value::from("OceanTech")),
                    ("email".to_owned(), Value::Bool(false)),
                ]),
            );
        }

        let app = Router::new()
            .route("/xmlrpc/2/common", post(common))
            .route("/xmlrpc/2/object", post(object))
            .route("/broken/xmlrpc/2/object", post(broken))
            .with_state(odoo.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (odoo, addr)
    }

    /// Returns the `execute_kw` methods received so far.
    pub fn calls(&self) -> Vec<String> {
        self.records.lock().unwrap().calls.clone()
    }

    pub fn config(addr: SocketAddr) -> OdooConfig {
        OdooConfig {
            host: Some(format!("http://{addr}")),
            database: Some(DATABASE.to_owned()),
            user: Some(USER_ID),
            password: Some(PASSWORD.to_owned()),
            http_timeout: 5,
            ..OdooConfig::default()
        }
    }
}

fn reply(response: MethodResponse) -> Response {
    let xml = response.to_xml().unwrap();
    ([(header::CONTENT_TYPE, "text/xml")], xml).into_response()
}

fn fault(code: i64, message: &str) -> Response {
    reply(MethodResponse::Fault(Fault::new(code, message)))
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn common(body: String) -> Response {
    let call = MethodCall::from_xml(&body).unwrap();
    match call.method_name.as_str() {
        "version" => reply(MethodResponse::Success(
            [
                ("server_version", Value::from("17.0")),
                (
                    "server_version_info",
                    Value::Array(vec![
                        Value::Int(17),
                        Value::Int(0),
                        Value::Int(0),
                        Value::from("final"),
                        Value::Int(0),
                        Value::from(""),
                    ]),
                ),
                ("server_serie", Value::from("17.0")),
                ("protocol_version", Value::Int(1)),
            ]
            .into_iter()
            .collect(),
        )),
        "authenticate" => {
            let granted = call.params.first().and_then(Value::as_str) == Some(DATABASE)
                && call.params.get(1).and_then(Value::as_str) == Some(LOGIN)
                && call.params.get(2).and_then(Value::as_str) == Some(PASSWORD);
            let uid = if granted { Value::Int(USER_ID) } else { Value::Bool(false) };
            reply(MethodResponse::Success(uid))
        }
        other => fault(1, &format!("Method not available {other}")),
    }
}

async fn object(State(odoo): State<FakeOdoo>, body: String) -> Response {
    let call = MethodCall::from_xml(&body).unwrap();
    assert_eq!(call.method_name, "execute_kw");
    let [database, uid, password, model, method, args, kwargs] =
        <[Value; 7]>::try_from(call.params).unwrap();

    if database.as_str() != Some(DATABASE)
        || uid.as_i64() != Some(USER_ID)
        || password.as_str() != Some(PASSWORD)
    {
        return fault(3, "Access Denied");
    }

    if model.as_str() != Some("res.partner") {
        return fault(
            1,
            &format!("Traceback (most recent call last):\nKeyError: '{}'", model.as_str().unwrap_or_default()),
        );
    }

    let method = method.as_str().unwrap().to_owned();
    let args = args.into_array().unwrap();
    let kwargs = kwargs.into_struct().unwrap();

    let mut records = odoo.records.lock().unwrap();
    records.calls.push(method.clone());

    let result = match method.as_str() {
        "search" => {
            let ids = matching(&records.partners, &args[0]);
            Value::Array(ids.into_iter().map(Value::Int).collect())
        }
        "read" => {
            let ids = ids(&args[0]);
            let mut out = Vec::new();
            for id in ids {
                let Some(partner) = records.partners.get(&id) else {
                    return fault(
                        2,
                        "Traceback (most recent call last):\nodoo.exceptions.MissingError: \
                         Record does not exist or has been deleted.",
                    );
                };
                out.push(project(partner, kwargs.get("fields")));
            }
            Value::Array(out)
        }
        "search_read" => {
            let ids = matching(&records.partners, &args[0]);
            let limit = kwargs.get("limit").and_then(Value::as_i64).unwrap_or(0);
            let taken = if limit > 0 { limit as usize } else { ids.len() };
            Value::Array(
                ids.iter()
                    .take(taken)
                    .map(|id| project(&records.partners[id], kwargs.get("fields")))
                    .collect(),
            )
        }
        "create" => {
            let mut values = args[0].as_struct().unwrap().clone();
            let id = records.next_id;
            records.next_id += 1;
            values.insert("id".to_owned(), Value::Int(id));
            values.entry("email".to_owned()).or_insert(Value::Bool(false));
            records.partners.insert(id, values);
            Value::Int(id)
        }
        "write" => {
            let values = args[1].as_struct().unwrap().clone();
            for id in ids(&args[0]) {
                if let Some(partner) = records.partners.get_mut(&id) {
                    partner.extend(values.clone());
                }
            }
            Value::Bool(true)
        }
        "unlink" => {
            for id in ids(&args[0]) {
                records.partners.remove(&id);
            }
            Value::Bool(true)
        }
        other => return fault(1, &format!("unsupported method {other}")),
    };

    reply(MethodResponse::Success(result))
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_i64().unwrap())
        .collect()
}

/// Evaluates an implicit-and domain of `=` conditions.
fn matching(partners: &BTreeMap<i64, Values>, domain: &Value) -> Vec<i64> {
    let conditions = domain.as_array().unwrap();
    partners
        .iter()
        .filter(|(_, partner)| {
            conditions.iter().all(|condition| {
                let parts = condition.as_array().unwrap();
                assert_eq!(parts[1].as_str(), Some("="));
                partner.get(parts[0].as_str().unwrap()) == Some(&parts[2])
            })
        })
        .map(|(id, _)| *id)
        .collect()
}

fn project(partner: &Values, fields: Option<&Value>) -> Value {
    let Some(fields) = fields.and_then(Value::as_array) else {
        return Value::Struct(partner.clone());
    };

    let mut out = Values::new();
    out.insert("id".to_owned(), partner["id"].clone());
    for field in fields {
        let name = field.as_str().unwrap();
        out.insert(name.to_owned(), partner.get(name).cloned().unwrap_or(Value::Bool(false)));
    }
    Value::Struct(out)
}
