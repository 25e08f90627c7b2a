//! Interop between XML-RPC values and `serde_json`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{Deserialize, DeserializeOwned, Deserializer, Error as _};
use serde_json::{Map, Number, Value as Json};

use crate::value::Value;

impl From<Value> for Json {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => Json::Null,
            Value::Bool(value) => Json::Bool(value),
            Value::Int(value) => Json::Number(value.into()),
            Value::Double(value) => Number::from_f64(value).map_or(Json::Null, Json::Number),
            Value::String(value) => Json::String(value),
            Value::DateTime(value) => Json::String(value.to_string()),
            Value::Base64(bytes) => Json::String(STANDARD.encode(bytes)),
            Value::Array(values) => Json::Array(values.into_iter().map(Json::from).collect()),
            Value::Struct(members) => Json::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key, Json::from(value)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

/// Integers outside the `i64` range have no XML-RPC type and become
/// [`Value::Double`], losing precision past 2^53.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Nil,
            Json::Bool(value) => Value::Bool(value),
            Json::Number(number) => match (number.as_i64(), number.as_u64()) {
                (Some(value), _) => Value::Int(value),
                (None, Some(value)) => Value::Double(value as f64),
                (None, None) => Value::Double(number.as_f64().unwrap_or_default()),
            },
            Json::String(value) => Value::String(value),
            Json::Array(values) => Value::Array(values.into_iter().map(Value::from).collect()),
            Json::Object(members) => Value::Struct(
                members
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Deserializes this value into `T` through its JSON representation.
    pub fn deserialize<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_value(Json::from(self))
    }
}

/// Deserializes an Odoo field that uses `false` for "no value".
///
/// Odoo sends `false` for empty char, date and many2one fields. Use with
/// `#[serde(deserialize_with = "deserialize_odoo_nullable", default)]` on an
/// `Option<T>` field.
pub fn deserialize_odoo_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Json::deserialize(deserializer)? {
        Json::Null | Json::Bool(false) => Ok(None),
        other => T::deserialize(other).map(Some).map_err(D::Error::custom),
    }
}
