//! Records returned by `read` and `search_read`.

use std::collections::BTreeMap;

use odoo_xmlrpc::Value;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Field values keyed by field name, as sent to `create` and `write`.
pub type Values = BTreeMap<String, Value>;

/// One record: its fields and their values.
///
/// Odoo always includes `id`. Empty non-boolean fields are `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Values,
}

impl Record {
    /// Returns the database id.
    pub fn id(&self) -> Option<i64> {
        self.fields.get("id").and_then(Value::as_i64)
    }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Values {
        &self.fields
    }

    /// Consumes the record and returns its fields.
    pub fn into_fields(self) -> Values {
        self.fields
    }

    /// Deserializes the record into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        Ok(Value::Struct(self.fields).deserialize()?)
    }
}

impl From<Values> for Record {
    fn from(fields: Values) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.into_struct().map(Self::from).ok_or_else(|| {
            Error::serialization().with_message("Expected a record struct in the response")
        })
    }
}

impl From<Record> for serde_json::Value {
    fn from(record: Record) -> Self {
        Value::Struct(record.fields).into()
    }
}

/// Decodes an array of record structs.
pub(crate) fn records_from(value: Value) -> Result<Vec<Record>> {
    value
        .into_array()
        .ok_or_else(|| Error::serialization().with_message("Expected an array of records"))?
        .into_iter()
        .map(Record::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_accessors() {
        let record = Record::try_from(Value::from(json!({"id": 1, "name": "OceanTech"}))).unwrap();
        assert_eq!(record.id(), Some(1));
        assert_eq!(record.get("name"), Some(&Value::from("OceanTech")));
        assert!(record.get("email").is_none());
    }

    #[test]
    fn test_records_from_rejects_non_structs() {
        assert!(records_from(Value::Array(vec![Value::Int(1)])).is_err());
        assert!(records_from(Value::Bool(true)).is_err());
        assert!(records_from(Value::Array(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn test_record_deserialize() {
        #[derive(Deserialize)]
        struct Partner {
            id: i64,
            name: String,
        }

        let record = Record::try_from(Value::from(json!({"id": 4, "name": "abc"}))).unwrap();
        let partner: Partner = record.deserialize().unwrap();
        assert_eq!((partner.id, partner.name.as_str()), (4, "abc"));
    }
}
