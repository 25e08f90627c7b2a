//! Keyword options of the model methods.

use std::collections::BTreeMap;

use odoo_xmlrpc::Value;
use serde::{Deserialize, Serialize};

/// Options for `search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of ids to return. Unset means no limit.
    pub limit: Option<u32>,
    /// Number of matches to skip, for pagination together with `limit`.
    pub offset: Option<u32>,
    /// Sort order, e.g. `name asc, id desc`.
    pub order: Option<String>,
}

impl SearchOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// `limit` is always sent; Odoo treats `0` as "no limit".
    pub(crate) fn to_kwargs(&self) -> Value {
        let mut kwargs = BTreeMap::new();
        kwargs.insert("limit".to_owned(), Value::from(self.limit.unwrap_or(0)));
        insert_paging(&mut kwargs, None, self.offset, self.order.as_deref());
        Value::Struct(kwargs)
    }
}

/// Options for `read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Fields to read. Empty reads every field.
    pub fields: Vec<String>,
}

impl ReadOptions {
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn to_kwargs(&self) -> Value {
        let mut kwargs = BTreeMap::new();
        insert_fields(&mut kwargs, &self.fields);
        Value::Struct(kwargs)
    }
}

/// Options for `search_read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReadOptions {
    /// Fields to read. Empty reads every field.
    pub fields: Vec<String>,
    /// Maximum number of records to return.
    pub limit: Option<u32>,
    /// Number of matches to skip.
    pub offset: Option<u32>,
    /// Sort order.
    pub order: Option<String>,
}

impl SearchReadOptions {
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub(crate) fn to_kwargs(&self) -> Value {
        let mut kwargs = BTreeMap::new();
        insert_fields(&mut kwargs, &self.fields);
        insert_paging(&mut kwargs, self.limit, self.offset, self.order.as_deref());
        Value::Struct(kwargs)
    }
}

impl From<ReadOptions> for SearchReadOptions {
    fn from(options: ReadOptions) -> Self {
        Self {
            fields: options.fields,
            ..Self::default()
        }
    }
}

fn insert_fields(kwargs: &mut BTreeMap<String, Value>, fields: &[String]) {
    if !fields.is_empty() {
        kwargs.insert("fields".to_owned(), Value::from(fields.to_vec()));
    }
}

fn insert_paging(
    kwargs: &mut BTreeMap<String, Value>,
    limit: Option<u32>,
    offset: Option<u32>,
    order: Option<&str>,
) {
    if let Some(limit) = limit {
        kwargs.insert("limit".to_owned(), Value::from(limit));
    }
    if let Some(offset) = offset {
        kwargs.insert("offset".to_owned(), Value::from(offset));
    }
    if let Some(order) = order {
        kwargs.insert("order".to_owned(), Value::from(order));
    }
}
