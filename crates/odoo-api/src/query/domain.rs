//! Odoo search domains.
//!
//! A domain is a list of terms in prefix (Polish) notation. Conditions at the
//! top level are implicitly combined with `&`; the empty domain matches every
//! record.

use odoo_xmlrpc::Value;
use serde_json::Value as Json;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Comparison operator of a domain condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
pub enum Operator {
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    /// Equal, or always true when the value is unset.
    #[strum(serialize = "=?")]
    EqOrUnset,
    #[strum(serialize = "=like")]
    EqLike,
    #[strum(serialize = "like")]
    Like,
    #[strum(serialize = "not like")]
    NotLike,
    #[strum(serialize = "ilike")]
    ILike,
    #[strum(serialize = "not ilike")]
    NotILike,
    #[strum(serialize = "=ilike")]
    EqILike,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "not in")]
    NotIn,
    #[strum(serialize = "child_of")]
    ChildOf,
    #[strum(serialize = "parent_of")]
    ParentOf,
}

impl Operator {
    /// Returns the operator as written in a domain.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One element of a domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainTerm {
    /// `(field, operator, value)`.
    Condition {
        field: String,
        operator: Operator,
        value: Value,
    },
    /// `&`, binds the next two terms.
    And,
    /// `|`, binds the next two terms.
    Or,
    /// `!`, negates the next term.
    Not,
}

impl DomainTerm {
    /// Number of operands the term consumes.
    fn arity(&self) -> usize {
        match self {
            Self::Condition { .. } => 0,
            Self::Not => 1,
            Self::And | Self::Or => 2,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Condition {
                field,
                operator,
                value,
            } => Value::Array(vec![
                Value::from(field),
                Value::from(operator.as_str()),
                value.clone(),
            ]),
            Self::And => Value::from("&"),
            Self::Or => Value::from("|"),
            Self::Not => Value::from("!"),
        }
    }
}

/// An Odoo search domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    terms: Vec<DomainTerm>,
}

impl Domain {
    /// Creates the empty domain, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a condition.
    #[must_use]
    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.terms.push(DomainTerm::Condition {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Appends a `&` operator.
    #[must_use]
    pub fn and(mut self) -> Self {
        self.terms.push(DomainTerm::And);
        self
    }

    /// Appends a `|` operator.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.terms.push(DomainTerm::Or);
        self
    }

    /// Appends a `!` operator.
    #[must_use]
    pub fn not(mut self) -> Self {
        self.terms.push(DomainTerm::Not);
        self
    }

    /// Appends any term.
    pub fn push(&mut self, term: DomainTerm) {
        self.terms.push(term);
    }

    /// Returns the terms.
    pub fn terms(&self) -> &[DomainTerm] {
        &self.terms
    }

    /// Returns `true` for the match-all domain.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Checks that every logical operator has enough operands.
    ///
    /// # Errors
    ///
    /// Returns an input error on field `domain` naming the position of the
    /// first operator that lacks operands.
    pub fn validate(&self) -> Result<()> {
        let mut operands = 0usize;
        for (position, term) in self.terms.iter().enumerate().rev() {
            let arity = term.arity();
            if operands < arity {
                return Err(Error::input(
                    "domain",
                    format!("Operator at position {position} is missing operands"),
                ));
            }
            operands = operands - arity + 1;
        }
        Ok(())
    }

    /// Encodes the domain as the nested arrays Odoo expects.
    pub fn to_value(&self) -> Value {
        Value::Array(self.terms.iter().map(DomainTerm::to_value).collect())
    }

    /// Parses a domain from JSON such as `[["id", "=", 1]]` or
    /// `["|", ["a", "=", 1], ["b", "=", 2]]`.
    ///
    /// # Errors
    ///
    /// Returns an input error on field `domain` when a term is malformed or
    /// uses an unknown operator.
    pub fn from_json(json: Json) -> Result<Self> {
        let Json::Array(items) = json else {
            return Err(Error::input("domain", "A domain must be a JSON array"));
        };

        let mut domain = Self::new();
        for item in items {
            domain.push(parse_term(item)?);
        }
        domain.validate()?;
        Ok(domain)
    }
}

fn parse_term(item: Json) -> Result<DomainTerm> {
    match item {
        Json::String(op) => match op.as_str() {
            "&" => Ok(DomainTerm::And),
            "|" => Ok(DomainTerm::Or),
            "!" => Ok(DomainTerm::Not),
            other => Err(Error::input(
                "domain",
                format!("Unknown logical operator '{other}', expected '&', '|' or '!'"),
            )),
        },
        Json::Array(parts) => {
            let [Json::String(field), Json::String(operator), value] =
                <[Json; 3]>::try_from(parts).map_err(|_| {
                    Error::input("domain", "A condition must be [field, operator, value]")
                })?
            else {
                return Err(Error::input(
                    "domain",
                    "Condition field and operator must be strings",
                ));
            };

            let operator = operator.parse::<Operator>().map_err(|_| {
                Error::input("domain", format!("Unknown operator '{operator}'"))
            })?;

            Ok(DomainTerm::Condition {
                field,
                operator,
                value: Value::from(value),
            })
        }
        other => Err(Error::input(
            "domain",
            format!("Unexpected domain term {other}"),
        )),
    }
}
