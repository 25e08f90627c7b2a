//! The XML-RPC value model.

use std::collections::BTreeMap;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jiff::civil::DateTime;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};
use crate::tree::Element;

/// Wire format of `<dateTime.iso8601>` values.
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// A single XML-RPC value.
///
/// Odoo exchanges records as [`Value::Struct`] maps and id lists as
/// [`Value::Array`]s of [`Value::Int`]. Empty relational or text fields are
/// reported as `Bool(false)` rather than `Nil`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `<nil/>`.
    #[default]
    Nil,
    /// `<boolean>`.
    Bool(bool),
    /// `<int>`, `<i4>` and `<i8>`.
    Int(i64),
    /// `<double>`.
    Double(f64),
    /// `<string>`, or an untyped `<value>`.
    String(String),
    /// `<dateTime.iso8601>`, without time zone.
    DateTime(DateTime),
    /// `<base64>`, decoded.
    Base64(Vec<u8>),
    /// `<array>`.
    Array(Vec<Value>),
    /// `<struct>`.
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// Creates an empty struct value.
    pub fn empty_struct() -> Self {
        Self::Struct(BTreeMap::new())
    }

    /// Returns `true` for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the integer, if this is an [`Value::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the members, if this is a [`Value::Struct`].
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Consumes the value and returns its elements, if it is an array.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Consumes the value and returns its members, if it is a struct.
    pub fn into_struct(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a struct member by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct().and_then(|members| members.get(key))
    }

    /// Name of the XML element carrying this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Int(value) if i32::try_from(*value).is_ok() => "int",
            Self::Int(_) => "i8",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::DateTime(_) => "dateTime.iso8601",
            Self::Base64(_) => "base64",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }

    /// Writes this value as a `<value>` element.
    pub(crate) fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("value")))?;

        match self {
            Self::Nil => {
                writer.write_event(Event::Empty(BytesStart::new("nil")))?;
            }
            Self::Bool(value) => {
                write_scalar(writer, "boolean", if *value { "1" } else { "0" })?;
            }
            Self::Int(value) => {
                write_scalar(writer, self.type_name(), &value.to_string())?;
            }
            Self::Double(value) => {
                if !value.is_finite() {
                    return Err(Error::value("double", value.to_string()));
                }
                write_scalar(writer, "double", &value.to_string())?;
            }
            Self::String(value) => {
                write_scalar(writer, "string", value)?;
            }
            Self::DateTime(value) => {
                let text = value.strftime(DATETIME_FORMAT).to_string();
                write_scalar(writer, "dateTime.iso8601", &text)?;
            }
            Self::Base64(bytes) => {
                write_scalar(writer, "base64", &STANDARD.encode(bytes))?;
            }
            Self::Array(values) => {
                writer.write_event(Event::Start(BytesStart::new("array")))?;
                writer.write_event(Event::Start(BytesStart::new("data")))?;
                for value in values {
                    value.write(writer)?;
                }
                writer.write_event(Event::End(BytesEnd::new("data")))?;
                writer.write_event(Event::End(BytesEnd::new("array")))?;
            }
            Self::Struct(members) => {
                writer.write_event(Event::Start(BytesStart::new("struct")))?;
                for (name, value) in members {
                    writer.write_event(Event::Start(BytesStart::new("member")))?;
                    write_scalar(writer, "name", name)?;
                    value.write(writer)?;
                    writer.write_event(Event::End(BytesEnd::new("member")))?;
                }
                writer.write_event(Event::End(BytesEnd::new("struct")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("value")))?;
        Ok(())
    }

    /// Decodes a `<value>` element.
    pub(crate) fn from_element(element: &Element) -> Result<Self> {
        if element.name != "value" {
            return Err(Error::syntax(format!(
                "expected <value>, found <{}>",
                element.name
            )));
        }

        let Some(typed) = element.only_child()? else {
            return Ok(Self::String(element.text.clone()));
        };

        let text = typed.text.trim();
        match typed.name.as_str() {
            "string" => Ok(Self::String(typed.text.clone())),
            "int" | "i4" | "i8" | "i1" | "i2" | "biginteger" => text
                .parse()
                .map(Self::Int)
                .map_err(|_| Error::value("int", text)),
            "boolean" => match text {
                "1" | "true" => Ok(Self::Bool(true)),
                "0" | "false" => Ok(Self::Bool(false)),
                _ => Err(Error::value("boolean", text)),
            },
            "double" | "float" | "bigdecimal" => text
                .parse()
                .map(Self::Double)
                .map_err(|_| Error::value("double", text)),
            "dateTime.iso8601" => parse_datetime(text).map(Self::DateTime),
            "base64" => {
                let compact: String = text.split_whitespace().collect();
                STANDARD
                    .decode(compact.as_bytes())
                    .map(Self::Base64)
                    .map_err(|_| Error::value("base64", text))
            }
            "nil" => Ok(Self::Nil),
            "array" => {
                let Some(data) = typed.child("data") else {
                    return Ok(Self::Array(Vec::new()));
                };
                data.elements()
                    .map(Self::from_element)
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Array)
            }
            "struct" => {
                let mut members = BTreeMap::new();
                for member in typed.elements() {
                    if member.name != "member" {
                        return Err(Error::syntax(format!(
                            "expected <member> in <struct>, found <{}>",
                            member.name
                        )));
                    }
                    let name = member
                        .child("name")
                        .ok_or_else(|| Error::syntax("<member> without <name>"))?;
                    let value = member
                        .child("value")
                        .ok_or_else(|| Error::syntax("<member> without <value>"))?;
                    members.insert(name.text.clone(), Self::from_element(value)?);
                }
                Ok(Self::Struct(members))
            }
            other => Err(Error::syntax(format!("unsupported value type <{other}>"))),
        }
    }
}

/// Writes `<tag>text</tag>`, escaping the text.
fn write_scalar<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Accepts both the compact XML-RPC form and the dashed ISO 8601 form.
fn parse_datetime(text: &str) -> Result<DateTime> {
    DateTime::strptime(DATETIME_FORMAT, text)
        .or_else(|_| text.parse::<DateTime>())
        .map_err(|_| Error::value("dateTime.iso8601", text))
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(members: BTreeMap<K, V>) -> Self {
        Self::Struct(
            members
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Struct(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
