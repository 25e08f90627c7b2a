//! `methodCall` documents.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};
use crate::tree::Element;
use crate::value::Value;

/// An XML-RPC method call.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Name of the remote method, e.g. `execute_kw`.
    pub method_name: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Creates a new method call.
    pub fn new(method_name: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            method_name: method_name.into(),
            params: params.into_iter().collect(),
        }
    }

    /// Encodes the call as a UTF-8 XML document.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        writer.write_event(Event::Start(BytesStart::new("methodCall")))?;
        writer.write_event(Event::Start(BytesStart::new("methodName")))?;
        writer.write_event(Event::Text(BytesText::new(&self.method_name)))?;
        writer.write_event(Event::End(BytesEnd::new("methodName")))?;
        writer.write_event(Event::Start(BytesStart::new("params")))?;
        for param in &self.params {
            writer.write_event(Event::Start(BytesStart::new("param")))?;
            param.write(&mut writer)?;
            writer.write_event(Event::End(BytesEnd::new("param")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("params")))?;
        writer.write_event(Event::End(BytesEnd::new("methodCall")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::syntax(format!("encoded call is not UTF-8: {e}")))
    }

    /// Decodes a `methodCall` document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        if root.name != "methodCall" {
            return Err(Error::syntax(format!(
                "expected <methodCall>, found <{}>",
                root.name
            )));
        }

        let method_name = root.require("methodName")?.text.trim().to_owned();
        let params = match root.child("params") {
            Some(params) => params
                .elements()
                .map(|param| Value::from_element(param.require("value")?))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            method_name,
            params,
        })
    }
}
