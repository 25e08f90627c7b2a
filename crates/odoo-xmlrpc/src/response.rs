//! `methodResponse` documents.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::{Error, Result};
use crate::fault::Fault;
use crate::tree::Element;
use crate::value::Value;

/// The outcome of a method call: either one result value or a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Fault(Fault),
}

impl MethodResponse {
    /// Decodes a `methodResponse` document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        if root.name != "methodResponse" {
            return Err(Error::syntax(format!(
                "expected <methodResponse>, found <{}>",
                root.name
            )));
        }

        if let Some(fault) = root.child("fault") {
            let value = Value::from_element(fault.require("value")?)?;
            return Fault::from_value(value).map(Self::Fault);
        }

        let params = root.require("params")?;
        let mut params = params.elements();
        let param = params
            .next()
            .ok_or_else(|| Error::syntax("<params> of a response must hold one <param>"))?;
        if params.next().is_some() {
            return Err(Error::syntax("response has more than one <param>"));
        }

        Value::from_element(param.require("value")?).map(Self::Success)
    }

    /// Encodes the response as a UTF-8 XML document.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        writer.write_event(Event::Start(BytesStart::new("methodResponse")))?;
        match self {
            Self::Success(value) => {
                writer.write_event(Event::Start(BytesStart::new("params")))?;
                writer.write_event(Event::Start(BytesStart::new("param")))?;
                value.write(&mut writer)?;
                writer.write_event(Event::End(BytesEnd::new("param")))?;
                writer.write_event(Event::End(BytesEnd::new("params")))?;
            }
            Self::Fault(fault) => {
                writer.write_event(Event::Start(BytesStart::new("fault")))?;
                fault.to_value().write(&mut writer)?;
                writer.write_event(Event::End(BytesEnd::new("fault")))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("methodResponse")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::syntax(format!("encoded response is not UTF-8: {e}")))
    }

    /// Converts the response into the result value or the fault.
    pub fn into_result(self) -> std::result::Result<Value, Fault> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Fault(fault) => Err(fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultCode;

    #[test]
    fn test_decode_success() {
        let response = MethodResponse::from_xml(
            "<?xml version='1.0'?>\n<methodResponse>\n<params>\n<param>\n\
             <value><array><data>\n<value><int>1</int></value>\n</data></array></value>\n\
             </param>\n</params>\n</methodResponse>\n",
        )
        .unwrap();

        assert_eq!(
            response,
            MethodResponse::Success(Value::Array(vec![Value::Int(1)]))
        );
    }

    #[test]
    fn test_decode_fault() {
        let response = MethodResponse::from_xml(
            "<?xml version='1.0'?>\n<methodResponse>\n<fault>\n<value><struct>\n\
             <member>\n<name>faultCode</name>\n<value><int>3</int></value>\n</member>\n\
             <member>\n<name>faultString</name>\n<value><string>Access Denied</string></value>\n</member>\n\
             </struct></value>\n</fault>\n</methodResponse>\n",
        )
        .unwrap();

        let fault = response.into_result().unwrap_err();
        assert_eq!(fault.code, FaultCode::Int(3));
        assert_eq!(fault.message, "Access Denied");
    }

    #[test]
    fn test_decode_rejects_missing_params() {
        assert!(MethodResponse::from_xml("<methodResponse></methodResponse>").is_err());
        assert!(MethodResponse::from_xml("<methodResponse><params/></methodResponse>").is_err());
    }

    #[test]
    fn test_decode_rejects_html() {
        let error = MethodResponse::from_xml("<html><body>502 Bad Gateway</body></html>")
            .unwrap_err();
        assert!(error.to_string().contains("methodResponse"));
    }

    #[test]
    fn test_encoded_fault_decodes() {
        let original = MethodResponse::Fault(Fault::new(2, "Warning"));
        let decoded = MethodResponse::from_xml(&original.to_xml().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }
}
