//! Minimal element tree built from quick-xml events.
//!
//! XML-RPC documents are small and strictly nested, so decoding walks a
//! tree instead of driving a streaming state machine.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// An XML element with its local name, concatenated text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Parses a whole document and returns its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::new(local_name(&start)?)),
                Event::Empty(start) => {
                    let element = Self::new(local_name(&start)?);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::syntax("unbalanced closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(&text)
                            .map_err(|e| Error::syntax(format!("invalid UTF-8 text: {e}")))?;
                        let unescaped = quick_xml::escape::unescape(raw)
                            .map_err(|e| Error::syntax(format!("invalid escape: {e}")))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(current) = stack.last_mut() {
                        let bytes = cdata.into_inner();
                        let raw = std::str::from_utf8(&bytes)
                            .map_err(|e| Error::syntax(format!("invalid UTF-8 CDATA: {e}")))?;
                        current.text.push_str(raw);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::syntax(format!(
                "document ended inside <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| Error::syntax("empty document"))
    }

    /// Iterates over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns the first child element with the given name or a syntax error.
    pub fn require(&self, name: &str) -> Result<&Element> {
        self.child(name).ok_or_else(|| {
            Error::syntax(format!("<{}> is missing <{}>", self.name, name))
        })
    }

    /// Returns the single child element, `None` when there is none.
    pub fn only_child(&self) -> Result<Option<&Element>> {
        match self.children.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only)),
            _ => Err(Error::syntax(format!(
                "<{}> has more than one child element",
                self.name
            ))),
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> Result<String> {
    let name = start.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_owned)
        .map_err(|e| Error::syntax(format!("invalid UTF-8 element name: {e}")))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::syntax("document has more than one root element")),
    }
    Ok(())
}
