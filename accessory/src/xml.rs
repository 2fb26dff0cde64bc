//! Structured XML documents backing XML-typed attributes.
//!
//! XML attributes are stored as serialized text but may be read back as a
//! document. [`parse`] materializes text into an [`XmlDocument`] and
//! [`XmlDocument::serialize_first_child`] turns a document back into the
//! text of its first child node.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::XmlError;

/// An XML document: the ordered top-level nodes of a parsed input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
}

/// A node in an XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with attributes and children.
    Element(XmlElement),
    /// Character data, already unescaped.
    Text(String),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified tag name.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Adds a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Adds an element child.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => out.push_str(&e.text()),
            }
        }
        out
    }
}

impl XmlDocument {
    /// Creates a document without nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document holding a single root element.
    pub fn with_root(root: XmlElement) -> Self {
        Self {
            nodes: vec![XmlNode::Element(root)],
        }
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Returns `true` if the document holds at least one node.
    pub fn has_content(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// First top-level node.
    pub fn first_child(&self) -> Option<&XmlNode> {
        self.nodes.first()
    }

    /// Serializes every top-level node.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        into_string(writer)
    }

    /// Serializes the first top-level node only.
    ///
    /// This is the stored form of an XML attribute assigned a document.
    pub fn serialize_first_child(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        if let Some(node) = self.first_child() {
            write_node(&mut writer, node)?;
        }
        into_string(writer)
    }
}

/// Parses XML text into a document.
///
/// Declarations, comments, processing instructions and doctypes are
/// skipped. Whitespace-only text between elements is dropped. The input
/// must hold exactly one root element and no top-level text.
///
/// ## Examples
///
/// ```rust
/// use accessory::xml::parse;
///
/// let doc = parse("<a x=\"1\"><b>hi &amp; bye</b></a>").unwrap();
/// assert_eq!(doc.serialize_first_child().unwrap(), "<a x=\"1\"><b>hi &amp; bye</b></a>");
/// assert!(parse("plain text").is_err());
/// ```
pub fn parse(input: &str) -> Result<XmlDocument, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut roots: Vec<XmlNode> = Vec::new();
    let mut pending = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Text(text) => {
                let text = std::str::from_utf8(&text).map_err(|e| XmlError::Malformed(e.to_string()))?;
                pending.push_str(text);
            }
            Event::CData(data) => {
                pending.push_str(&String::from_utf8_lossy(&data));
            }
            Event::GeneralRef(reference) => {
                let name = std::str::from_utf8(&reference)
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                pending.push(resolve_entity(name)?);
            }
            Event::Start(start) => {
                flush_text(&mut pending, &mut stack)?;
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                flush_text(&mut pending, &mut stack)?;
                let element = element_from(&start)?;
                attach(XmlNode::Element(element), &mut stack, &mut roots);
            }
            Event::End(_) => {
                flush_text(&mut pending, &mut stack)?;
                let Some(element) = stack.pop() else {
                    return Err(XmlError::Malformed("unbalanced closing tag".to_string()));
                };
                attach(XmlNode::Element(element), &mut stack, &mut roots);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    flush_text(&mut pending, &mut stack)?;
    if !stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element at end of input".to_string()));
    }
    if roots.is_empty() {
        return Err(XmlError::NoRootElement);
    }
    Ok(XmlDocument { nodes: roots })
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn resolve_entity(name: &str) -> Result<char, XmlError> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    };
    resolved.ok_or_else(|| XmlError::UnknownEntity(name.to_string()))
}

fn flush_text(pending: &mut String, stack: &mut [XmlElement]) -> Result<(), XmlError> {
    let text = std::mem::take(pending);
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Text(text));
            Ok(())
        }
        None => Err(XmlError::Malformed(format!(
            "text outside of the root element: '{}'",
            text.trim()
        ))),
    }
}

fn attach(node: XmlNode, stack: &mut [XmlElement], roots: &mut Vec<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), XmlError> {
    match node {
        XmlNode::Text(text) => emit(writer, Event::Text(BytesText::new(text))),
        XmlNode::Element(element) => {
            let mut start = BytesStart::new(element.name.as_str());
            for (key, value) in &element.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            if element.children.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
        }
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, XmlError> {
    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let doc = parse(r#"<order id="7"><item sku="a"/><note>fragile</note></order>"#).unwrap();
        let Some(XmlNode::Element(order)) = doc.first_child() else {
            panic!("expected an element root, got {:?}", doc.first_child());
        };
        assert_eq!(order.name, "order");
        assert_eq!(order.attributes, vec![("id".to_string(), "7".to_string())]);
        assert_eq!(order.children.len(), 2);
        assert_eq!(order.text(), "fragile");
    }

    #[test]
    fn entities_are_resolved_and_reescaped() {
        let doc = parse("<a>x &lt; y &#65;</a>").unwrap();
        let Some(XmlNode::Element(a)) = doc.first_child() else {
            panic!("expected element");
        };
        assert_eq!(a.text(), "x < y A");
        assert_eq!(doc.serialize_first_child().unwrap(), "<a>x &lt; y A</a>");
    }

    #[test]
    fn whitespace_between_elements_is_dropped() {
        let doc = parse("<a>\n  <b/>\n</a>").unwrap();
        assert_eq!(doc.serialize_first_child().unwrap(), "<a><b/></a>");
    }

    #[test]
    fn rejects_plain_text_and_empty_input() {
        assert!(matches!(parse("hello"), Err(XmlError::Malformed(_))));
        assert_eq!(parse(""), Err(XmlError::NoRootElement));
        assert!(parse("<a>").is_err());
    }

    #[test]
    fn unknown_entity_is_reported() {
        let err = parse("<a>&nbsp;</a>").unwrap_err();
        assert_eq!(err, XmlError::UnknownEntity("nbsp".to_string()));
        assert!(err.is_parse_error());
    }

    #[test]
    fn builder_serializes_first_child() {
        let doc = XmlDocument::with_root(
            XmlElement::new("p")
                .with_attribute("lang", "en")
                .with_text("a & b")
                .with_child(XmlElement::new("br")),
        );
        assert_eq!(
            doc.serialize_first_child().unwrap(),
            r#"<p lang="en">a &amp; b<br/></p>"#
        );
        assert!(!XmlDocument::new().has_content());
        assert_eq!(XmlDocument::new().serialize_first_child().unwrap(), "");
    }
}
