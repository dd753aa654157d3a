//! Attributed XML tree with parsing and 4-space indented serialization

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use thiserror::Error;

/// Indentation used when serializing a document
const INDENT: &str = "    ";

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("closing tag </{0}> has no matching opening tag")]
    UnexpectedClose(String),

    #[error("tag <{0}> is never closed")]
    Unclosed(String),

    #[error("tag <{0}> not found")]
    TagNotFound(String),
}

/// Attribute mapping that keeps document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when every `(name, value)` pair of `filter` is present with an equal value
    pub fn contains_all(&self, filter: &[(&str, &str)]) -> bool {
        filter
            .iter()
            .all(|(name, value)| self.get(name) == Some(*value))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

/// A tagged node: name, attributes and ordered children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn matches(&self, tag: &str, filter: &[(&str, &str)]) -> bool {
        self.name == tag && self.attributes.contains_all(filter)
    }

    /// Direct element children, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Instruction(String),
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_inline(&self) -> bool {
        matches!(self, Node::Text(_) | Node::CData(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// The `<?xml ... ?>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
            standalone: None,
        }
    }
}

impl Declaration {
    fn from_event(decl: &BytesDecl<'_>) -> Result<Self, quick_xml::Error> {
        let version = String::from_utf8_lossy(&decl.version()?).into_owned();
        let encoding = decl
            .encoding()
            .transpose()?
            .map(|e| String::from_utf8_lossy(&e).into_owned());
        let standalone = decl
            .standalone()
            .transpose()?
            .map(|s| String::from_utf8_lossy(&s).into_owned());
        Ok(Self {
            version,
            encoding,
            standalone,
        })
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?xml version=\"{}\"", self.version)?;
        if let Some(encoding) = &self.encoding {
            write!(f, " encoding=\"{}\"", encoding)?;
        }
        if let Some(standalone) = &self.standalone {
            write!(f, " standalone=\"{}\"", standalone)?;
        }
        write!(f, "?>")
    }
}

/// A whole XML document: optional declaration plus top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub nodes: Vec<Node>,
}

impl Document {
    /// Parse a document, dropping whitespace-only text between elements
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut declaration = None;
        let mut top_level: Vec<Node> = Vec::new();
        let mut open: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(reader.buffer_position(), e))?;

            let node = match event {
                Event::Decl(decl) => {
                    declaration = Some(
                        Declaration::from_event(&decl)
                            .map_err(|e| malformed(reader.buffer_position(), e))?,
                    );
                    continue;
                }
                Event::Start(start) => {
                    let element = element_from_start(&start)
                        .map_err(|e| malformed(reader.buffer_position(), e))?;
                    open.push(element);
                    continue;
                }
                Event::End(end) => match open.pop() {
                    Some(element) => Node::Element(element),
                    None => {
                        let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                        return Err(XmlError::UnexpectedClose(name));
                    }
                },
                Event::Empty(start) => Node::Element(
                    element_from_start(&start)
                        .map_err(|e| malformed(reader.buffer_position(), e))?,
                ),
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| malformed(reader.buffer_position(), e))?;
                    if text.trim().is_empty() {
                        continue;
                    }
                    Node::Text(text.into_owned())
                }
                Event::CData(data) => Node::CData(String::from_utf8_lossy(&data).into_owned()),
                Event::Comment(comment) => {
                    Node::Comment(String::from_utf8_lossy(&comment).into_owned())
                }
                Event::PI(instruction) => {
                    Node::Instruction(String::from_utf8_lossy(&instruction).into_owned())
                }
                Event::DocType(doctype) => {
                    Node::DocType(String::from_utf8_lossy(&doctype).into_owned())
                }
                Event::Eof => break,
            };

            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top_level.push(node),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(XmlError::Unclosed(unclosed.name.clone()));
        }

        Ok(Self {
            declaration,
            nodes: top_level,
        })
    }

    /// The first top-level element, if any
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Serialize the whole document, one node per line, 4 spaces per depth
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if let Some(declaration) = &self.declaration {
            out.push_str(&declaration.to_string());
        }
        for node in &self.nodes {
            if !out.is_empty() {
                out.push('\n');
            }
            write_node(&mut out, node, 0);
        }
        out
    }
}

fn malformed(position: usize, error: impl fmt::Display) -> XmlError {
    XmlError::Malformed {
        position,
        message: error.to_string(),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.set(name, value);
    }
    Ok(element)
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Element(element) => write_element(out, element, depth),
        Node::Text(text) => out.push_str(&escape(text.as_str())),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Instruction(instruction) => {
            out.push_str("<?");
            out.push_str(instruction);
            out.push_str("?>");
        }
        Node::DocType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in element.attributes.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    if element.children.iter().all(Node::is_inline) {
        for child in &element.children {
            write_node(out, child, depth + 1);
        }
    } else {
        for child in &element.children {
            out.push('\n');
            push_indent(out, depth + 1);
            write_node(out, child, depth + 1);
        }
        out.push('\n');
        push_indent(out, depth);
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
