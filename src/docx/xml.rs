/*!
 * Owned XML tree for WordprocessingML parts.
 *
 * The tree keeps every node it does not understand (declarations, comments,
 * processing instructions, CDATA) so a part can be edited and written back
 * without losing content. Names in the WordprocessingML main namespace are
 * stored as `w:<local>` whatever prefix the source bound it to, so callers
 * match `w:p` and `w:r` for documents written with `ns0:` or a default
 * namespace too. Other names keep their prefix as written.
 */

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{LocalName, Namespace, QName, ResolveResult};
use quick_xml::{NsReader, Writer};

use crate::errors::DocumentError;

/// WordprocessingML main namespace
pub const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Prefix main-namespace names are stored and written with
pub const MAIN_PREFIX: &str = "w";

const MAIN_PREFIX_DECLARATION: &str = "xmlns:w";

/// A node of the tree
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// Element with attributes and children
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    /// Anything else, written back verbatim
    Other(Event<'static>),
}

/// An XML element
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    /// Qualified name, prefix included
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder: append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Whether this element has the given qualified name
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Value of an attribute by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text and other nodes
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |element| element.is(name))
    }

    /// Mutable direct child elements with the given name
    pub fn children_named_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.children.iter_mut().filter_map(move |node| match node {
            XmlNode::Element(element) if element.is(name) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(name))
    }

    /// First mutable direct child element with the given name
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(element) if element.is(name) => Some(element),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(value) => text.push_str(value),
                XmlNode::Element(element) => text.push_str(&element.text_content()),
                XmlNode::Other(_) => {}
            }
        }
        text
    }
}

/// A parsed XML part: prolog nodes, the root element, trailing nodes
#[derive(Debug, Clone)]
pub struct XmlTree {
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
    pub epilog: Vec<XmlNode>,
}

impl XmlTree {
    /// Parse a complete XML document
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = NsReader::from_str(xml);
        let mut renamed = false;

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(element_from(&reader, &start, &mut renamed)?);
                    continue;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DocumentError::Xml("unbalanced closing tag".to_string()))?;
                    XmlNode::Element(element)
                }
                Event::Empty(start) => XmlNode::Element(element_from(&reader, &start, &mut renamed)?),
                Event::Text(text) => XmlNode::Text(text.unescape()?.into_owned()),
                Event::Eof => break,
                other => XmlNode::Other(other.into_owned()),
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }

            match (node, root.is_some()) {
                (XmlNode::Element(element), false) => root = Some(element),
                (XmlNode::Element(element), true) => {
                    return Err(DocumentError::Xml(format!(
                        "unexpected second root element <{}>",
                        element.name
                    )));
                }
                (other, false) => prolog.push(other),
                (other, true) => epilog.push(other),
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Xml(format!("unclosed element <{}>", open.name)));
        }

        let mut root = root.ok_or_else(|| DocumentError::Xml("document has no root element".to_string()))?;
        if renamed {
            declare_main_prefix(&mut root)?;
        }
        Ok(Self { prolog, root, epilog })
    }

    /// Serialize back to UTF-8 bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn element_from(reader: &NsReader<&[u8]>, start: &BytesStart<'_>, renamed: &mut bool) -> Result<XmlElement, DocumentError> {
    let (namespace, local) = reader.resolve_element(start.name());
    let name = stored_name(namespace, local, start.name(), renamed)?;

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| DocumentError::Xml(e.to_string()))?;
        let (namespace, local) = reader.resolve_attribute(attribute.key);
        let key = stored_name(namespace, local, attribute.key, renamed)?;
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement { name, attributes, children: Vec::new() })
}

/// `w:<local>` for main-namespace names, the qualified name otherwise
fn stored_name(namespace: ResolveResult<'_>, local: LocalName<'_>, qualified: QName<'_>, renamed: &mut bool) -> Result<String, DocumentError> {
    let qualified = utf8(qualified.as_ref())?;
    let in_main_namespace =
        matches!(namespace, ResolveResult::Bound(Namespace(uri)) if uri == WORDPROCESSING_NS.as_bytes());
    if !in_main_namespace {
        return Ok(qualified.to_string());
    }

    let name = format!("{}:{}", MAIN_PREFIX, utf8(local.as_ref())?);
    if name != qualified {
        *renamed = true;
    }
    Ok(name)
}

/// Bind `w` on the root so renamed elements stay in the main namespace
fn declare_main_prefix(root: &mut XmlElement) -> Result<(), DocumentError> {
    match root.attribute(MAIN_PREFIX_DECLARATION) {
        None => {
            root.attributes
                .push((MAIN_PREFIX_DECLARATION.to_string(), WORDPROCESSING_NS.to_string()));
            Ok(())
        }
        Some(WORDPROCESSING_NS) => Ok(()),
        Some(other) => Err(DocumentError::Xml(format!(
            "prefix '{}' is bound to {} instead of the main namespace",
            MAIN_PREFIX, other
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, DocumentError> {
    std::str::from_utf8(bytes).map_err(|e| DocumentError::Xml(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), DocumentError> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
            Ok(())
        }
        XmlNode::Other(event) => {
            writer.write_event(event)?;
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
