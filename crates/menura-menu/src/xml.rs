//! Generic XML tree loader
//!
//! Menu-definition files are small, so they are parsed into a fully owned
//! tree of [`XmlNode`] before any menu semantics apply. Comments,
//! processing instructions, and the doctype are skipped; text content is
//! whitespace-trimmed and dropped when empty; attributes keep document
//! order.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{MenuError, Result};

/// One XML element: tag, attributes in document order, optional trimmed
/// text, child elements in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Read and parse `path` into a tree rooted at its document element.
    pub fn from_file(path: &Path) -> Result<XmlNode> {
        let text = std::fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        XmlNode::parse(path, &text)
    }

    /// Parse XML text; `path` is only used in error values.
    pub fn parse(path: &Path, text: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(text);
        let xml_err = |source: quick_xml::Error, position: u64| MenuError::Xml {
            path: path.to_path_buf(),
            position,
            source,
        };

        let mut stack: Vec<XmlNode> = Vec::new();
        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event().map_err(|e| xml_err(e, position))? {
                Event::Start(start) => {
                    let node = element(path, &reader, &start)?;
                    stack.push(node);
                }
                Event::Empty(start) => {
                    let node = element(path, &reader, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::End(_) => {
                    // balanced-tag checking is the reader's job
                    let node = match stack.pop() {
                        Some(node) => node,
                        None => continue,
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Text(t) => {
                    let value = t.unescape().map_err(|e| xml_err(e, position))?;
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(node) = stack.last_mut() {
                        match &mut node.text {
                            Some(text) => text.push_str(trimmed),
                            None => node.text = Some(trimmed.to_string()),
                        }
                    }
                }
                Event::CData(_)
                | Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => {}
                Event::Eof => {
                    return Err(MenuError::RootTag {
                        path: path.to_path_buf(),
                    })
                }
            }
        }
    }

    /// First attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content, when present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

fn element(
    path: &Path,
    reader: &Reader<&[u8]>,
    start: &quick_xml::events::BytesStart<'_>,
) -> Result<XmlNode> {
    let position = reader.buffer_position() as u64;
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| MenuError::Xml {
            path: path.to_path_buf(),
            position,
            source: quick_xml::Error::InvalidAttr(e),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MenuError::Xml {
                path: path.to_path_buf(),
                position,
                source: e,
            })?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        tag,
        attributes,
        text: None,
        children: Vec::new(),
    })
}
