use super::{TypeTag, key_name};
use crate::domain::document::{DATETIME_FORMAT, Document, Mapping};
use crate::error::{GatewayError, Result};
use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decodes a gateway XML document into a [`Document`].
///
/// The result is a mapping with a single entry keyed by the root element's
/// name in underscore form.
///
/// Decoding is lenient in two places: a `boolean` leaf whose text is neither
/// `true` nor `1` is `false` rather than an error, and unknown elements or
/// attributes pass through without any schema check.
pub fn decode(xml: &str) -> Result<Document> {
    let root = parse_tree(xml)?;
    let mut mapping = Mapping::new();
    mapping.insert(key_name(&root.name), decode_node(&root)?);
    Ok(Document::Mapping(mapping))
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    fn open(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Self> {
        let decoder = reader.decoder();
        let name = decoder.decode(start.name().as_ref())?.into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = decoder.decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_tree(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Node::open(&reader, &start)?),
            Event::Empty(start) => {
                let node = Node::open(&reader, &start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| GatewayError::Parse("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => push_text(&mut stack, &text.unescape()?)?,
            Event::CData(data) => push_text(&mut stack, &reader.decoder().decode(&data)?)?,
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(GatewayError::Parse(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| GatewayError::Parse("document has no root element".to_string()))
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => {
            return Err(GatewayError::Parse(
                "document has more than one root element".to_string(),
            ));
        }
        None => *root = Some(node),
    }
    Ok(())
}

fn push_text(stack: &mut [Node], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(node) => node.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(GatewayError::Parse(
                "text outside of the root element".to_string(),
            ));
        }
    }
    Ok(())
}

fn decode_node(node: &Node) -> Result<Document> {
    let tag = node.attribute("type").and_then(TypeTag::parse);

    if tag == Some(TypeTag::Array) {
        // Child names are uniform on the wire and carry no information.
        return node
            .children
            .iter()
            .map(decode_node)
            .collect::<Result<Vec<_>>>()
            .map(Document::Sequence);
    }

    if !node.children.is_empty() {
        let mut mapping = Mapping::new();
        for child in &node.children {
            // Repeated names: last one wins.
            mapping.insert(key_name(&child.name), decode_node(child)?);
        }
        return Ok(Document::Mapping(mapping));
    }

    decode_leaf(node, tag)
}

fn decode_leaf(node: &Node, tag: Option<TypeTag>) -> Result<Document> {
    if node.attribute("nil") == Some("true") {
        return Ok(Document::Null);
    }

    let text = node.text.trim();
    match tag {
        Some(TypeTag::Integer) => text.parse::<i64>().map(Document::Integer).map_err(|e| {
            GatewayError::Parse(format!("<{}>: invalid integer {text:?}: {e}", node.name))
        }),
        Some(TypeTag::Boolean) => Ok(Document::Boolean(text == "true" || text == "1")),
        Some(TypeTag::DateTime) => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Document::DateTime)
            .map_err(|e| {
                GatewayError::Parse(format!("<{}>: invalid datetime {text:?}: {e}", node.name))
            }),
        Some(TypeTag::Decimal) => Decimal::from_str(text).map(Document::Decimal).map_err(|e| {
            GatewayError::Parse(format!("<{}>: invalid decimal {text:?}: {e}", node.name))
        }),
        Some(TypeTag::Array) | None => Ok(Document::String(node.text.clone())),
    }
}
