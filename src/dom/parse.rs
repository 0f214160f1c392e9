//! XML text to tree parsing.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Element, Node};
use crate::error::Error;

/// Parse an XML document into its root element.
///
/// The XML declaration, DOCTYPE, and any content outside the root element
/// are skipped, so sources may arrive with or without a standalone-document
/// prologue. Ill-formed input fails with [`Error::Parse`].
pub fn parse_document(xml: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| Error::Parse {
            position: reader.error_position(),
            source,
        })?;

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start, &reader)?);
            }
            Event::Empty(start) => {
                let el = element_from_start(&start, &reader)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(el)),
                    // A self-closing root; anything after it is ignored.
                    None => return Ok(el),
                }
            }
            Event::End(_) => {
                // Mismatched end tags are already rejected by the reader.
                if let Some(el) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(el)),
                        None => return Ok(el),
                    }
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    push_text(parent, String::from_utf8(text.to_vec())?);
                }
            }
            Event::GeneralRef(gref) => {
                // Keep entity references in raw form inside the text run.
                if let Some(parent) = stack.last_mut() {
                    let name = String::from_utf8(gref.to_vec())?;
                    push_text(parent, format!("&{name};"));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::CData(String::from_utf8(data.to_vec())?));
                }
            }
            Event::Comment(body) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8(body.to_vec())?));
                }
            }
            Event::PI(pi) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Pi(String::from_utf8(pi.to_vec())?));
                }
            }
            Event::Eof => {
                return Err(match stack.pop() {
                    Some(open) => Error::UnexpectedEof(open.tag),
                    None => Error::NoRootElement,
                });
            }
            // XML declaration, DOCTYPE.
            _ => {}
        }
    }
}

/// Append raw text, merging into a preceding text run so split text events
/// (around entity references) come back as one node.
fn push_text(parent: &mut Element, raw: String) {
    if let Some(Node::Text(prev)) = parent.children.last_mut() {
        prev.push_str(&raw);
    } else {
        parent.children.push(Node::Text(raw));
    }
}

fn element_from_start(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, Error> {
    let tag = String::from_utf8(start.name().as_ref().to_vec())?;
    let mut el = Element::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Parse {
            position: reader.error_position(),
            source: e.into(),
        })?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse {
                position: reader.error_position(),
                source: e.into(),
            })?
            .into_owned();
        el.attrs.push((key, value));
    }

    Ok(el)
}
