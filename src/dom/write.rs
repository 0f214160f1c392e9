//! Tree to XML text serialization.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use super::{Element, Node};
use crate::error::Error;

/// Serialize an element subtree to XML text.
///
/// Childless elements are written self-closing (`<defs/>`). Attribute values
/// are escaped on write; text-like nodes are emitted in their stored raw
/// form.
pub fn write_document(root: &Element) -> Result<String, Error> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_element(&mut writer, root)?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, el: &Element) -> Result<(), Error> {
    let mut start = BytesStart::new(el.tag.as_str());
    for (name, value) in &el.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(el) => write_element(writer, el)?,
            Node::Text(raw) => {
                writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?;
            }
            Node::CData(data) => {
                writer.write_event(Event::CData(BytesCData::new(data.as_str())))?;
            }
            Node::Comment(body) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(body.as_str())))?;
            }
            Node::Pi(content) => {
                writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.tag.as_str())))?;
    Ok(())
}
