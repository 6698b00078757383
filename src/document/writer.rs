//! Serializes an [`XmlDocument`] with quick-xml's event writer

use std::io::Write;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::tree::{Node, XmlDocument, XmlElement};
use crate::domain::{AnonymizerError, Result};

impl XmlDocument {
    /// Serializes the document to UTF-8 bytes
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        let fail = |e: &dyn std::fmt::Display| AnonymizerError::xml(&self.name, e);

        for node in &self.prolog {
            write_node(&mut writer, node).map_err(|e| fail(&e))?;
        }
        write_element(&mut writer, &self.root).map_err(|e| fail(&e))?;
        for node in &self.epilog {
            write_node(&mut writer, node).map_err(|e| fail(&e))?;
        }
        Ok(writer.into_inner())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let bytes = self.to_xml_bytes()?;
        String::from_utf8(bytes).map_err(|e| AnonymizerError::xml(&self.name, e))
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> std::io::Result<()> {
    let start = BytesStart::new(element.name.as_str()).with_attributes(
        element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );

    if element.self_closing && element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> std::io::Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        Node::CData(data) => write_event(writer, Event::CData(BytesCData::new(data.as_str()))),
        Node::Comment(raw) => write_raw(writer, &["<!--", raw, "-->"]),
        Node::ProcessingInstruction(raw) => write_raw(writer, &["<?", raw, "?>"]),
        Node::Declaration(raw) => write_raw(writer, &["<?", raw, "?>"]),
        Node::DocType(raw) => write_raw(writer, &["<!DOCTYPE ", raw.trim_start(), ">"]),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> std::io::Result<()> {
    writer
        .write_event(event)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

fn write_raw(writer: &mut Writer<Vec<u8>>, parts: &[&str]) -> std::io::Result<()> {
    let out = writer.get_mut();
    for part in parts {
        out.write_all(part.as_bytes())?;
    }
    Ok(())
}
