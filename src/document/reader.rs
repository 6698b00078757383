//! Builds an [`XmlDocument`] from text with quick-xml's event reader

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::tree::{Node, XmlDocument, XmlElement};
use crate::domain::{AnonymizerError, Result};

impl XmlDocument {
    /// Parses a complete document, keeping comments, processing instructions and
    /// whitespace so that serialization changes nothing but rewritten values.
    pub fn parse(name: &str, xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let err = |message: String| AnonymizerError::xml(name, message);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| err(format!("at byte {position}: {e}")))?;

            let node = match event {
                Event::Eof => break,
                Event::Start(start) => {
                    stack.push(open_element(&start, false).map_err(err)?);
                    continue;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| err("unexpected closing tag".to_string()))?;
                    Node::Element(element)
                }
                Event::Empty(start) => Node::Element(open_element(&start, true).map_err(err)?),
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|e| err(format!("at byte {position}: {e}")))?;
                    Node::Text(value.into_owned())
                }
                Event::CData(data) => {
                    Node::CData(String::from_utf8_lossy(&data.into_inner()).into_owned())
                }
                Event::Comment(text) => Node::Comment(String::from_utf8_lossy(&text).into_owned()),
                Event::PI(pi) => {
                    Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned())
                }
                Event::Decl(decl) => Node::Declaration(String::from_utf8_lossy(&decl).into_owned()),
                Event::DocType(text) => Node::DocType(String::from_utf8_lossy(&text).into_owned()),
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }
            match node {
                Node::Element(element) => {
                    if root.is_some() {
                        return Err(err("document has more than one root element".to_string()));
                    }
                    root = Some(element);
                }
                other if root.is_none() => prolog.push(other),
                other => epilog.push(other),
            }
        }

        if let Some(open) = stack.last() {
            return Err(err(format!("unclosed element '{}'", open.name)));
        }
        let root = root.ok_or_else(|| err("document has no root element".to_string()))?;

        Ok(Self {
            name: name.to_string(),
            prolog,
            root,
            epilog,
        })
    }
}

fn open_element(start: &BytesStart<'_>, self_closing: bool) -> std::result::Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    element.self_closing = self_closing;

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| format!("bad attribute on '{}': {e}", element.name))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| format!("bad value for '{key}' on '{}': {e}", element.name))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodePath;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- header -->
<ClinicalDocument xmlns="urn:hl7-org:v3" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <title>Case &amp; report</title>
  <recordTarget><patientRole><id root="2.16" extension="A-1"/></patientRole></recordTarget>
</ClinicalDocument>
"#;

    #[test]
    fn test_parse_keeps_prolog_and_structure() {
        let doc = XmlDocument::parse("case.xml", DOC).unwrap();
        assert_eq!(doc.name, "case.xml");
        assert!(matches!(doc.prolog[0], Node::Declaration(_)));
        assert!(doc.prolog.iter().any(|n| matches!(n, Node::Comment(c) if c == " header ")));
        assert_eq!(doc.root.local_name(), "ClinicalDocument");
        assert_eq!(doc.root.attribute("xmlns"), Some("urn:hl7-org:v3"));

        let title = doc.root.element_at(&NodePath::root().child(1)).unwrap();
        assert_eq!(title.text().as_deref(), Some("Case & report"));

        let id = doc
            .root
            .element_at(&NodePath::root().child(3).child(0).child(0))
            .unwrap();
        assert_eq!(id.attribute("extension"), Some("A-1"));
        assert!(id.self_closing);
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let err = XmlDocument::parse("bad.xml", "<a><b></a>").unwrap_err();
        assert!(err.to_string().contains("bad.xml"));
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        let err = XmlDocument::parse("empty.xml", "<?xml version=\"1.0\"?>").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }

    #[test]
    fn test_parse_rejects_unclosed_root() {
        assert!(XmlDocument::parse("open.xml", "<a><b/>").is_err());
    }
}
