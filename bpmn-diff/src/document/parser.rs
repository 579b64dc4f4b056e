//! Streaming XML parser that builds document trees.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use rustc_hash::FxHashMap;

use super::{XmlElement, XmlNode};
use crate::error::{Error, Result};

/// Parses an XML string into a document tree, returning the root element.
pub fn parse_str(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let element = parse_element(e, &reader)?;
                stack.push(element);
            }
            Ok(Event::End(_)) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unbalanced closing tag".to_string()))?;
                attach(finished, &mut stack, &mut root)?;
            }
            Ok(Event::Empty(ref e)) => {
                let element = parse_element(e, &reader)?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(e)) => {
                let raw =
                    std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_child(XmlNode::Text(trimmed.to_string()));
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_child(XmlNode::Text(trimmed.to_string()));
                    }
                }
            }
            Ok(Event::Comment(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(XmlNode::Comment(text));
                }
            }
            Ok(Event::Eof) => break,
            // XML declaration, DOCTYPE and processing instructions carry no
            // diagram content.
            Ok(_) => {}
            Err(e) => return Err(Error::Xml(e)),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::Parse("unclosed element at end of document".to_string()));
    }
    root.ok_or_else(|| Error::Parse("document has no root element".to_string()))
}

/// Attaches a completed element to its parent, or installs it as the root.
fn attach(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(XmlNode::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(Error::Parse("multiple root elements".to_string())),
    }
}

/// Parses an element's name and attributes from a start tag.
fn parse_element<R>(e: &BytesStart, reader: &Reader<R>) -> Result<XmlElement> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(|e| Error::Parse(e.to_string()))?
        .to_string();

    let mut attributes = FxHashMap::default();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| Error::Parse(format!("attribute error: {}", e)))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        attributes.insert(key, value);
    }

    Ok(XmlElement::with_attributes(name, attributes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let root = parse_str(r#"<root><child>text</child></root>"#).unwrap();
        assert_eq!(root.name(), "root");
        assert_eq!(root.children().len(), 1);

        let child = root.child_elements().next().unwrap();
        assert_eq!(child.name(), "child");
        match &child.children()[0] {
            XmlNode::Text(t) => assert_eq!(t, "text"),
            other => panic!("expected text node, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_with_attributes() {
        let root = parse_str(r#"<task id="Task_1" name="Review &amp; sign" />"#).unwrap();
        assert_eq!(root.attr("id"), Some("Task_1"));
        assert_eq!(root.attr("name"), Some("Review & sign"));
    }

    #[test]
    fn test_parse_namespaced_elements() {
        let xml = r#"<bpmn:process id="P_1"><bpmn:startEvent id="S_1" /></bpmn:process>"#;
        let root = parse_str(xml).unwrap();
        assert_eq!(root.name(), "bpmn:process");
        assert_eq!(root.local_name(), "process");

        let start = root.child_elements().next().unwrap();
        assert_eq!(start.local_name(), "startEvent");
    }

    #[test]
    fn test_parse_skips_whitespace_only_text() {
        let root = parse_str("<root>\n  <a />\n  <b />\n</root>").unwrap();
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn test_parse_keeps_comments() {
        let root = parse_str(r#"<root><!-- note --><a /></root>"#).unwrap();
        assert!(matches!(&root.children()[0], XmlNode::Comment(_)));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_str("<root><unclosed></root>").is_err());
        assert!(parse_str("not xml at all <<<").is_err());
        assert!(parse_str("").is_err());
    }
}
