//! XML printer that serializes document trees.
//!
//! Output is deterministic: attributes are written in sorted order and
//! nesting is indented with two spaces, so re-serializing an unchanged tree
//! always yields the same bytes.

use std::io::Write;

use super::{XmlElement, XmlNode};
use crate::error::{Error, Result};

/// XML printer that writes document trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a new printer over the given writer.
    pub fn new(writer: W) -> Self {
        XmlPrinter { writer }
    }

    /// Prints a full document: XML declaration followed by the root element.
    pub fn print(&mut self, root: &XmlElement) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        self.print_element(root, 0)?;
        self.writer.flush()
    }

    fn print_element(&mut self, element: &XmlElement, indent: usize) -> std::io::Result<()> {
        let pad = "  ".repeat(indent);
        write!(self.writer, "{}<{}", pad, element.name())?;

        // Sort attribute names for deterministic output.
        let mut attr_names: Vec<&String> = element.attributes().keys().collect();
        attr_names.sort();
        for name in attr_names {
            write!(
                self.writer,
                " {}=\"{}\"",
                name,
                to_entities(&element.attributes()[name])
            )?;
        }

        match element.children() {
            [] => writeln!(self.writer, " />"),
            // A lone text child is printed inline, the way diagram exporters
            // format elements like <bpmn:incoming>Flow_1</bpmn:incoming>.
            [XmlNode::Text(text)] => writeln!(
                self.writer,
                ">{}</{}>",
                to_entities(text),
                element.name()
            ),
            children => {
                writeln!(self.writer, ">")?;
                for child in children {
                    match child {
                        XmlNode::Element(e) => self.print_element(e, indent + 1)?,
                        XmlNode::Text(text) => {
                            writeln!(self.writer, "{}  {}", pad, to_entities(text))?
                        }
                        XmlNode::Comment(text) => {
                            writeln!(self.writer, "{}  <!--{}-->", pad, text)?
                        }
                    }
                }
                writeln!(self.writer, "{}</{}>", pad, element.name())
            }
        }
    }
}

/// Converts special characters to XML entities.
fn to_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serializes a document tree to an XML string.
pub fn to_xml_string(root: &XmlElement) -> Result<String> {
    let mut output = Vec::new();
    {
        let mut printer = XmlPrinter::new(&mut output);
        printer
            .print(root)
            .map_err(|e| Error::Serialize(e.to_string()))?;
    }
    Ok(String::from_utf8_lossy(&output).to_string())
}
