//! XML document trees.
//!
//! This module provides an owned tree representation of an XML document,
//! a streaming parser built on quick-xml, and a printer that serializes a
//! tree back to an XML string. The diff engine re-parses both documents on
//! every comparison and the reconciler serializes a freshly colored clone
//! on every redraw, so trees are plain owned values with no parent links.

mod parser;
mod printer;

pub use parser::parse_str;
pub use printer::{to_xml_string, XmlPrinter};

use md5::{Digest, Md5};
use rustc_hash::FxHashMap;

/// A node in an XML document tree.
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// An element with a qualified name, attributes and children.
    Element(XmlElement),
    /// Text content.
    Text(String),
    /// A comment (without the `<!--` and `-->` markers).
    Comment(String),
}

impl XmlNode {
    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An XML element with a qualified name and attributes.
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: FxHashMap<String, String>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates a new element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: FxHashMap::default(),
            children: Vec::new(),
        }
    }

    /// Creates a new element with the given name and attributes.
    pub fn with_attributes(name: impl Into<String>, attributes: FxHashMap<String, String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Returns the qualified name (e.g. `bpmn:userTask`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the local part of the name, without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Returns the namespace prefix, if the name carries one.
    pub fn prefix(&self) -> Option<&str> {
        let (prefix, _) = self.name.split_once(':')?;
        Some(prefix)
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &FxHashMap<String, String> {
        &self.attributes
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Returns the child nodes mutably.
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Appends a child node.
    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Iterates over the direct child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Visits this element and every descendant element, depth first.
    pub fn for_each_element(&self, f: &mut impl FnMut(&XmlElement)) {
        f(self);
        for child in &self.children {
            if let XmlNode::Element(e) = child {
                e.for_each_element(f);
            }
        }
    }

    /// Visits this element and every descendant element mutably, depth first.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut XmlElement)) {
        f(self);
        for child in &mut self.children {
            if let XmlNode::Element(e) = child {
                e.for_each_element_mut(f);
            }
        }
    }

    /// Returns an MD5 hash over this element's name, attributes and subtree.
    pub fn subtree_hash(&self) -> [u8; 16] {
        let mut hasher = Md5::new();
        hash_element(self, &mut hasher);
        hasher.finalize().into()
    }

    /// Returns an MD5 hash over the child subtrees only.
    ///
    /// Two elements with equal content hashes have equal children; their own
    /// attributes may still differ. The differ uses this to detect changes
    /// buried in nested content (documentation, extension elements) that do
    /// not show up as an attribute delta.
    pub fn content_hash(&self) -> [u8; 16] {
        let mut hasher = Md5::new();
        for child in &self.children {
            hash_node(child, &mut hasher);
        }
        hasher.finalize().into()
    }
}

fn hash_element(element: &XmlElement, hasher: &mut Md5) {
    hasher.update([0x01]);
    hasher.update(element.name.as_bytes());

    // Sort attribute names for deterministic hashing.
    let mut attr_names: Vec<&String> = element.attributes.keys().collect();
    attr_names.sort();
    for name in attr_names {
        hasher.update([0x02]);
        hasher.update(name.as_bytes());
        hasher.update([0x03]);
        hasher.update(element.attributes[name].as_bytes());
    }

    for child in &element.children {
        hash_node(child, hasher);
    }
    hasher.update([0x04]);
}

fn hash_node(node: &XmlNode, hasher: &mut Md5) {
    match node {
        XmlNode::Element(e) => hash_element(e, hasher),
        XmlNode::Text(t) => {
            hasher.update([0x05]);
            hasher.update(t.as_bytes());
        }
        // Comments carry no semantic weight.
        XmlNode::Comment(_) => {}
    }
}

/// Strips all whitespace (including newlines) from a string.
///
/// Used to decide whether two structurally incomparable documents are in
/// fact the same document in a different encoding: equal after stripping
/// means "identical", unequal means "incomparable".
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
