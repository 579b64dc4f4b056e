//! BPMN semantic view over a parsed document tree.
//!
//! `ParsedDefinitions` pairs the raw XML tree (kept for re-serialization by
//! the reconciler) with an id-keyed index of every diagram element, including
//! the geometry recorded in the BPMN DI section. The index is built in one
//! walk at parse time and never mutated afterwards; a re-parse replaces the
//! whole structure.

mod kind;

pub use kind::{DefaultNaming, ElementKind, ElementNaming};

use rustc_hash::FxHashMap;

use crate::document::{self, XmlElement};
use crate::error::Result;

/// Position and size of a diagram shape, from `dc:Bounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Descriptive info nested under a pool-level change record.
///
/// Participant, lane and collaboration records do not carry a direct element
/// type; their name and type live here and the classifier must reach through
/// this reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRef {
    pub name: Option<String>,
    pub element_type: String,
}

/// One indexed diagram element.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    /// Stable element identifier (the `id` attribute).
    pub id: String,
    /// Qualified type, e.g. `bpmn:userTask`. `None` for pool-level elements,
    /// which carry their info in `model` instead.
    pub element_type: Option<String>,
    /// The element's own `name` attribute, when the type is direct.
    pub name: Option<String>,
    /// Nested descriptive info for pool-level elements.
    pub model: Option<ModelRef>,
    /// Semantic attributes (everything except `id`).
    pub attributes: FxHashMap<String, String>,
    /// Hash over the element's child content (documentation, extension
    /// elements, nested expressions).
    pub content_hash: [u8; 16],
    /// Shape geometry from the DI section, when the element has a shape.
    pub bounds: Option<Bounds>,
    /// Edge waypoints from the DI section, when the element is an edge.
    pub waypoints: Vec<(f64, f64)>,
}

/// A parsed BPMN document: the raw tree plus the element index.
#[derive(Debug, Clone)]
pub struct ParsedDefinitions {
    tree: XmlElement,
    elements: FxHashMap<String, DiagramElement>,
}

impl ParsedDefinitions {
    /// Parses a BPMN XML string and builds the element index.
    pub fn parse(xml: &str) -> Result<Self> {
        let tree = document::parse_str(xml)?;
        let mut elements = FxHashMap::default();
        for child in tree.child_elements() {
            collect_semantic(child, &mut elements);
        }
        collect_geometry(&tree, &mut elements);
        Ok(ParsedDefinitions { tree, elements })
    }

    /// Returns the underlying document tree.
    pub fn tree(&self) -> &XmlElement {
        &self.tree
    }

    /// Returns the element index.
    pub fn elements(&self) -> &FxHashMap<String, DiagramElement> {
        &self.elements
    }

    /// Looks up one element by id.
    pub fn element(&self, id: &str) -> Option<&DiagramElement> {
        self.elements.get(id)
    }
}

/// Indexes semantic elements, skipping the DI subtree.
///
/// The `bpmn:definitions` root itself is not indexed; it would otherwise be
/// reported as changed whenever anything below it changes.
fn collect_semantic(element: &XmlElement, out: &mut FxHashMap<String, DiagramElement>) {
    if element.prefix() == Some("bpmndi") {
        return;
    }

    if let Some(id) = element.attr("id") {
        let kind = ElementKind::from_type(element.name());

        let mut attributes = element.attributes().clone();
        attributes.remove("id");
        let name = attributes.get("name").cloned();

        let (element_type, name, model) = if kind.is_pool_level() {
            let model = ModelRef {
                name,
                element_type: element.name().to_string(),
            };
            (None, None, Some(model))
        } else {
            (Some(element.name().to_string()), name, None)
        };

        out.insert(
            id.to_string(),
            DiagramElement {
                id: id.to_string(),
                element_type,
                name,
                model,
                attributes,
                content_hash: element.content_hash(),
                bounds: None,
                waypoints: Vec::new(),
            },
        );
    }

    for child in element.child_elements() {
        collect_semantic(child, out);
    }
}

/// Attaches DI geometry to the indexed elements.
fn collect_geometry(root: &XmlElement, out: &mut FxHashMap<String, DiagramElement>) {
    root.for_each_element(&mut |element| {
        let Some(target) = element.attr("bpmnElement") else {
            return;
        };
        let Some(indexed) = out.get_mut(target) else {
            // A shape can reference an element we did not index (for
            // example the plane's process reference); geometry for it is
            // irrelevant to the diff.
            return;
        };

        match element.local_name() {
            "BPMNShape" => {
                indexed.bounds = element
                    .child_elements()
                    .find(|c| c.local_name() == "Bounds")
                    .and_then(parse_bounds);
            }
            "BPMNEdge" => {
                indexed.waypoints = element
                    .child_elements()
                    .filter(|c| c.local_name() == "waypoint")
                    .filter_map(parse_point)
                    .collect();
            }
            _ => {}
        }
    });
}

fn parse_bounds(element: &XmlElement) -> Option<Bounds> {
    Some(Bounds {
        x: element.attr("x")?.parse().ok()?,
        y: element.attr("y")?.parse().ok()?,
        width: element.attr("width")?.parse().ok()?,
        height: element.attr("height")?.parse().ok()?,
    })
}

fn parse_point(element: &XmlElement) -> Option<(f64, f64)> {
    Some((
        element.attr("x")?.parse().ok()?,
        element.attr("y")?.parse().ok()?,
    ))
}
