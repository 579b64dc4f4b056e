//! Structural diff between two parsed BPMN documents.
//!
//! The differ walks the element indexes of the previous and current
//! documents and produces four id-keyed maps: added, removed, changed and
//! layout-changed. Added and removed are disjoint by construction; an
//! element may legitimately appear in both changed and layout-changed when
//! its attributes and its position both moved.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::model::{DiagramElement, ModelRef, ParsedDefinitions};

bitflags! {
    /// Change-category membership for a single element id.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        const ADDED = 1;
        const REMOVED = 2;
        const CHANGED = 4;
        const LAYOUT = 8;
    }
}

/// Old and new value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// One element-level change record.
///
/// An entry with an empty `attrs` map is not an error: the differ reports an
/// element as changed when only its nested content moved, and such entries
/// are pruned by the filter before display.
#[derive(Debug, Clone)]
pub struct ElementChange {
    pub id: String,
    /// The element's own name, when the type is direct.
    pub name: Option<String>,
    /// Direct element type; `None` for pool-level records.
    pub element_type: Option<String>,
    /// Nested descriptive info for pool-level records.
    pub model: Option<ModelRef>,
    /// Attribute-level differences (attribute name to old/new pair).
    pub attrs: FxHashMap<String, AttrChange>,
}

impl ElementChange {
    /// Builds a change record from an indexed element, with no attribute
    /// deltas yet.
    fn from_element(element: &DiagramElement) -> Self {
        ElementChange {
            id: element.id.clone(),
            name: element.name.clone(),
            element_type: element.element_type.clone(),
            model: element.model.clone(),
            attrs: FxHashMap::default(),
        }
    }

    /// Returns true if this record carries no attribute-level difference.
    pub fn is_no_op(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// The raw output of one diff invocation.
///
/// Produced fresh on every comparison and never mutated in place; display
/// code works on the filtered copy instead.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub added: FxHashMap<String, ElementChange>,
    pub removed: FxHashMap<String, ElementChange>,
    pub changed: FxHashMap<String, ElementChange>,
    pub layout_changed: FxHashMap<String, ElementChange>,
}

impl DiffResult {
    /// Returns the category flags an id appears under.
    pub fn flags_for(&self, id: &str) -> ChangeFlags {
        let mut flags = ChangeFlags::empty();
        if self.added.contains_key(id) {
            flags |= ChangeFlags::ADDED;
        }
        if self.removed.contains_key(id) {
            flags |= ChangeFlags::REMOVED;
        }
        if self.changed.contains_key(id) {
            flags |= ChangeFlags::CHANGED;
        }
        if self.layout_changed.contains_key(id) {
            flags |= ChangeFlags::LAYOUT;
        }
        flags
    }
}

/// Diffs two parsed documents.
pub fn diff_definitions(previous: &ParsedDefinitions, current: &ParsedDefinitions) -> DiffResult {
    let mut result = DiffResult::default();

    for (id, element) in current.elements() {
        match previous.element(id) {
            None => {
                result
                    .added
                    .insert(id.clone(), ElementChange::from_element(element));
            }
            Some(old) => {
                if let Some(change) = semantic_change(old, element) {
                    result.changed.insert(id.clone(), change);
                }
                if let Some(change) = layout_change(old, element) {
                    result.layout_changed.insert(id.clone(), change);
                }
            }
        }
    }

    for (id, element) in previous.elements() {
        if current.element(id).is_none() {
            result
                .removed
                .insert(id.clone(), ElementChange::from_element(element));
        }
    }

    result
}

/// Compares semantic attributes and nested content of a common element.
fn semantic_change(old: &DiagramElement, new: &DiagramElement) -> Option<ElementChange> {
    let mut change = ElementChange::from_element(new);

    let mut keys: Vec<&String> = old.attributes.keys().collect();
    for key in new.attributes.keys() {
        if !old.attributes.contains_key(key) {
            keys.push(key);
        }
    }
    for key in keys {
        let old_value = old.attributes.get(key);
        let new_value = new.attributes.get(key);
        if old_value != new_value {
            change.attrs.insert(
                key.clone(),
                AttrChange {
                    old: old_value.cloned(),
                    new: new_value.cloned(),
                },
            );
        }
    }

    if !change.attrs.is_empty() {
        return Some(change);
    }
    // Nested content (documentation, extension elements, incoming/outgoing
    // references) changed without an attribute delta; reported as a change
    // with an empty attrs map, which the filter treats as a no-op.
    if old.content_hash != new.content_hash {
        return Some(change);
    }
    None
}

/// Compares the DI geometry of a common element.
///
/// A shape or edge whose geometry exists on only one side (bounds or
/// waypoints added or removed wholesale) is still a layout change; the
/// missing side is reported as `None`.
fn layout_change(old: &DiagramElement, new: &DiagramElement) -> Option<ElementChange> {
    let mut change = ElementChange::from_element(new);

    if old.bounds != new.bounds {
        push_geometry_delta(&mut change, "x", old.bounds.map(|b| b.x), new.bounds.map(|b| b.x));
        push_geometry_delta(&mut change, "y", old.bounds.map(|b| b.y), new.bounds.map(|b| b.y));
        push_geometry_delta(
            &mut change,
            "width",
            old.bounds.map(|b| b.width),
            new.bounds.map(|b| b.width),
        );
        push_geometry_delta(
            &mut change,
            "height",
            old.bounds.map(|b| b.height),
            new.bounds.map(|b| b.height),
        );
    }

    if old.waypoints != new.waypoints {
        change.attrs.insert(
            "waypoints".to_string(),
            AttrChange {
                old: (!old.waypoints.is_empty()).then(|| format_waypoints(&old.waypoints)),
                new: (!new.waypoints.is_empty()).then(|| format_waypoints(&new.waypoints)),
            },
        );
    }

    if change.attrs.is_empty() {
        None
    } else {
        Some(change)
    }
}

fn push_geometry_delta(change: &mut ElementChange, key: &str, old: Option<f64>, new: Option<f64>) {
    if old != new {
        change.attrs.insert(
            key.to_string(),
            AttrChange {
                old: old.map(|v| v.to_string()),
                new: new.map(|v| v.to_string()),
            },
        );
    }
}

fn format_waypoints(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}
