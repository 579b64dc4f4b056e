//! Visual reconciliation: diff categories to diagram colors.
//!
//! Colors are never painted onto a canvas directly. The reconciler writes
//! `bioc:stroke` / `bioc:fill` attributes onto the DI shapes of a cloned
//! document tree and re-serializes it; the rendering layer re-imports the
//! resulting XML. Every cycle starts from a clean slate: all existing color
//! attributes are cleared before the new assignment is applied.

use rustc_hash::FxHashMap;

use crate::document::{to_xml_string, XmlElement};
use crate::error::Result;
use crate::filter::FilteredDiff;
use crate::model::ParsedDefinitions;

/// Namespace for the bpmn.io color extension attributes.
pub const BIOC_NS: &str = "http://bpmn.io/schema/bpmn/biocolor/1.0";

const STROKE_ATTR: &str = "bioc:stroke";
const FILL_ATTR: &str = "bioc:fill";

/// Which comparison direction is selected.
///
/// New-vs-old colors the current document and shows added elements;
/// old-vs-new colors the previous document and shows removed elements.
/// Never both in the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffDirection {
    #[default]
    NewVsOld,
    OldVsNew,
}

/// Highlight color for one change category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightColor {
    Added,
    Removed,
    Changed,
    LayoutChanged,
}

impl HighlightColor {
    /// Border color.
    pub fn stroke(&self) -> &'static str {
        match self {
            HighlightColor::Added => "#54B415",
            HighlightColor::Removed => "#E53935",
            HighlightColor::Changed => "#F5A623",
            HighlightColor::LayoutChanged => "#8E44AD",
        }
    }

    /// Fill color.
    pub fn fill(&self) -> &'static str {
        match self {
            HighlightColor::Added => "#E2F3D8",
            HighlightColor::Removed => "#FBE3E1",
            HighlightColor::Changed => "#FCEED8",
            HighlightColor::LayoutChanged => "#EFE0F6",
        }
    }
}

/// Element id to highlight color, fully recomputed every cycle.
pub type ColorAssignment = FxHashMap<String, HighlightColor>;

/// Computes the color for every element id in the filtered diff.
///
/// Application order is fixed: layout-changed first, then changed, then
/// exactly one of added or removed depending on the direction. Later
/// insertions win, so an element that is both moved and changed ends up
/// orange, not purple.
pub fn build_color_assignment(
    filtered: &FilteredDiff,
    direction: DiffDirection,
) -> ColorAssignment {
    let mut assignment = ColorAssignment::default();

    for id in filtered.layout_changed.keys() {
        assignment.insert(id.clone(), HighlightColor::LayoutChanged);
    }
    for id in filtered.changed.keys() {
        assignment.insert(id.clone(), HighlightColor::Changed);
    }
    match direction {
        DiffDirection::NewVsOld => {
            for id in filtered.added.keys() {
                assignment.insert(id.clone(), HighlightColor::Added);
            }
        }
        DiffDirection::OldVsNew => {
            for id in filtered.removed.keys() {
                assignment.insert(id.clone(), HighlightColor::Removed);
            }
        }
    }

    assignment
}

/// Applies the diff colors to a document and re-serializes it.
///
/// The input definitions are left untouched; colors are written to a clone.
/// Ids with no matching DI shape are skipped silently.
pub fn colorize(
    definitions: &ParsedDefinitions,
    filtered: &FilteredDiff,
    direction: DiffDirection,
) -> Result<(String, ColorAssignment)> {
    let assignment = build_color_assignment(filtered, direction);

    let mut tree = definitions.tree().clone();
    clear_colors(&mut tree);

    let mut colored_any = false;
    tree.for_each_element_mut(&mut |element| {
        if !matches!(element.local_name(), "BPMNShape" | "BPMNEdge") {
            return;
        }
        let Some(target) = element.attr("bpmnElement") else {
            return;
        };
        if let Some(color) = assignment.get(target) {
            let (stroke, fill) = (color.stroke(), color.fill());
            element.set_attr(STROKE_ATTR, stroke);
            element.set_attr(FILL_ATTR, fill);
            colored_any = true;
        }
    });

    // Only declare the namespace once a color attribute actually landed.
    if colored_any && tree.attr("xmlns:bioc").is_none() {
        tree.set_attr("xmlns:bioc", BIOC_NS);
    }

    let xml = to_xml_string(&tree)?;
    Ok((xml, assignment))
}

/// Removes every color attribute left over from a previous cycle.
fn clear_colors(tree: &mut XmlElement) {
    tree.for_each_element_mut(&mut |element| {
        if element.attr(STROKE_ATTR).is_some() {
            element.remove_attr(STROKE_ATTR);
        }
        if element.attr(FILL_ATTR).is_some() {
            element.remove_attr(FILL_ATTR);
        }
    });
}
