//! bpmn-diff - Structural diff and change classification for BPMN diagrams.
//!
//! Given two versions of a BPMN 2.0 XML document, this library computes a
//! structural diff (added, removed, changed and layout-changed elements),
//! turns it into human-readable change lists, and produces a colorized copy
//! of the document for rendering.
//!
//! # Pipeline
//!
//! Two XML strings are parsed into [`ParsedDefinitions`], diffed into a
//! [`DiffResult`], pruned of no-op entries by [`filter_no_op_changes`],
//! classified into display lists, and handed to the reconciler which writes
//! highlight colors into a cloned document tree and re-serializes it.
//! [`DiffView`] drives the whole pipeline for one comparison and re-runs it
//! whenever either input changes.
//!
//! # Example
//!
//! ```no_run
//! use bpmn_diff::DiffView;
//!
//! let mut view = DiffView::new();
//! view.set_previous_xml(std::fs::read_to_string("v1.bpmn")?)?;
//! view.set_current_xml(std::fs::read_to_string("v2.bpmn")?)?;
//!
//! let summary = view.summary().unwrap();
//! println!("{} changes", summary.total_change_count);
//! let (colorized_xml, _colors) = view.colorized_xml()?;
//! # let _ = colorized_xml;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod color;
pub mod diff;
pub mod document;
pub mod error;
pub mod filter;
pub mod model;
pub mod view;

// Re-export commonly used types
pub use classify::{build_change_lists, ChangeListEntry, ChangeLists};
pub use color::{
    build_color_assignment, colorize, ColorAssignment, DiffDirection, HighlightColor,
};
pub use diff::{diff_definitions, AttrChange, ChangeFlags, DiffResult, ElementChange};
pub use error::{Error, Result};
pub use filter::{filter_no_op_changes, summarize, ChangeSummary, FilteredDiff, NoChangesReason};
pub use model::{Bounds, DefaultNaming, DiagramElement, ElementKind, ElementNaming, ModelRef, ParsedDefinitions};
pub use view::DiffView;
