//! No-op pruning and change summaries.
//!
//! The raw differ output may contain changed entries with an empty attrs
//! map (nested-content-only changes, or the differ's habit of flagging the
//! start event). These are not real changes and must never reach the
//! display lists. Filtering is a pure function over the raw result; the
//! original `DiffResult` is left untouched.

use rustc_hash::FxHashMap;

use crate::diff::{DiffResult, ElementChange};
use crate::document::strip_whitespace;

/// Why a diff produced no visible changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoChangesReason {
    /// There are changes, or no comparison ran yet.
    None,
    /// The two documents are the same modulo whitespace.
    Identical,
    /// The documents differ textually but the differ could not surface a
    /// structural change (differently encoded but equivalent documents).
    Incomparable,
}

impl NoChangesReason {
    /// The wire string surfaced to the change-list UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoChangesReason::None => "",
            NoChangesReason::Identical => "identical",
            NoChangesReason::Incomparable => "incomparable",
        }
    }
}

/// A display-safe copy of a diff: same four categories, no-op changed
/// entries pruned.
#[derive(Debug, Clone, Default)]
pub struct FilteredDiff {
    pub added: FxHashMap<String, ElementChange>,
    pub removed: FxHashMap<String, ElementChange>,
    pub changed: FxHashMap<String, ElementChange>,
    pub layout_changed: FxHashMap<String, ElementChange>,
}

impl FilteredDiff {
    /// Total number of visible changes across all four categories.
    pub fn total_change_count(&self) -> usize {
        self.removed.len() + self.changed.len() + self.added.len() + self.layout_changed.len()
    }

    /// Returns true if no visible change remains.
    pub fn is_empty(&self) -> bool {
        self.total_change_count() == 0
    }
}

/// Derives a filtered copy of the raw diff, dropping changed entries whose
/// attrs map is empty. Added, removed and layout-changed pass through
/// unfiltered.
pub fn filter_no_op_changes(diff: &DiffResult) -> FilteredDiff {
    let changed = diff
        .changed
        .iter()
        .filter(|(_, change)| !change.is_no_op())
        .map(|(id, change)| (id.clone(), change.clone()))
        .collect();

    FilteredDiff {
        added: diff.added.clone(),
        removed: diff.removed.clone(),
        changed,
        layout_changed: diff.layout_changed.clone(),
    }
}

/// Summary values surfaced to the change-list UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeSummary {
    pub total_change_count: usize,
    pub no_changes_existing: bool,
    pub reason: NoChangesReason,
}

/// Summarizes a filtered diff.
///
/// When nothing visible changed, the raw XML strings decide why: equal
/// after whitespace stripping means the versions are identical, anything
/// else means the differ could not align them.
pub fn summarize(filtered: &FilteredDiff, previous_xml: &str, current_xml: &str) -> ChangeSummary {
    let total_change_count = filtered.total_change_count();
    let no_changes_existing = total_change_count == 0;

    let reason = if !no_changes_existing {
        NoChangesReason::None
    } else if strip_whitespace(previous_xml) == strip_whitespace(current_xml) {
        NoChangesReason::Identical
    } else {
        NoChangesReason::Incomparable
    };

    ChangeSummary {
        total_change_count,
        no_changes_existing,
        reason,
    }
}
