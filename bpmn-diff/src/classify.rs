//! Human-readable change lists.
//!
//! Each change record is mapped to a (name, type) display pair. Records
//! with a direct element type use their own name; pool-level records carry
//! their info nested under `model` instead. Both halves of the pair go
//! through the injected naming lookup so the mapping stays testable with a
//! fake table.

use crate::diff::ElementChange;
use crate::filter::FilteredDiff;
use crate::model::ElementNaming;

/// A display-ready change-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeListEntry {
    pub name: String,
    pub element_type: String,
}

/// Classifies one change record into a display entry.
pub fn classify(change: &ElementChange, naming: &dyn ElementNaming) -> ChangeListEntry {
    let (raw_name, raw_type) = match (&change.element_type, &change.model) {
        (Some(element_type), _) => (change.name.as_deref(), element_type.as_str()),
        (None, Some(model)) => (model.name.as_deref(), model.element_type.as_str()),
        (None, None) => (change.name.as_deref(), ""),
    };

    ChangeListEntry {
        name: naming.name_label(raw_name.unwrap_or("")),
        element_type: naming.type_label(raw_type),
    }
}

/// The four display lists, in stable id order.
#[derive(Debug, Clone, Default)]
pub struct ChangeLists {
    pub added: Vec<ChangeListEntry>,
    pub removed: Vec<ChangeListEntry>,
    pub changed: Vec<ChangeListEntry>,
    pub layout_changed: Vec<ChangeListEntry>,
}

/// Builds the four display lists from a filtered diff.
///
/// The classifier is applied identically to every category; entries are
/// ordered by element id so repeated diffs render the same list.
pub fn build_change_lists(filtered: &FilteredDiff, naming: &dyn ElementNaming) -> ChangeLists {
    ChangeLists {
        added: classify_category(&filtered.added, naming),
        removed: classify_category(&filtered.removed, naming),
        changed: classify_category(&filtered.changed, naming),
        layout_changed: classify_category(&filtered.layout_changed, naming),
    }
}

fn classify_category(
    category: &rustc_hash::FxHashMap<String, ElementChange>,
    naming: &dyn ElementNaming,
) -> Vec<ChangeListEntry> {
    let mut ids: Vec<&String> = category.keys().collect();
    ids.sort();
    ids.iter()
        .filter_map(|id| category.get(*id))
        .map(|change| classify(change, naming))
        .collect()
}
