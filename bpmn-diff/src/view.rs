//! Per-view diff pipeline and state machine.
//!
//! A `DiffView` owns the two document versions of one comparison. Updating
//! either XML re-runs the whole parse, diff, filter and classify pipeline;
//! there is no incremental path. Toggling the direction only re-runs the
//! colorize step on the already-computed diff. A failed recompute leaves
//! the last successfully computed state in place.

use crate::classify::{build_change_lists, ChangeLists};
use crate::color::{colorize, ColorAssignment, DiffDirection};
use crate::diff::diff_definitions;
use crate::error::{Error, Result};
use crate::filter::{filter_no_op_changes, summarize, ChangeSummary, FilteredDiff};
use crate::model::{DefaultNaming, ElementNaming, ParsedDefinitions};

/// The fully computed result of one diff cycle.
#[derive(Debug)]
struct ComputedDiff {
    previous: ParsedDefinitions,
    current: ParsedDefinitions,
    filtered: FilteredDiff,
    lists: ChangeLists,
    summary: ChangeSummary,
}

/// One diagram comparison: inputs, labels, direction and computed state.
pub struct DiffView {
    naming: Box<dyn ElementNaming>,
    previous_xml: Option<String>,
    current_xml: Option<String>,
    previous_label: String,
    current_label: String,
    direction: DiffDirection,
    state: Option<ComputedDiff>,
    fallback_count: u64,
}

impl Default for DiffView {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffView {
    /// Creates a view with the standard naming table.
    pub fn new() -> Self {
        Self::with_naming(Box::new(DefaultNaming))
    }

    /// Creates a view with an injected naming table.
    pub fn with_naming(naming: Box<dyn ElementNaming>) -> Self {
        DiffView {
            naming,
            previous_xml: None,
            current_xml: None,
            previous_label: String::new(),
            current_label: String::new(),
            direction: DiffDirection::default(),
            state: None,
            fallback_count: 0,
        }
    }

    /// Sets the labels used for the comparison title.
    pub fn set_labels(&mut self, previous: impl Into<String>, current: impl Into<String>) {
        self.previous_label = previous.into();
        self.current_label = current.into();
    }

    /// Replaces the previous-version XML and re-runs the full pipeline.
    pub fn set_previous_xml(&mut self, xml: impl Into<String>) -> Result<()> {
        self.previous_xml = Some(xml.into());
        self.recompute()
    }

    /// Replaces the current-version XML and re-runs the full pipeline.
    pub fn set_current_xml(&mut self, xml: impl Into<String>) -> Result<()> {
        self.current_xml = Some(xml.into());
        self.recompute()
    }

    /// Selects the diff direction. Only affects colorization; the computed
    /// diff is reused as-is.
    pub fn set_direction(&mut self, direction: DiffDirection) {
        self.direction = direction;
    }

    /// Returns the selected direction.
    pub fn direction(&self) -> DiffDirection {
        self.direction
    }

    /// Returns the display lists of the last successful diff.
    pub fn change_lists(&self) -> Option<&ChangeLists> {
        self.state.as_ref().map(|s| &s.lists)
    }

    /// Returns the summary of the last successful diff.
    pub fn summary(&self) -> Option<&ChangeSummary> {
        self.state.as_ref().map(|s| &s.summary)
    }

    /// Returns the filtered diff of the last successful cycle.
    pub fn diff(&self) -> Option<&FilteredDiff> {
        self.state.as_ref().map(|s| &s.filtered)
    }

    /// How often the missing-previous fallback fired.
    pub fn fallback_count(&self) -> u64 {
        self.fallback_count
    }

    /// The comparison title, ordered by direction.
    pub fn title(&self) -> String {
        match self.direction {
            DiffDirection::NewVsOld => {
                format!("{} vs. {}", self.current_label, self.previous_label)
            }
            DiffDirection::OldVsNew => {
                format!("{} vs. {}", self.previous_label, self.current_label)
            }
        }
    }

    /// Colorizes the document selected by the current direction and
    /// re-serializes it for the rendering layer.
    pub fn colorized_xml(&self) -> Result<(String, ColorAssignment)> {
        let state = self
            .state
            .as_ref()
            .ok_or(Error::MissingDocument("current"))?;
        let definitions = match self.direction {
            DiffDirection::NewVsOld => &state.current,
            DiffDirection::OldVsNew => &state.previous,
        };
        colorize(definitions, &state.filtered, self.direction)
    }

    /// Runs the full parse, diff, filter and classify pipeline.
    ///
    /// Without a current document there is nothing to compare yet and the
    /// view stays in its present state. Any failure also leaves the present
    /// state untouched; the caller surfaces the error to the user.
    fn recompute(&mut self) -> Result<()> {
        let Some(current_xml) = self.current_xml.clone() else {
            return Ok(());
        };
        let previous_xml = match self.previous_xml.clone() {
            Some(xml) => xml,
            None => self.fallback_previous_to_current(&current_xml),
        };

        let previous = ParsedDefinitions::parse(&previous_xml)?;
        let current = ParsedDefinitions::parse(&current_xml)?;

        let raw = diff_definitions(&previous, &current);
        let filtered = filter_no_op_changes(&raw);
        let summary = summarize(&filtered, &previous_xml, &current_xml);
        let lists = build_change_lists(&filtered, self.naming.as_ref());

        self.state = Some(ComputedDiff {
            previous,
            current,
            filtered,
            lists,
            summary,
        });
        Ok(())
    }

    /// Substitutes the current document for a missing previous version.
    ///
    /// This papers over callers that trigger a diff before the previous
    /// version is loaded; the resulting diff is a no-change baseline. Kept
    /// for compatibility, isolated here and counted so the occurrences stay
    /// visible.
    fn fallback_previous_to_current(&mut self, current_xml: &str) -> String {
        log::warn!("previous document missing, diffing current document against itself");
        self.fallback_count += 1;
        current_xml.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NoChangesReason;

    fn doc(task_name: &str) -> String {
        format!(
            r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_1">
  <bpmn:process id="Process_1">
    <bpmn:userTask id="Task_1" name="{task_name}" />
  </bpmn:process>
</bpmn:definitions>"#
        )
    }

    #[test]
    fn test_full_pipeline_on_rename() {
        let mut view = DiffView::new();
        view.set_previous_xml(doc("Check order")).unwrap();
        view.set_current_xml(doc("Check invoice")).unwrap();

        let summary = view.summary().unwrap();
        assert_eq!(summary.total_change_count, 1);
        assert!(!summary.no_changes_existing);

        let lists = view.change_lists().unwrap();
        assert_eq!(lists.changed.len(), 1);
        assert_eq!(lists.changed[0].name, "Check invoice");
        assert_eq!(lists.changed[0].element_type, "User Task");
    }

    #[test]
    fn test_missing_previous_falls_back_to_current() {
        let mut view = DiffView::new();
        view.set_current_xml(doc("Check order")).unwrap();

        assert_eq!(view.fallback_count(), 1);
        let summary = view.summary().unwrap();
        assert!(summary.no_changes_existing);
        assert_eq!(summary.reason, NoChangesReason::Identical);
    }

    #[test]
    fn test_previous_without_current_is_not_an_error() {
        let mut view = DiffView::new();
        view.set_previous_xml(doc("Check order")).unwrap();
        assert!(view.summary().is_none());
    }

    #[test]
    fn test_parse_failure_keeps_last_state() {
        let mut view = DiffView::new();
        view.set_previous_xml(doc("Check order")).unwrap();
        view.set_current_xml(doc("Check invoice")).unwrap();

        let result = view.set_current_xml("<broken");
        assert!(result.is_err());

        // The last successful diff is still served.
        let lists = view.change_lists().unwrap();
        assert_eq!(lists.changed.len(), 1);
    }

    #[test]
    fn test_direction_toggle_reuses_diff_and_flips_title() {
        let mut view = DiffView::new();
        view.set_labels("v1", "v2");
        view.set_previous_xml(doc("Check order")).unwrap();
        view.set_current_xml(doc("Check invoice")).unwrap();

        assert_eq!(view.title(), "v2 vs. v1");
        let before = view.summary().copied();

        view.set_direction(DiffDirection::OldVsNew);
        assert_eq!(view.title(), "v1 vs. v2");
        assert_eq!(view.summary().copied(), before);
    }

    #[test]
    fn test_colorized_xml_requires_a_computed_diff() {
        let view = DiffView::new();
        assert!(view.colorized_xml().is_err());
    }
}
