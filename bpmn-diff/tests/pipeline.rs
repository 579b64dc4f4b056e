//! End-to-end tests for the diff pipeline.
//!
//! These tests exercise the public API the way the diff view uses it:
//! parse two BPMN XML versions, diff, filter, classify and colorize.

use bpmn_diff::{
    build_color_assignment, diff_definitions, filter_no_op_changes, summarize, AttrChange,
    DiffDirection, DiffResult, DiffView, ElementChange, HighlightColor, NoChangesReason,
    ParsedDefinitions,
};
use rustc_hash::FxHashMap;

/// Builds a one-task process with the task at the given position.
fn diagram(task_name: &str, x: i32, y: i32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"
    xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI"
    xmlns:dc="http://www.omg.org/spec/DD/20100524/DC"
    xmlns:di="http://www.omg.org/spec/DD/20100524/DI" id="Definitions_1">
  <bpmn:process id="Process_1" isExecutable="true">
    <bpmn:startEvent id="StartEvent_1" name="Start">
      <bpmn:outgoing>Flow_1</bpmn:outgoing>
    </bpmn:startEvent>
    <bpmn:userTask id="Task_1" name="{task_name}">
      <bpmn:incoming>Flow_1</bpmn:incoming>
    </bpmn:userTask>
    <bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="Task_1" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="BPMNDiagram_1">
    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">
      <bpmndi:BPMNShape id="StartEvent_1_di" bpmnElement="StartEvent_1">
        <dc:Bounds x="179" y="99" width="36" height="36" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Task_1_di" bpmnElement="Task_1">
        <dc:Bounds x="{x}" y="{y}" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNEdge id="Flow_1_di" bpmnElement="Flow_1">
        <di:waypoint x="215" y="117" />
        <di:waypoint x="{x}" y="117" />
      </bpmndi:BPMNEdge>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>"#
    )
}

fn parse(xml: &str) -> ParsedDefinitions {
    ParsedDefinitions::parse(xml).unwrap()
}

fn synthetic_change(id: &str, with_attr: bool) -> ElementChange {
    let mut attrs = FxHashMap::default();
    if with_attr {
        attrs.insert(
            "name".to_string(),
            AttrChange {
                old: Some("a".to_string()),
                new: Some("b".to_string()),
            },
        );
    }
    ElementChange {
        id: id.to_string(),
        name: Some(id.to_string()),
        element_type: Some("bpmn:task".to_string()),
        model: None,
        attrs,
    }
}

// Property 1: a diff where every changed entry has empty attrs filters down
// to nothing.
#[test]
fn all_no_op_changes_filter_to_empty() {
    let mut raw = DiffResult::default();
    for id in ["StartEvent_1", "Task_1", "Process_1"] {
        raw.changed
            .insert(id.to_string(), synthetic_change(id, false));
    }

    let filtered = filter_no_op_changes(&raw);
    assert!(filtered.changed.is_empty());

    let summary = summarize(&filtered, "<doc />", "<doc />");
    assert!(summary.no_changes_existing);
}

// Property 2: whitespace-only differences classify as "identical".
#[test]
fn whitespace_only_difference_is_identical() {
    let compact = diagram("Check order", 270, 77).replace("\n  ", "\n");
    let original = diagram("Check order", 270, 77);

    let raw = diff_definitions(&parse(&original), &parse(&compact));
    let filtered = filter_no_op_changes(&raw);
    let summary = summarize(&filtered, &original, &compact);

    assert!(summary.no_changes_existing);
    assert_eq!(summary.reason, NoChangesReason::Identical);
}

// Property 3a: added and removed never overlap.
#[test]
fn added_and_removed_are_disjoint() {
    let previous = parse(&diagram("Check order", 270, 77));
    let current = parse(
        &diagram("Check order", 270, 77).replace("Task_1", "Task_2"),
    );

    let raw = diff_definitions(&previous, &current);
    for id in raw.added.keys() {
        assert!(!raw.removed.contains_key(id), "{} in both added and removed", id);
    }
    assert!(raw.added.contains_key("Task_2"));
    assert!(raw.removed.contains_key("Task_1"));
}

// Property 3b: a pure move is layout-changed only; a pure rename is changed
// only.
#[test]
fn moves_and_renames_classify_separately() {
    let base = parse(&diagram("Check order", 270, 77));

    // Moved 10px, nothing else.
    let moved = parse(&diagram("Check order", 280, 77));
    let raw = diff_definitions(&base, &moved);
    let filtered = filter_no_op_changes(&raw);
    assert!(filtered.layout_changed.contains_key("Task_1"));
    assert!(!filtered.changed.contains_key("Task_1"));

    // Renamed, same position.
    let renamed = parse(&diagram("Check invoice", 270, 77));
    let raw = diff_definitions(&base, &renamed);
    let filtered = filter_no_op_changes(&raw);
    assert!(filtered.changed.contains_key("Task_1"));
    assert!(!filtered.layout_changed.contains_key("Task_1"));
}

// Property 4: the total count always equals the sum of the four filtered
// category sizes, for pseudo-random synthetic diffs.
#[test]
fn total_count_matches_category_sums() {
    // Small deterministic LCG; no need for a real RNG here.
    let mut seed: u64 = 0x5DEECE66D;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    for round in 0..50 {
        let mut raw = DiffResult::default();
        for i in 0..(next() % 8) {
            let id = format!("A{}_{}", round, i);
            raw.added.insert(id.clone(), synthetic_change(&id, false));
        }
        for i in 0..(next() % 8) {
            let id = format!("R{}_{}", round, i);
            raw.removed.insert(id.clone(), synthetic_change(&id, false));
        }
        for i in 0..(next() % 8) {
            let id = format!("C{}_{}", round, i);
            // Mix real changes and no-ops.
            raw.changed
                .insert(id.clone(), synthetic_change(&id, i % 2 == 0));
        }
        for i in 0..(next() % 8) {
            let id = format!("L{}_{}", round, i);
            raw.layout_changed
                .insert(id.clone(), synthetic_change(&id, true));
        }

        let filtered = filter_no_op_changes(&raw);
        let summary = summarize(&filtered, "<a />", "<b />");
        assert_eq!(
            summary.total_change_count,
            filtered.added.len()
                + filtered.removed.len()
                + filtered.changed.len()
                + filtered.layout_changed.len()
        );
    }
}

// Property 5: an element that is both changed and layout-changed ends up
// orange (changed), verifying the layout -> changed application order.
#[test]
fn changed_color_beats_layout_color() {
    let previous = parse(&diagram("Check order", 270, 77));
    let current = parse(&diagram("Check invoice", 270, 150));

    let raw = diff_definitions(&previous, &current);
    let filtered = filter_no_op_changes(&raw);
    assert!(filtered.changed.contains_key("Task_1"));
    assert!(filtered.layout_changed.contains_key("Task_1"));

    let assignment = build_color_assignment(&filtered, DiffDirection::NewVsOld);
    assert_eq!(assignment.get("Task_1"), Some(&HighlightColor::Changed));
}

// Property 6: each direction colorizes exactly one of added/removed.
#[test]
fn direction_is_exclusive() {
    let previous = parse(&diagram("Check order", 270, 77));
    let current = parse(
        &diagram("Check order", 270, 77).replace("Task_1", "Task_2"),
    );

    let raw = diff_definitions(&previous, &current);
    let filtered = filter_no_op_changes(&raw);

    let new_vs_old = build_color_assignment(&filtered, DiffDirection::NewVsOld);
    assert!(new_vs_old.values().any(|c| *c == HighlightColor::Added));
    assert!(!new_vs_old.values().any(|c| *c == HighlightColor::Removed));

    let old_vs_new = build_color_assignment(&filtered, DiffDirection::OldVsNew);
    assert!(old_vs_new.values().any(|c| *c == HighlightColor::Removed));
    assert!(!old_vs_new.values().any(|c| *c == HighlightColor::Added));
}

// Property 7: a missing previous document falls back to a self-comparison
// instead of failing.
#[test]
fn missing_previous_is_a_no_change_baseline() {
    let mut view = DiffView::new();
    view.set_current_xml(diagram("Check order", 270, 77)).unwrap();

    let summary = view.summary().unwrap();
    assert!(summary.no_changes_existing);
    assert_eq!(summary.reason, NoChangesReason::Identical);
    assert_eq!(view.fallback_count(), 1);
}

// The colorized output round-trips through the document model and parses
// back cleanly.
#[test]
fn colorized_output_reimports() {
    let mut view = DiffView::new();
    view.set_previous_xml(diagram("Check order", 270, 77)).unwrap();
    view.set_current_xml(diagram("Check invoice", 280, 77)).unwrap();

    let (xml, assignment) = view.colorized_xml().unwrap();
    assert!(!assignment.is_empty());
    assert!(xml.contains("bioc:stroke"));

    // The rendering layer re-imports this string; it must parse.
    let reimported = ParsedDefinitions::parse(&xml).unwrap();
    assert!(reimported.element("Task_1").is_some());
}
