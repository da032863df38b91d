//! Structural checks on decoded inputs.
//!
//! Transitions between states are deliberately not checked: a dangling
//! `Next` is dropped at layout time. Only problems that leave nothing
//! sensible to draw are errors.

use std::collections::HashMap;

use log::debug;
use stepviz_core::semantic::{Definition, StateType, TimelineData};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    locate,
    span::Span,
};

pub(crate) fn validate_definition(source: &str, definition: &Definition) -> Result<(), ParseError> {
    let mut collector = DiagnosticCollector::new();
    check_definition(source, definition, &mut collector);
    collector.finish()
}

fn check_definition(source: &str, definition: &Definition, collector: &mut DiagnosticCollector) {
    if !definition.is_empty() && !definition.states().contains_key(definition.start_at()) {
        let span = locate::value_spans(source, "StartAt", definition.start_at())
            .into_iter()
            .next()
            .unwrap_or_else(|| locate::first_key_span(source, "StartAt"));
        collector.emit(
            Diagnostic::warning(format!(
                "start state `{}` is not declared",
                definition.start_at()
            ))
            .with_code(ErrorCode::E204)
            .with_label(span, "referenced here"),
        );
    }

    for (name, state) in definition.states() {
        match state.kind() {
            StateType::Parallel if state.branches().is_empty() => {
                collector.emit(
                    Diagnostic::error(format!("parallel state `{name}` has no branches"))
                        .with_code(ErrorCode::E200)
                        .with_label(locate::first_key_span(source, name), "declared here")
                        .with_help("add at least one state machine to `Branches`"),
                );
            }
            StateType::Map if state.iterator().is_none() => {
                collector.emit(
                    Diagnostic::error(format!("map state `{name}` has no iterator"))
                        .with_code(ErrorCode::E201)
                        .with_label(locate::first_key_span(source, name), "declared here")
                        .with_help("add an `Iterator` or `ItemProcessor` state machine"),
                );
            }
            _ => {}
        }

        for nested in state.branches().iter().chain(state.iterator()) {
            check_definition(source, nested, collector);
        }
    }
}

pub(crate) fn validate_timeline(source: &str, data: &TimelineData) -> Result<(), ParseError> {
    let mut collector = DiagnosticCollector::new();
    // Occurrence counter per id, to label the right record among duplicates
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for record in data.nodes() {
        let id = record.id();
        let occurrence = seen.entry(id).or_insert(0);
        let spans = locate::value_spans(source, "id", id);
        let span_of = |index: usize| spans.get(index).copied().unwrap_or_default();
        let span = span_of(*occurrence);

        if *occurrence > 0 {
            collector.emit(
                Diagnostic::error(format!("duplicate record id `{id}`"))
                    .with_code(ErrorCode::E203)
                    .with_label(span, "duplicate id")
                    .with_secondary_label(span_of(0), "first used here")
                    .with_help("record ids must be unique"),
            );
        }
        *occurrence += 1;

        if record.end_time() < record.start_time() {
            collector.emit(
                Diagnostic::error(format!("record `{id}` ends before it starts"))
                    .with_code(ErrorCode::E202)
                    .with_label(span, "record declared here")
                    .with_help("`endTime` must not be earlier than `startTime`"),
            );
        }

        if let Some(parent) = record.parent_id() {
            if data.find(parent).is_none() {
                collector.emit(unknown_record(source, "parentId", parent));
            }
        }
    }

    for (from, to) in data.edges() {
        for id in [from, to] {
            if data.find(id).is_none() {
                collector.emit(unknown_record(source, "edges", id));
            }
        }
    }

    debug!(records = data.nodes().len(), edges = data.edges().len(); "Timeline validated");
    collector.finish()
}

fn unknown_record(source: &str, key: &str, id: &str) -> Diagnostic {
    let quoted = format!("\"{id}\"");
    let span = source
        .find(&quoted)
        .map(|start| Span::new(start..start + quoted.len()))
        .unwrap_or_else(|| locate::first_key_span(source, key));
    Diagnostic::warning(format!("`{id}` does not name a timeline record"))
        .with_code(ErrorCode::E205)
        .with_label(span, "unknown record")
}
