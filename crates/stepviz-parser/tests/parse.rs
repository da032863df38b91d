use proptest::prelude::*;
use stepviz_core::semantic::{ExecutionStatus, StateType};
use stepviz_parser::{
    error::{ErrorCode, Severity},
    parse_definition, parse_status_overlay, parse_timeline,
};

#[test]
fn test_parse_choice_definition() {
    let source = r#"{
        "Comment": "Routes on a flag",
        "StartAt": "Decide",
        "States": {
            "Decide": {
                "Type": "Choice",
                "Choices": [
                    { "Variable": "$.flag", "BooleanEquals": true, "Next": "X" },
                    { "Variable": "$.flag", "BooleanEquals": false, "Next": "Y" }
                ],
                "Default": "Z"
            },
            "X": { "Type": "Pass", "End": true },
            "Y": { "Type": "Pass", "End": true },
            "Z": { "Type": "Fail" }
        }
    }"#;

    let definition = parse_definition(source).expect("Failed to parse");

    assert_eq!(definition.comment(), Some("Routes on a flag"));
    let decide = &definition.states()["Decide"];
    assert_eq!(decide.kind(), &StateType::Choice);
    assert_eq!(decide.successors(), ["X", "Y", "Z"]);
}

#[test]
fn test_parse_nested_parallel_and_map() {
    let source = r#"{
        "StartAt": "Fanout",
        "States": {
            "Fanout": {
                "Type": "Parallel",
                "Branches": [
                    { "StartAt": "L", "States": { "L": { "Type": "Pass", "End": true } } },
                    { "StartAt": "R", "States": { "R": { "Type": "Pass", "End": true } } }
                ],
                "Next": "Each"
            },
            "Each": {
                "Type": "Map",
                "Iterator": { "StartAt": "Work", "States": { "Work": { "Type": "Task", "End": true } } },
                "End": true
            }
        }
    }"#;

    let definition = parse_definition(source).expect("Failed to parse");

    assert_eq!(definition.states()["Fanout"].branches().len(), 2);
    assert!(definition.states()["Each"].iterator().is_some());
    assert_eq!(definition.total_state_count(), 5);
}

#[test]
fn test_parse_empty_definition() {
    let definition = parse_definition("{}").expect("Failed to parse");
    assert!(definition.is_empty());
}

#[test]
fn test_parallel_without_branches_is_error() {
    let source = r#"{
        "StartAt": "Fanout",
        "States": { "Fanout": { "Type": "Parallel", "End": true } }
    }"#;

    let err = parse_definition(source).unwrap_err();
    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E200));

    let span = diag.labels()[0].span();
    assert_eq!(&source[span.start()..span.end()], "\"Fanout\"");
}

#[test]
fn test_map_without_iterator_in_branch_is_error() {
    let source = r#"{
        "StartAt": "P",
        "States": {
            "P": {
                "Type": "Parallel",
                "Branches": [
                    { "StartAt": "Each", "States": { "Each": { "Type": "Map", "End": true } } }
                ],
                "End": true
            }
        }
    }"#;

    let err = parse_definition(source).unwrap_err();
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E201));
}

#[test]
fn test_unknown_start_state_is_only_a_warning() {
    let source = r#"{ "StartAt": "Missing", "States": { "A": { "Type": "Succeed" } } }"#;
    assert!(parse_definition(source).is_ok());
}

#[test]
fn test_syntax_error_reports_code() {
    let err = parse_definition(r#"{ "StartAt": "A", }"#).unwrap_err();
    let diag = &err.diagnostics()[0];

    assert_eq!(diag.code(), Some(ErrorCode::E001));
    assert_eq!(diag.severity(), Severity::Error);
}

#[test]
fn test_wrong_type_reports_data_error() {
    let err = parse_definition(r#"{ "StartAt": 5 }"#).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}

#[test]
fn test_parse_status_overlay() {
    let source = r#"{
        "A": { "status": "Succeeded" },
        "B": { "status": "CaughtError" }
    }"#;

    let overlay = parse_status_overlay(source).expect("Failed to parse");
    assert_eq!(overlay.status_of("A"), ExecutionStatus::Succeeded);
    assert_eq!(overlay.status_of("B"), ExecutionStatus::CaughtError);
    assert_eq!(overlay.status_of("C"), ExecutionStatus::NotYetStarted);
}

#[test]
fn test_parse_status_overlay_unknown_status() {
    let err = parse_status_overlay(r#"{ "A": { "status": "Exploded" } }"#).unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}

#[test]
fn test_parse_timeline() {
    let source = r#"{
        "nodes": [
            { "id": "1-1", "name": "1-1", "startTime": 1609669658000, "endTime": 1609669660000 },
            { "id": "2-1", "parentId": "1-1", "name": "2-1", "startTime": 1609669658000, "endTime": 1609669659000 },
            { "id": "2-2", "parentId": "1-1", "name": "2-2", "startTime": 1609669659000, "endTime": 1609669660000 }
        ],
        "edges": [["2-1", "2-2"]]
    }"#;

    let data = parse_timeline(source).expect("Failed to parse");
    assert_eq!(data.nodes().len(), 3);
    assert_eq!(data.children_of("1-1").count(), 2);
    assert_eq!(data.edges().len(), 1);
}

#[test]
fn test_timeline_end_before_start_is_error() {
    let source = r#"{ "nodes": [ { "id": "a", "name": "a", "startTime": 20, "endTime": 10 } ] }"#;

    let err = parse_timeline(source).unwrap_err();
    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E202));

    let span = diag.labels()[0].span();
    assert_eq!(&source[span.start()..span.end()], "\"a\"");
}

#[test]
fn test_timeline_duplicate_ids_point_at_both_records() {
    let source = r#"{ "nodes": [
        { "id": "a", "name": "first", "startTime": 0, "endTime": 1 },
        { "id": "a", "name": "second", "startTime": 1, "endTime": 2 }
    ] }"#;

    let err = parse_timeline(source).unwrap_err();
    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E203));

    let primary = diag.labels()[0].span();
    let secondary = diag.labels()[1].span();
    assert!(secondary.start() < primary.start());
}

#[test]
fn test_timeline_unknown_edge_is_only_a_warning() {
    let source = r#"{
        "nodes": [ { "id": "a", "name": "a", "startTime": 0, "endTime": 1 } ],
        "edges": [["a", "ghost"]]
    }"#;
    assert!(parse_timeline(source).is_ok());
}

proptest! {
    /// Arbitrary input never panics, and every reported span stays inside the source.
    #[test]
    fn parse_never_panics_and_spans_are_in_bounds(source in "\\PC{0,64}") {
        for err in [
            parse_definition(&source).err(),
            parse_timeline(&source).err(),
            parse_status_overlay(&source).err(),
        ]
        .into_iter()
        .flatten()
        {
            for diag in err.diagnostics() {
                for label in diag.labels() {
                    prop_assert!(label.span().end() <= source.len());
                }
            }
        }
    }
}
