//! Semantic model of workflow definitions and their executions.
//!
//! These types mirror the JSON inputs accepted by stepviz:
//!
//! - [`Definition`]: a state machine in the Amazon States Language shape
//!   (`StartAt`, `States`, nested `Branches` and `Iterator`)
//! - [`StatusOverlay`]: execution status per state name
//! - [`TimelineData`]: timed execution records for the timeline chart
//!
//! Deserialization is lenient. Unknown fields are ignored, unknown state
//! types are kept verbatim, and transitions are not checked against the
//! declared states.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A state machine: the states in document order and the entry state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Definition {
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    start_at: String,
    #[serde(default)]
    states: IndexMap<String, State>,
}

impl Definition {
    pub fn new(start_at: impl Into<String>) -> Self {
        Self {
            comment: None,
            start_at: start_at.into(),
            states: IndexMap::new(),
        }
    }

    /// Appends a state, replacing any earlier state with the same name.
    pub fn with_state(mut self, name: impl Into<String>, state: State) -> Self {
        self.states.insert(name.into(), state);
        self
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn start_at(&self) -> &str {
        &self.start_at
    }

    pub fn states(&self) -> &IndexMap<String, State> {
        &self.states
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of states including the states of nested branches and iterators.
    pub fn total_state_count(&self) -> usize {
        self.states
            .values()
            .map(|state| {
                1 + state
                    .branches()
                    .iter()
                    .chain(state.iterator())
                    .map(Definition::total_state_count)
                    .sum::<usize>()
            })
            .sum()
    }
}

/// A transition target inside `Catch` or `Choices`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transition {
    #[serde(default)]
    next: Option<String>,
}

impl Transition {
    pub fn new(next: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
        }
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// A single state of a [`Definition`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct State {
    #[serde(rename = "Type")]
    kind: StateType,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    end: bool,
    #[serde(default)]
    catch: Vec<Transition>,
    #[serde(default)]
    choices: Vec<Transition>,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    branches: Vec<Definition>,
    #[serde(default, alias = "ItemProcessor")]
    iterator: Option<Definition>,
}

impl State {
    pub fn new(kind: StateType) -> Self {
        Self {
            kind,
            comment: None,
            next: None,
            end: false,
            catch: Vec::new(),
            choices: Vec::new(),
            default: None,
            branches: Vec::new(),
            iterator: None,
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_end(mut self, end: bool) -> Self {
        self.end = end;
        self
    }

    pub fn with_catch(mut self, next: impl Into<String>) -> Self {
        self.catch.push(Transition::new(next));
        self
    }

    pub fn with_choice(mut self, next: impl Into<String>) -> Self {
        self.choices.push(Transition::new(next));
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_branch(mut self, branch: Definition) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn with_iterator(mut self, iterator: Definition) -> Self {
        self.iterator = Some(iterator);
        self
    }

    pub fn kind(&self) -> &StateType {
        &self.kind
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn is_end(&self) -> bool {
        self.end
    }

    pub fn catch(&self) -> &[Transition] {
        &self.catch
    }

    pub fn choices(&self) -> &[Transition] {
        &self.choices
    }

    pub fn default_next(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn branches(&self) -> &[Definition] {
        &self.branches
    }

    pub fn iterator(&self) -> Option<&Definition> {
        self.iterator.as_ref()
    }

    /// Successor state names in edge order: `Next`, every `Catch`, every
    /// `Choices` entry, then `Default`. Duplicates are kept.
    pub fn successors(&self) -> Vec<&str> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.catch.iter().filter_map(Transition::next))
            .chain(self.choices.iter().filter_map(Transition::next))
            .chain(self.default.as_deref())
            .collect()
    }

    /// Returns true if the state leaves the state machine.
    pub fn is_terminal(&self) -> bool {
        self.end || matches!(self.kind, StateType::Succeed | StateType::Fail)
    }
}

/// The `Type` of a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum StateType {
    Task,
    Pass,
    Choice,
    Wait,
    Succeed,
    Fail,
    Parallel,
    Map,
    Other(String),
}

impl StateType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Task => "Task",
            Self::Pass => "Pass",
            Self::Choice => "Choice",
            Self::Wait => "Wait",
            Self::Succeed => "Succeed",
            Self::Fail => "Fail",
            Self::Parallel => "Parallel",
            Self::Map => "Map",
            Self::Other(name) => name,
        }
    }

    /// Parallel and Map states own nested state machines.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Parallel | Self::Map)
    }
}

impl From<String> for StateType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Task" => Self::Task,
            "Pass" => Self::Pass,
            "Choice" => Self::Choice,
            "Wait" => Self::Wait,
            "Succeed" => Self::Succeed,
            "Fail" => Self::Fail,
            "Parallel" => Self::Parallel,
            "Map" => Self::Map,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution status of a state, used to color nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionStatus {
    #[default]
    NotYetStarted,
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
    CaughtError,
}

impl ExecutionStatus {
    /// Every status, in legend order.
    pub const ALL: [ExecutionStatus; 6] = [
        Self::NotYetStarted,
        Self::InProgress,
        Self::Succeeded,
        Self::Failed,
        Self::Cancelled,
        Self::CaughtError,
    ];

    /// CSS class applied to nodes with this status.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::NotYetStarted => "NotYetStarted",
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::CaughtError => "CaughtError",
        }
    }

    /// Nodes that have not run cannot be selected.
    pub fn is_selectable(self) -> bool {
        self != Self::NotYetStarted
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Runtime information about one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct StateInstance {
    #[serde(default)]
    status: ExecutionStatus,
}

impl StateInstance {
    pub fn new(status: ExecutionStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }
}

/// Execution status per state name. Missing states are `NotYetStarted`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StatusOverlay {
    states: IndexMap<String, StateInstance>,
}

impl StatusOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, name: impl Into<String>, status: ExecutionStatus) -> Self {
        self.states.insert(name.into(), StateInstance::new(status));
        self
    }

    pub fn status_of(&self, name: &str) -> ExecutionStatus {
        self.states
            .get(name)
            .map(StateInstance::status)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// One timed execution, times in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    name: String,
    start_time: i64,
    end_time: i64,
}

impl TimelineRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            start_time,
            end_time,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Saturates for records spanning more than `i64::MAX` milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// Timeline input: records plus precedence edges `[from, to]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimelineData {
    #[serde(default)]
    nodes: Vec<TimelineRecord>,
    #[serde(default)]
    edges: Vec<(String, String)>,
}

impl TimelineData {
    pub fn new(nodes: Vec<TimelineRecord>, edges: Vec<(String, String)>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[TimelineRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn find(&self, id: &str) -> Option<&TimelineRecord> {
        self.nodes.iter().find(|record| record.id == id)
    }

    /// Direct children of `parent_id`, in input order.
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a TimelineRecord> {
        self.nodes
            .iter()
            .filter(move |record| record.parent_id.as_deref() == Some(parent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_keeps_document_order() {
        let json = r#"{
            "StartAt": "Zeta",
            "States": {
                "Zeta": { "Type": "Pass", "Next": "Alpha" },
                "Alpha": { "Type": "Succeed" }
            }
        }"#;
        let definition: Definition = serde_json::from_str(json).unwrap();

        assert_eq!(definition.start_at(), "Zeta");
        let names: Vec<_> = definition.states().keys().map(String::as_str).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_state_successor_order() {
        let json = r#"{
            "Type": "Choice",
            "Next": "N",
            "Catch": [{ "ErrorEquals": ["States.ALL"], "Next": "C" }],
            "Choices": [
                { "Variable": "$.x", "NumericEquals": 1, "Next": "X" },
                { "Variable": "$.x", "NumericEquals": 2, "Next": "Y" }
            ],
            "Default": "Z"
        }"#;
        let state: State = serde_json::from_str(json).unwrap();
        assert_eq!(state.successors(), ["N", "C", "X", "Y", "Z"]);
    }

    #[test]
    fn test_state_successors_keep_duplicates() {
        let state = State::new(StateType::Task)
            .with_next("B")
            .with_catch("B");
        assert_eq!(state.successors(), ["B", "B"]);
    }

    #[test]
    fn test_state_type_unknown_is_preserved() {
        let state: State = serde_json::from_str(r#"{ "Type": "Activity" }"#).unwrap();
        assert_eq!(state.kind(), &StateType::Other("Activity".to_string()));
        assert_eq!(state.kind().to_string(), "Activity");
        assert!(!state.kind().is_container());
    }

    #[test]
    fn test_state_terminal() {
        assert!(State::new(StateType::Succeed).is_terminal());
        assert!(State::new(StateType::Fail).is_terminal());
        assert!(State::new(StateType::Task).with_end(true).is_terminal());
        assert!(!State::new(StateType::Task).with_next("B").is_terminal());
    }

    #[test]
    fn test_map_accepts_item_processor() {
        let json = r#"{
            "Type": "Map",
            "ItemProcessor": {
                "StartAt": "Inner",
                "States": { "Inner": { "Type": "Pass", "End": true } }
            },
            "End": true
        }"#;
        let state: State = serde_json::from_str(json).unwrap();
        assert_eq!(state.iterator().unwrap().start_at(), "Inner");
    }

    #[test]
    fn test_total_state_count_includes_nested() {
        let branch = Definition::new("B1").with_state("B1", State::new(StateType::Pass));
        let definition = Definition::new("P")
            .with_state(
                "P",
                State::new(StateType::Parallel)
                    .with_branch(branch.clone())
                    .with_branch(branch),
            )
            .with_state("Done", State::new(StateType::Succeed));
        assert_eq!(definition.total_state_count(), 4);
    }

    #[test]
    fn test_status_overlay_defaults_to_not_started() {
        let json = r#"{ "A": { "status": "Succeeded" }, "B": {} }"#;
        let overlay: StatusOverlay = serde_json::from_str(json).unwrap();

        assert_eq!(overlay.status_of("A"), ExecutionStatus::Succeeded);
        assert_eq!(overlay.status_of("B"), ExecutionStatus::NotYetStarted);
        assert_eq!(overlay.status_of("missing"), ExecutionStatus::NotYetStarted);
        assert!(!ExecutionStatus::NotYetStarted.is_selectable());
        assert!(ExecutionStatus::CaughtError.is_selectable());
    }

    #[test]
    fn test_timeline_data_parse() {
        let json = r#"{
            "nodes": [
                { "id": "1", "name": "root", "startTime": 1000, "endTime": 6000 },
                { "id": "2", "parentId": "1", "name": "child", "startTime": 1000, "endTime": 2000 }
            ],
            "edges": [["1", "2"]]
        }"#;
        let data: TimelineData = serde_json::from_str(json).unwrap();

        assert_eq!(data.nodes().len(), 2);
        assert_eq!(data.find("1").unwrap().duration_ms(), 5000);
        assert_eq!(data.children_of("1").count(), 1);
        assert_eq!(data.edges(), [("1".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_duration_saturates() {
        let record = TimelineRecord::new("1", "root", i64::MIN, i64::MAX);
        assert_eq!(record.duration_ms(), i64::MAX);
    }
}
