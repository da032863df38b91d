//! Stepviz Parser
//!
//! Reads the three JSON inputs of stepviz into the semantic model of
//! [`stepviz_core::semantic`]:
//!
//! - [`parse_definition`]: a workflow state machine
//! - [`parse_status_overlay`]: execution status per state
//! - [`parse_timeline`]: timed execution records
//!
//! Each function decodes with `serde_json` and then runs structural checks.
//! Failures are returned as a [`ParseError`](error::ParseError) holding
//! every [`Diagnostic`](error::Diagnostic) found, each with a byte [`Span`]
//! into the source.
//!
//! ```
//! let source = r#"{
//!     "StartAt": "Hello",
//!     "States": { "Hello": { "Type": "Pass", "End": true } }
//! }"#;
//!
//! let definition = stepviz_parser::parse_definition(source).unwrap();
//! assert_eq!(definition.start_at(), "Hello");
//! ```

pub mod error;

mod json;
mod locate;
mod span;
mod validate;

use log::{debug, info};
use stepviz_core::semantic::{Definition, StatusOverlay, TimelineData};

pub use span::Span;

use crate::error::ParseError;

/// Parses and validates a workflow definition.
pub fn parse_definition(source: &str) -> Result<Definition, ParseError> {
    let definition: Definition = json::decode(source, "workflow definition")?;
    validate::validate_definition(source, &definition)?;

    info!(
        states = definition.total_state_count(),
        start_at = definition.start_at();
        "Workflow definition parsed"
    );
    Ok(definition)
}

/// Parses a status overlay `{ "<state>": { "status": "<ExecutionStatus>" } }`.
pub fn parse_status_overlay(source: &str) -> Result<StatusOverlay, ParseError> {
    let overlay: StatusOverlay = json::decode(source, "status overlay")?;
    debug!(states = overlay.len(); "Status overlay parsed");
    Ok(overlay)
}

/// Parses and validates timeline data `{ "nodes": [...], "edges": [[from, to]] }`.
pub fn parse_timeline(source: &str) -> Result<TimelineData, ParseError> {
    let data: TimelineData = json::decode(source, "timeline")?;
    validate::validate_timeline(source, &data)?;

    info!(records = data.nodes().len(); "Timeline parsed");
    Ok(data)
}
