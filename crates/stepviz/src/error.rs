//! Error types for stepviz operations.
//!
//! This module provides the main error type [`StepvizError`] which wraps
//! the error conditions that can occur while parsing, laying out and
//! rendering workflows and timelines.

use std::io;

use thiserror::Error;

use stepviz_parser::error::ParseError;

/// The main error type for stepviz operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// [`ParseError`], so that callers can render labelled spans.
#[derive(Debug, Error)]
pub enum StepvizError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for StepvizError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl StepvizError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
