//! Export of laid out graphs and timeline charts.
//!
//! This is the last stage of the pipeline:
//!
//! ```text
//! JSON definition             JSON execution records
//!     ↓ parse                     ↓ parse
//! Definition                  TimelineData
//!     ↓ structure                 ↓ timeline
//! WorkflowGraph               TimelineChart
//!     ↓ layout                    │
//! GraphLayout + Viewport          │
//!     ↓ export (this module)      ↓
//! SVG document                SVG document / JSON
//! ```
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`StepvizError::Export`] at the crate boundary.
//!
//! [`StepvizError::Export`]: crate::StepvizError::Export

/// SVG export backend.
pub mod svg;

use crate::timeline::TimelineChart;

pub use self::svg::GraphScene;

/// Abstraction for export backends.
pub trait Exporter {
    /// Renders a laid out graph as seen through its viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be converted.
    fn export_graph(&mut self, scene: &GraphScene<'_>) -> Result<String, Error>;

    /// Renders a timeline chart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the chart cannot be converted.
    fn export_timeline(&mut self, chart: &TimelineChart) -> Result<String, Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
