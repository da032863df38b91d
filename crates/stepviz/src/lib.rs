//! Stepviz - Workflow state machine diagrams and execution timelines.
//!
//! Parsing, layout and rendering for JSON workflow definitions. A definition
//! becomes a directed graph of states, with nested graphs for `Parallel` and
//! `Map` states, laid out in ranks and exported to SVG. Execution records
//! become a Gantt-style timeline chart.
//!
//! For one-shot rendering use [`WorkflowRenderer`]. Hosts that react to
//! clicks, hover and zoom keep a [`view::GraphView`] instead.

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod route;
pub mod shape;
pub mod structure;
pub mod timeline;
pub mod view;
pub mod viewport;

pub use stepviz_core::{color, draw, geometry, intersect, semantic};

pub use error::StepvizError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, GraphScene, svg::SvgBuilder};
use layout::Engine;
use semantic::{Definition, StatusOverlay, TimelineData};
use structure::WorkflowGraph;
use timeline::{DataZoom, TimelineChart, TimelineMapper};
use viewport::{CanvasOptions, Viewport};

/// Parses and renders workflows and timelines.
///
/// # Examples
///
/// ```rust
/// use stepviz::{WorkflowRenderer, viewport::CanvasOptions};
///
/// let source = r#"{
///     "StartAt": "Hello",
///     "States": { "Hello": { "Type": "Pass", "End": true } }
/// }"#;
///
/// let renderer = WorkflowRenderer::default();
/// let definition = renderer.parse_definition(source).expect("Failed to parse");
/// let svg = renderer
///     .render_graph_svg(&definition, None, CanvasOptions::bounded(1200.0, 800.0))
///     .expect("Failed to render");
///
/// assert!(svg.contains(r#"data-state="Hello""#));
/// ```
#[derive(Debug, Default)]
pub struct WorkflowRenderer {
    config: AppConfig,
    show_legend: bool,
}

impl WorkflowRenderer {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            show_legend: false,
        }
    }

    /// Appends a legend of status colors below rendered graphs.
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a JSON workflow definition.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Parse`] for malformed JSON or a document that
    /// is not a definition.
    pub fn parse_definition(&self, source: &str) -> Result<Definition, StepvizError> {
        info!("Parsing workflow definition");

        let definition = stepviz_parser::parse_definition(source)
            .map_err(|err| StepvizError::new_parse_error(err, source))?;

        debug!(states = definition.total_state_count(); "Definition parsed successfully");
        trace!(definition:?; "Parsed definition");

        Ok(definition)
    }

    /// Parses a JSON map from state names to execution statuses.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Parse`] if the document is not a status map.
    pub fn parse_status_overlay(&self, source: &str) -> Result<StatusOverlay, StepvizError> {
        stepviz_parser::parse_status_overlay(source)
            .map_err(|err| StepvizError::new_parse_error(err, source))
    }

    /// Parses JSON timeline records and precedence edges.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Parse`] if the document is not timeline data.
    pub fn parse_timeline(&self, source: &str) -> Result<TimelineData, StepvizError> {
        stepviz_parser::parse_timeline(source)
            .map_err(|err| StepvizError::new_parse_error(err, source))
    }

    /// Renders a definition to an SVG document fitted into `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Graph`] for definitions that cannot be drawn,
    /// such as a `Parallel` state without branches, and
    /// [`StepvizError::Export`] for rendering failures.
    pub fn render_graph_svg(
        &self,
        definition: &Definition,
        statuses: Option<&StatusOverlay>,
        canvas: CanvasOptions,
    ) -> Result<String, StepvizError> {
        info!(start_at = definition.start_at(); "Building workflow structure");
        let graph = WorkflowGraph::try_from_definition(definition, true)?;

        let layout = Engine::new(self.config.layout(), self.config.style().text_definition())
            .layout(&graph)?;
        info!(
            nodes = layout.nodes().len(),
            width = layout.size().width(),
            height = layout.size().height();
            "Layout calculated"
        );

        let viewport = Viewport::fit(layout.size(), canvas, self.config.viewport());

        let empty = StatusOverlay::new();
        let mut scene = GraphScene::new(
            &layout,
            viewport.canvas(),
            viewport.transform(),
            statuses.unwrap_or(&empty),
        );
        scene.show_legend = self.show_legend;

        let mut exporter = SvgBuilder::new(self.config.style()).build()?;
        let svg = exporter.export_graph(&scene)?;

        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Maps timeline data to a chart.
    ///
    /// With `drill_down` set, only the direct children of that record are
    /// charted.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Timeline`] if the drill-down record does not
    /// exist.
    pub fn timeline_chart(
        &self,
        data: &TimelineData,
        zoom: &DataZoom,
        drill_down: Option<&str>,
    ) -> Result<TimelineChart, StepvizError> {
        let mapper = TimelineMapper::new(
            self.config.timeline().clone(),
            self.config.style().text_definition(),
        );

        let chart = match drill_down {
            Some(parent_id) => mapper.drill_down(data, parent_id, zoom)?,
            None => mapper.map(data, zoom),
        };
        info!(
            bars = chart.bars.len(),
            rows = chart.categories.len();
            "Timeline mapped"
        );
        Ok(chart)
    }

    /// Renders timeline data to an SVG document.
    ///
    /// # Errors
    ///
    /// See [`WorkflowRenderer::timeline_chart`]; rendering failures are
    /// reported as [`StepvizError::Export`].
    pub fn render_timeline_svg(
        &self,
        data: &TimelineData,
        zoom: &DataZoom,
        drill_down: Option<&str>,
    ) -> Result<String, StepvizError> {
        let chart = self.timeline_chart(data, zoom, drill_down)?;
        let mut exporter = SvgBuilder::new(self.config.style()).build()?;
        Ok(exporter.export_timeline(&chart)?)
    }

    /// Renders timeline data to the chart's JSON form, for hosts that draw
    /// the chart themselves.
    ///
    /// # Errors
    ///
    /// See [`WorkflowRenderer::timeline_chart`].
    pub fn render_timeline_json(
        &self,
        data: &TimelineData,
        zoom: &DataZoom,
        drill_down: Option<&str>,
    ) -> Result<String, StepvizError> {
        let chart = self.timeline_chart(data, zoom, drill_down)?;
        serde_json::to_string_pretty(&chart).map_err(|err| StepvizError::Export(Box::new(err)))
    }
}
