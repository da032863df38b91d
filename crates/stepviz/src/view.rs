//! Interactive graph session.
//!
//! A [`GraphView`] keeps everything a host needs to show one workflow and
//! react to the user: the definition, the flow direction, execution
//! statuses, the selected and hovered states, the viewport, and the last
//! drawing that rendered successfully.
//!
//! Changing the definition, the orientation or the canvas size re-runs the
//! whole pipeline. A failing run is logged and kept in [`GraphView::error`],
//! while the previous drawing stays on screen. Status changes only recolor
//! nodes.
//!
//! Pointer positions are canvas coordinates. They are mapped through the
//! current transform and hit-tested against every node, nested ones
//! included. The innermost state under the pointer wins.

use std::fmt;

use log::{debug, error, info};

use stepviz_core::{
    geometry::{Point, Size},
    semantic::{Definition, StatusOverlay},
};

use crate::{
    config::{AppConfig, Orientation},
    error::StepvizError,
    export::{
        Exporter, GraphScene,
        svg::{Svg, SvgBuilder},
    },
    layout::{Engine, GraphLayout},
    structure::WorkflowGraph,
    viewport::{CanvasOptions, Viewport, ViewportSignal, WheelEvent},
};

/// Called with the selected state name, or `None` when the selection is
/// cleared.
pub type NodeCallback = Box<dyn FnMut(Option<&str>)>;

/// Result of the last successful pipeline run.
#[derive(Debug)]
struct Drawing {
    layout: GraphLayout,
    viewport: Viewport,
}

/// An interactive workflow graph.
pub struct GraphView {
    config: AppConfig,
    exporter: Svg,
    canvas: CanvasOptions,
    orientation: Orientation,
    definition: Option<Definition>,
    statuses: StatusOverlay,
    selected: Option<String>,
    hovered: Option<String>,
    interactive: bool,
    show_legend: bool,
    show_scroll_hint: bool,
    drawing: Option<Drawing>,
    error: Option<StepvizError>,
    callback: Option<NodeCallback>,
}

impl fmt::Debug for GraphView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphView")
            .field("orientation", &self.orientation)
            .field("canvas", &self.canvas)
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("interactive", &self.interactive)
            .field("drawing", &self.drawing)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl GraphView {
    /// Creates an empty, interactive view.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Export`] if the style configuration holds an
    /// invalid color.
    pub fn new(config: AppConfig, canvas: CanvasOptions) -> Result<Self, StepvizError> {
        let exporter = SvgBuilder::new(config.style()).build()?;
        Ok(Self {
            orientation: config.layout().direction(),
            config,
            exporter,
            canvas,
            definition: None,
            statuses: StatusOverlay::new(),
            selected: None,
            hovered: None,
            interactive: true,
            show_legend: false,
            show_scroll_hint: false,
            drawing: None,
            error: None,
            callback: None,
        })
    }

    /// Replaces the definition and redraws. `None` clears the drawing.
    pub fn set_definition(&mut self, definition: Option<Definition>) {
        self.definition = definition;
        self.redraw();
    }

    /// Parses `source` as a JSON definition, then redraws.
    ///
    /// A parse error is handled like a failed render: it is stored and the
    /// previous drawing is kept.
    pub fn set_definition_source(&mut self, source: &str) {
        match stepviz_parser::parse_definition(source) {
            Ok(definition) => self.set_definition(Some(definition)),
            Err(err) => self.fail(StepvizError::new_parse_error(err, source)),
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.redraw();
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Changes the canvas constraints and redraws.
    pub fn resize(&mut self, canvas: CanvasOptions) {
        self.canvas = canvas;
        self.redraw();
    }

    /// Replaces the execution statuses. The layout is kept.
    pub fn set_status_overlay(&mut self, statuses: StatusOverlay) {
        debug!(states = statuses.len(); "Status overlay updated");
        self.statuses = statuses;
    }

    pub fn status_overlay(&self) -> &StatusOverlay {
        &self.statuses
    }

    /// Enables or disables selection and hover.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        if !interactive {
            self.hovered = None;
        }
    }

    pub fn set_show_legend(&mut self, show_legend: bool) {
        self.show_legend = show_legend;
    }

    pub fn set_node_callback(&mut self, callback: impl FnMut(Option<&str>) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Error of the last pipeline run, `None` if it succeeded.
    pub fn error(&self) -> Option<&StepvizError> {
        self.error.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn layout(&self) -> Option<&GraphLayout> {
        self.drawing.as_ref().map(|drawing| &drawing.layout)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.drawing.as_ref().map(|drawing| &drawing.viewport)
    }

    /// Handles a click release at canvas position `point`.
    ///
    /// Returns `true` if the selection changed.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        if !self.interactive {
            return false;
        }
        let Some(drawing) = &self.drawing else {
            return false;
        };

        let graph_point = drawing.viewport.to_graph_point(point);
        match hit_test(&drawing.layout, graph_point) {
            Some(name) => {
                if !self.statuses.status_of(&name).is_selectable() {
                    debug!(state = name; "Ignoring click on a state that has not run");
                    return false;
                }
                info!(state = name; "State selected");
                self.selected = Some(name.clone());
                self.notify(Some(&name));
            }
            None => {
                self.selected = None;
                self.notify(None);
            }
        }
        true
    }

    /// Handles a pointer move to canvas position `point`.
    ///
    /// Returns `true` if the hovered state changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        if !self.interactive {
            return false;
        }
        let hovered = self.drawing.as_ref().and_then(|drawing| {
            hit_test(&drawing.layout, drawing.viewport.to_graph_point(point))
        });
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    pub fn zoom_in(&mut self) {
        if let Some(drawing) = &mut self.drawing {
            drawing.viewport.zoom_in(self.config.viewport());
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(drawing) = &mut self.drawing {
            drawing.viewport.zoom_out(self.config.viewport());
        }
    }

    /// Moves the graph by a drag delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if let Some(drawing) = &mut self.drawing {
            drawing.viewport.pan(dx, dy);
        }
    }

    /// Forwards a wheel gesture to the viewport.
    ///
    /// Returns the signals the host should act on. The scroll hint stays in
    /// the drawing until [`GraphView::hide_scroll_hint`] is called.
    pub fn wheel(&mut self, event: WheelEvent) -> Vec<ViewportSignal> {
        let Some(drawing) = &mut self.drawing else {
            return Vec::new();
        };
        let signals = drawing.viewport.wheel(event);
        if signals.contains(&ViewportSignal::ShowScrollHint) {
            self.show_scroll_hint = true;
        }
        signals
    }

    pub fn hide_scroll_hint(&mut self) {
        self.show_scroll_hint = false;
    }

    /// Restores the fitted transform.
    pub fn center(&mut self) {
        if let Some(drawing) = &mut self.drawing {
            drawing.viewport.reset();
        }
    }

    /// Renders the current drawing as an SVG document.
    ///
    /// Without a drawing the document is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Export`] if rendering fails.
    pub fn svg(&mut self) -> Result<String, StepvizError> {
        let empty = GraphLayout::default();
        let (layout, canvas, transform) = match &self.drawing {
            Some(drawing) => (
                &drawing.layout,
                drawing.viewport.canvas(),
                drawing.viewport.transform(),
            ),
            None => (
                &empty,
                Size::new(
                    self.canvas.width.unwrap_or_default(),
                    self.canvas.height.unwrap_or_default(),
                ),
                Default::default(),
            ),
        };

        let mut scene = GraphScene::new(layout, canvas, transform, &self.statuses);
        scene.selected = self.selected.as_deref();
        scene.hovered = self.hovered.as_deref();
        scene.show_legend = self.show_legend;
        scene.show_scroll_hint = self.show_scroll_hint;

        Ok(self.exporter.export_graph(&scene)?)
    }

    fn redraw(&mut self) {
        let Some(definition) = &self.definition else {
            debug!("No definition, clearing the drawing");
            self.drawing = None;
            self.error = None;
            return;
        };

        match self.draw(definition) {
            Ok(drawing) => {
                info!(
                    nodes = drawing.layout.nodes().len(),
                    orientation = self.orientation.as_str();
                    "Graph rendered"
                );
                self.drawing = Some(drawing);
                self.error = None;
            }
            Err(err) => self.fail(err),
        }
    }

    fn draw(&self, definition: &Definition) -> Result<Drawing, StepvizError> {
        let graph = WorkflowGraph::try_from_definition(definition, true)?;
        let layout = Engine::new(self.config.layout(), self.config.style().text_definition())
            .with_orientation(self.orientation)
            .layout(&graph)?;
        let viewport = Viewport::fit(layout.size(), self.canvas, self.config.viewport());
        Ok(Drawing { layout, viewport })
    }

    fn fail(&mut self, err: StepvizError) {
        error!(err:% = err; "Failed to render graph, keeping the previous drawing");
        self.error = Some(err);
    }

    fn notify(&mut self, name: Option<&str>) {
        if let Some(callback) = &mut self.callback {
            callback(name);
        }
    }
}

/// Name of the innermost state whose outline box contains `point`.
fn hit_test(layout: &GraphLayout, point: Point) -> Option<String> {
    let mut hit: Option<(usize, &str)> = None;
    layout.visit_nodes(&mut |node, center, depth| {
        let Some(name) = node.state_name() else {
            return;
        };
        if node.shape().outline_bounds(center).contains(point)
            && hit.is_none_or(|(best, _)| depth >= best)
        {
            hit = Some((depth, name));
        }
    });
    hit.map(|(_, name)| name.to_string())
}
