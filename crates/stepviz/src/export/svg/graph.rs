//! SVG rendering of workflow graphs.

use std::rc::Rc;

use log::trace;
use svg::{Document, node::element as svg_element};

use stepviz_core::{
    draw::{
        Arrow, ArrowDefinition, ArrowDirection, ArrowStyle, Drawable, LayeredOutput, RenderLayer,
        StrokeDefinition, Text, TextAnchor,
    },
    geometry::{Insets, Point, Size},
    semantic::{ExecutionStatus, StatusOverlay},
};

use super::Svg;
use crate::{
    export,
    layout::{GraphLayout, PositionedNode},
    viewport::Transform,
};

const LEGEND_HEIGHT: f32 = 30.0;
const LEGEND_SWATCH: f32 = 14.0;
const LEGEND_GAP: f32 = 6.0;
const LEGEND_ITEM_SPACING: f32 = 18.0;

const SCROLL_HINT: &str = "Use ctrl + scroll to zoom the graph";

/// What a graph document shows: the layout seen through a transform, with
/// status colors and interaction state.
#[derive(Debug, Clone, Copy)]
pub struct GraphScene<'a> {
    pub layout: &'a GraphLayout,
    /// Canvas size, without the legend.
    pub canvas: Size,
    pub transform: Transform,
    pub statuses: &'a StatusOverlay,
    /// Name of the selected state.
    pub selected: Option<&'a str>,
    /// Name of the hovered state.
    pub hovered: Option<&'a str>,
    pub show_legend: bool,
    pub show_scroll_hint: bool,
}

impl<'a> GraphScene<'a> {
    pub fn new(
        layout: &'a GraphLayout,
        canvas: Size,
        transform: Transform,
        statuses: &'a StatusOverlay,
    ) -> Self {
        Self {
            layout,
            canvas,
            transform,
            statuses,
            selected: None,
            hovered: None,
            show_legend: false,
            show_scroll_hint: false,
        }
    }

    /// Class list of a node group.
    ///
    /// States carry their type, their status and, when applicable,
    /// `Container`, `selected` and `hovered`.
    pub fn node_classes(&self, node: &PositionedNode) -> String {
        let (Some(name), Some(state_type)) = (node.state_name(), node.state_type()) else {
            return "node anchor".to_string();
        };

        let mut classes = vec![
            "node",
            "state",
            state_type.as_str(),
            self.statuses.status_of(name).css_class(),
        ];
        if node.shape().container().is_some() {
            classes.push("Container");
        }
        if self.selected == Some(name) {
            classes.push("selected");
        }
        if self.hovered == Some(name) {
            classes.push("hovered");
        }
        classes.join(" ")
    }
}

impl Svg {
    /// Renders `scene` into a standalone document.
    pub(super) fn render_graph(&mut self, scene: &GraphScene<'_>) -> Result<Document, export::Error> {
        let legend_height = if scene.show_legend { LEGEND_HEIGHT } else { 0.0 };
        let size = Size::new(scene.canvas.width(), scene.canvas.height() + legend_height);

        let mut doc = self
            .begin_document(size, "graph")
            .set("class", "stepviz-graph")
            .add(svg_element::Style::new(self.graph_style_sheet()));

        let mut layouts = Vec::new();
        scene
            .layout
            .visit_layouts(&mut |layout, origin, _| layouts.push((layout, origin)));

        let mut output = LayeredOutput::new();
        for (layout, origin) in layouts {
            for node in layout.nodes() {
                let layer = if node.shape().container().is_some() {
                    RenderLayer::Container
                } else {
                    RenderLayer::Node
                };
                let group = self.render_node(node, origin.add_point(node.center()), scene);
                output.add_to_layer(layer, Box::new(group));
            }
            output.merge(self.render_edges(layout, origin));
        }

        let graph_root = output
            .render()
            .into_iter()
            .fold(
                svg_element::Group::new()
                    .set("class", "graph")
                    .set("transform", scene.transform.to_string()),
                |group, node| group.add(node),
            );

        doc = doc.add(self.arrow_drawer.draw_marker_definitions()).add(graph_root);

        if scene.show_scroll_hint {
            doc = doc.add(self.render_scroll_hint(scene.canvas));
        }
        if scene.show_legend {
            doc = doc.add(self.render_legend(scene.canvas));
        }

        Ok(doc)
    }

    fn render_node(&self, node: &PositionedNode, center: Point, scene: &GraphScene<'_>) -> svg_element::Group {
        trace!(id = node.id(), x = center.x(), y = center.y(); "Rendering node");

        let mut group = svg_element::Group::new()
            .set("class", scene.node_classes(node))
            .set("transform", format!("translate({},{})", center.x(), center.y()));
        if let Some(name) = node.state_name() {
            group = group.set("data-state", name);
        }
        group.add(node.shape().draw(&self.text))
    }

    fn render_edges(&mut self, layout: &GraphLayout, origin: Point) -> LayeredOutput {
        let mut definition = ArrowDefinition::new(Rc::new(StrokeDefinition::default()));
        definition.set_style(ArrowStyle::Basis);
        let arrow = Arrow::new(Rc::new(definition), ArrowDirection::Forward);

        let mut output = LayeredOutput::new();
        for edge in layout.edges() {
            let points: Vec<Point> = edge.points().iter().map(|p| p.add_point(origin)).collect();
            let path = self.arrow_drawer.draw_arrow(&arrow, &points);
            output.add_to_layer(
                RenderLayer::Edge,
                Box::new(svg_element::Group::new().set("class", "edgePath").add(path)),
            );
        }
        output
    }

    fn graph_style_sheet(&self) -> String {
        let mut css = String::from(
            ".node .shape { stroke: #333; stroke-width: 1px; }\n\
             .node.anchor .shape { fill: #fff; }\n\
             .node.state { cursor: pointer; }\n\
             .node.NotYetStarted { cursor: default; }\n\
             .node.hovered .shape { stroke-width: 2px; }\n\
             .node.selected .shape { stroke-width: 3px; }\n\
             .edgePath path { fill: none; }\n",
        );
        for status in ExecutionStatus::ALL {
            css.push_str(&format!(
                ".node.state.{} .shape {{ fill: {}; }}\n",
                status.css_class(),
                self.status_color(status)
            ));
        }
        css.push_str(&format!(
            ".scroll-hint, .legend {{ font-family: {}; font-size: {}px; }}\n",
            self.text.font_family(),
            self.text.font_size()
        ));
        css
    }

    fn render_scroll_hint(&self, canvas: Size) -> svg_element::Group {
        let text = Text::new(&self.text, SCROLL_HINT);
        let size = text.calculate_size().add_padding(Insets::uniform(8.0));
        let center = Point::new(canvas.width() / 2.0, size.height() / 2.0 + 8.0);

        let background = svg_element::Rectangle::new()
            .set("x", center.x() - size.width() / 2.0)
            .set("y", center.y() - size.height() / 2.0)
            .set("width", size.width())
            .set("height", size.height())
            .set("rx", 4)
            .set("fill", "#333")
            .set("fill-opacity", 0.8);

        let mut output = text.render_to_layers(center);
        output.add_to_layer(RenderLayer::Background, Box::new(background));

        output
            .render()
            .into_iter()
            .fold(
                svg_element::Group::new()
                    .set("class", "scroll-hint")
                    .set("fill", "#fff"),
                |group, node| group.add(node),
            )
            .set("pointer-events", "none")
    }

    /// One swatch per status, in a row below the canvas.
    fn render_legend(&self, canvas: Size) -> svg_element::Group {
        let mut label_style = self.text.clone();
        label_style.set_anchor(TextAnchor::Start);

        let y = canvas.height() + LEGEND_HEIGHT / 2.0;
        let mut x = LEGEND_ITEM_SPACING;
        let mut output = LayeredOutput::new();

        for status in ExecutionStatus::ALL {
            let color = self.status_color(status);
            let swatch = svg_element::Rectangle::new()
                .set("class", format!("legend-swatch {}", status.css_class()))
                .set("x", x)
                .set("y", y - LEGEND_SWATCH / 2.0)
                .set("width", LEGEND_SWATCH)
                .set("height", LEGEND_SWATCH)
                .set("fill", color.to_string())
                .set("stroke", "#333");
            output.add_to_layer(RenderLayer::Node, Box::new(swatch));

            x += LEGEND_SWATCH + LEGEND_GAP;
            let label = status.to_string();
            let text = Text::new(&label_style, &label);
            output.merge(text.render_to_layers(Point::new(x, y)));
            x += text.calculate_size().width() + LEGEND_ITEM_SPACING;
        }

        output
            .render()
            .into_iter()
            .fold(svg_element::Group::new().set("class", "legend"), |group, node| {
                group.add(node)
            })
    }
}
