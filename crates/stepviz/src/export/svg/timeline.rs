//! SVG rendering of timeline charts.

use std::rc::Rc;

use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use stepviz_core::{
    color::Color,
    draw::{
        Arrow, ArrowDefinition, ArrowDirection, ArrowStyle, LayeredOutput, RenderLayer,
        StrokeDefinition,
    },
    geometry::{Point, Size},
};

use super::Svg;
use crate::{
    export,
    timeline::{Bar, Connector, TimelineChart},
};

const SPLIT_LINE_COLOR: &str = "#e0e6f1";
const SPLIT_AREA_COLORS: [&str; 2] = ["rgba(250,250,250,0.3)", "rgba(210,219,238,0.3)"];
const AXIS_LABEL_COLOR: &str = "#6e7079";
const CONNECTOR_COLOR: &str = "#999";
const AXIS_LABEL_GAP: f32 = 8.0;

impl Svg {
    /// Renders `chart` into a standalone document.
    pub(super) fn render_timeline(&mut self, chart: &TimelineChart) -> Result<Document, export::Error> {
        let connector_color = Color::new(CONNECTOR_COLOR)
            .map_err(|err| export::Error::Render(format!("Invalid connector color: {err}")))?;

        let size = Size::new(chart.width, chart.height);
        let clip_id = self.id("timeline-plot");
        let plot = chart.plot;

        let mut doc = self
            .begin_document(size, "timeline")
            .set("class", "stepviz-timeline")
            .set("font-family", self.text.font_family())
            .set("font-size", self.text.font_size());

        doc = doc.add(
            svg_element::Definitions::new().add(
                svg_element::ClipPath::new().set("id", clip_id.as_str()).add(
                    svg_element::Rectangle::new()
                        .set("x", plot.x)
                        .set("y", plot.y)
                        .set("width", plot.width)
                        .set("height", plot.height),
                ),
            ),
        );

        let mut axes = LayeredOutput::new();
        self.render_rows(chart, &mut axes);
        render_time_axis(chart, &mut axes);

        let mut plotted = LayeredOutput::new();
        for bar in &chart.bars {
            render_bar(bar, &mut plotted);
        }
        self.render_connectors(&chart.parent_connectors, connector_color, false, &mut plotted);
        self.render_connectors(&chart.precedence_edges, connector_color, true, &mut plotted);

        let plot_group = plotted.render().into_iter().fold(
            svg_element::Group::new()
                .set("class", "plot")
                .set("clip-path", format!("url(#{clip_id})")),
            |group, node| group.add(node),
        );

        doc = axes
            .render()
            .into_iter()
            .fold(doc, |doc, node| doc.add(node))
            .add(plot_group)
            .add(self.arrow_drawer.draw_marker_definitions());

        Ok(doc)
    }

    /// Alternating row backgrounds and category labels.
    fn render_rows(&self, chart: &TimelineChart, output: &mut LayeredOutput) {
        let window = chart.row_window;
        for row in window.first..window.first + window.count {
            let Some(center) = chart.row_center(row) else {
                continue;
            };
            let top = center - chart.row_height / 2.0;

            output.add_to_layer(
                RenderLayer::Background,
                Box::new(
                    svg_element::Rectangle::new()
                        .set("class", "split-area")
                        .set("x", chart.plot.x)
                        .set("y", top)
                        .set("width", chart.plot.width)
                        .set("height", chart.row_height)
                        .set("fill", SPLIT_AREA_COLORS[row % 2]),
                ),
            );

            let label = svg_element::Text::new("")
                .set("class", "category")
                .set("x", chart.plot.x - AXIS_LABEL_GAP)
                .set("y", center)
                .set("text-anchor", "end")
                .set("dominant-baseline", "central")
                .set("fill", AXIS_LABEL_COLOR)
                .add(SvgText::new(chart.categories[row].as_str()));
            output.add_to_layer(RenderLayer::Text, Box::new(label));
        }
    }

    fn render_connectors(
        &mut self,
        connectors: &[Connector],
        color: Color,
        arrowhead: bool,
        output: &mut LayeredOutput,
    ) {
        let mut definition = ArrowDefinition::new(Rc::new(StrokeDefinition::new(color, 1.0)));
        definition.set_style(ArrowStyle::Straight);
        let direction = if arrowhead {
            ArrowDirection::Forward
        } else {
            ArrowDirection::Plain
        };
        let arrow = Arrow::new(Rc::new(definition), direction);

        for connector in connectors {
            let points: Vec<Point> = connector
                .points
                .iter()
                .map(|[x, y]| Point::new(*x, *y))
                .collect();
            output.add_to_layer(RenderLayer::Edge, self.arrow_drawer.draw_arrow(&arrow, &points));
        }
    }
}

/// Vertical split lines and time labels.
fn render_time_axis(chart: &TimelineChart, output: &mut LayeredOutput) {
    let plot = chart.plot;
    for tick in &chart.ticks {
        output.add_to_layer(
            RenderLayer::Background,
            Box::new(
                svg_element::Line::new()
                    .set("class", "split-line")
                    .set("x1", tick.x)
                    .set("y1", plot.y)
                    .set("x2", tick.x)
                    .set("y2", plot.y + plot.height)
                    .set("stroke", SPLIT_LINE_COLOR),
            ),
        );
        output.add_to_layer(
            RenderLayer::Text,
            Box::new(
                svg_element::Text::new("")
                    .set("class", "tick")
                    .set("x", tick.x)
                    .set("y", plot.y + plot.height + AXIS_LABEL_GAP)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "hanging")
                    .set("fill", AXIS_LABEL_COLOR)
                    .add(SvgText::new(tick.label.as_str())),
            ),
        );
    }
}

fn render_bar(bar: &Bar, output: &mut LayeredOutput) {
    if let Some(rect) = bar.rect {
        let title = svg_element::Title::new(format!(
            "{}\nstart: {}\nend: {}",
            bar.name, bar.start_time, bar.end_time
        ));
        output.add_to_layer(
            RenderLayer::Node,
            Box::new(
                svg_element::Rectangle::new()
                    .set("class", "bar")
                    .set("data-id", bar.id.as_str())
                    .set("x", rect.x)
                    .set("y", rect.y)
                    .set("width", rect.width)
                    .set("height", rect.height)
                    .set("fill", bar.color)
                    .add(title),
            ),
        );
    }

    if let Some(rect) = bar.label.rect {
        output.add_to_layer(
            RenderLayer::Text,
            Box::new(
                svg_element::Text::new("")
                    .set("class", "duration")
                    .set("x", rect.x + rect.width / 2.0)
                    .set("y", rect.y + rect.height / 2.0)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "central")
                    .set("fill", bar.label.color)
                    .add(SvgText::new(bar.label.text.as_str())),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use stepviz_core::{
        draw::TextDefinition,
        semantic::{TimelineData, TimelineRecord},
    };

    use crate::{
        config::{StyleConfig, TimelineConfig},
        export::{Exporter, svg::SvgBuilder},
        timeline::{DataZoom, TimelineMapper},
    };

    fn export(data: &TimelineData) -> String {
        let chart = TimelineMapper::new(TimelineConfig::default(), TextDefinition::default())
            .map(data, &DataZoom::default());
        let style = StyleConfig::default();
        let mut svg = SvgBuilder::new(&style).build().unwrap();
        svg.export_timeline(&chart).unwrap()
    }

    #[test]
    fn test_bars_labels_and_rows() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("a", "First", 0, 4000),
                TimelineRecord::new("b", "Second", 4000, 9000),
            ],
            Vec::new(),
        );

        let doc = export(&data);
        assert_eq!(doc.matches(r#"class="bar""#).count(), 2);
        assert_eq!(doc.matches(r#"class="split-area""#).count(), 2);
        assert!(doc.contains("4000 ms"));
        assert!(doc.contains("5000 ms"));
        assert!(doc.contains(r#"clip-path="url(#stepviz-timeline-plot)""#));
    }

    #[test]
    fn test_precedence_edges_get_markers() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("a", "First", 0, 4000),
                TimelineRecord::new("b", "Second", 4000, 9000),
            ],
            vec![("a".to_string(), "b".to_string())],
        );

        let doc = export(&data);
        assert!(doc.contains(r#"id="stepviz-timeline-arrowhead-0""#));
    }

    #[test]
    fn test_parent_connectors_have_no_arrowhead() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("p", "Parent", 0, 4000),
                TimelineRecord::new("c", "Child", 1000, 3000).with_parent("p"),
            ],
            Vec::new(),
        );

        let doc = export(&data);
        assert!(!doc.contains("marker-end"));
        assert!(doc.contains("<path"));
    }
}
