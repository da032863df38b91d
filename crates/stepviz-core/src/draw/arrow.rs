//! Arrows along routed waypoints and their SVG markers.
//!
//! An [`ArrowDrawer`] is created per render session. It hands out marker ids
//! from its own counter, one marker per stroke color, so that two documents
//! rendered in the same process never share or clash on ids.

use std::{rc::Rc, str};

use indexmap::IndexMap;
use svg::{self, node::element as svg_element};

use crate::{
    color::Color,
    draw::{StrokeDefinition, basis_path_data, polyline_path_data},
    geometry::Point,
};

/// How the waypoints of an arrow are joined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStyle {
    /// Uniform B-spline through the waypoints
    #[default]
    Basis,
    /// Straight segments between the waypoints
    Straight,
}

impl str::FromStr for ArrowStyle {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basis" => Ok(Self::Basis),
            "straight" => Ok(Self::Straight),
            _ => Err("Invalid arrow style"),
        }
    }
}

/// Whether an arrow ends in an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Arrowhead at the last waypoint
    Forward,
    /// Plain line, used for container feeder lines
    Plain,
}

/// Stroke and path style shared by many arrows.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: Rc<StrokeDefinition>,
    style: ArrowStyle,
}

impl ArrowDefinition {
    pub fn new(stroke: Rc<StrokeDefinition>) -> Self {
        Self {
            stroke,
            style: ArrowStyle::default(),
        }
    }

    pub fn stroke(&self) -> &Rc<StrokeDefinition> {
        &self.stroke
    }

    pub fn style(&self) -> ArrowStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ArrowStyle) {
        self.style = style;
    }
}

/// An arrow definition paired with its direction.
#[derive(Debug, Clone)]
pub struct Arrow {
    definition: Rc<ArrowDefinition>,
    direction: ArrowDirection,
}

impl Arrow {
    pub fn new(definition: Rc<ArrowDefinition>, direction: ArrowDirection) -> Self {
        Self {
            definition,
            direction,
        }
    }

    pub fn definition(&self) -> &ArrowDefinition {
        &self.definition
    }

    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }

    fn path_data(&self, points: &[Point]) -> String {
        match self.definition.style {
            ArrowStyle::Basis => basis_path_data(points),
            ArrowStyle::Straight => polyline_path_data(points),
        }
    }
}

/// Draws arrows and collects the markers they reference.
///
/// ```
/// # use std::rc::Rc;
/// # use stepviz_core::draw::{Arrow, ArrowDefinition, ArrowDirection, ArrowDrawer};
/// # use stepviz_core::geometry::Point;
/// let mut drawer = ArrowDrawer::new("graph0");
/// let arrow = Arrow::new(Rc::new(ArrowDefinition::default()), ArrowDirection::Forward);
///
/// let path = drawer.draw_arrow(&arrow, &[Point::new(0.0, 0.0), Point::new(0.0, 50.0)]);
/// assert!(path.to_string().contains("url(#graph0-arrowhead-0)"));
/// ```
#[derive(Debug)]
pub struct ArrowDrawer {
    prefix: String,
    markers: IndexMap<Color, String>,
}

impl ArrowDrawer {
    /// Creates a drawer whose marker ids start with `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            markers: IndexMap::new(),
        }
    }

    /// Renders `arrow` through `points` and registers its marker.
    pub fn draw_arrow(&mut self, arrow: &Arrow, points: &[Point]) -> Box<dyn svg::Node> {
        let stroke = arrow.definition.stroke();
        let path = svg_element::Path::new()
            .set("d", arrow.path_data(points))
            .set("fill", "none");
        let mut path = crate::apply_stroke!(path, stroke);

        if arrow.direction == ArrowDirection::Forward {
            let marker_id = self.marker_id(stroke.color());
            path = path.set("marker-end", format!("url(#{marker_id})"));
        }

        Box::new(path)
    }

    /// Number of distinct markers registered so far.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// `<defs>` holding every marker referenced by drawn arrows.
    pub fn draw_marker_definitions(&self) -> Box<dyn svg::Node> {
        let mut defs = svg_element::Definitions::new();
        for (color, id) in &self.markers {
            defs = defs.add(create_arrowhead(id, *color));
        }
        Box::new(defs)
    }

    fn marker_id(&mut self, color: Color) -> String {
        let next = self.markers.len();
        self.markers
            .entry(color)
            .or_insert_with(|| format!("{}-arrowhead-{next}", self.prefix))
            .clone()
    }
}

impl Default for ArrowDrawer {
    fn default() -> Self {
        Self::new("stepviz")
    }
}

fn create_arrowhead(id: &str, color: Color) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerUnits", "strokeWidth")
        .set("markerWidth", 8)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        )
}
