//! Stroke styling for outlines, edges and connectors.
//!
//! A [`StrokeDefinition`] is applied to any SVG element through the
//! [`apply_stroke!`](crate::apply_stroke) macro:
//!
//! ```
//! # use stepviz_core::apply_stroke;
//! # use stepviz_core::draw::{StrokeDefinition, StrokeStyle};
//! # use svg::node::element::Rectangle;
//! let mut stroke = StrokeDefinition::default();
//! stroke.set_style(StrokeStyle::Dashed);
//! let rect = apply_stroke!(Rectangle::new(), &stroke);
//! assert!(rect.to_string().contains("stroke-dasharray"));
//! ```

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(&self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
            Self::Dotted => Some("2,3"),
        }
    }
}

/// Color, width and pattern of a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Sets the `stroke*` attributes of an SVG element from a [`StrokeDefinition`].
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::draw::StrokeDefinition = $stroke;
        let mut elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width());

        if let Some(dasharray) = stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use svg::node::element::Line;

    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("5,5"));
        assert_eq!(StrokeStyle::Dotted.to_svg_value(), Some("2,3"));
    }

    #[test]
    fn test_apply_stroke_sets_attributes() {
        let mut stroke = StrokeDefinition::new(Color::new("#333").unwrap(), 2.0);
        stroke.set_style(StrokeStyle::Dotted);

        let rendered = crate::apply_stroke!(Line::new(), &stroke).to_string();
        assert!(rendered.contains("stroke-width=\"2\""));
        assert!(rendered.contains("stroke-dasharray=\"2,3\""));
    }

    #[test]
    fn test_apply_stroke_solid_has_no_dasharray() {
        let stroke = StrokeDefinition::default();
        let rendered = crate::apply_stroke!(Line::new(), &stroke).to_string();
        assert!(!rendered.contains("stroke-dasharray"));
    }
}
