//! Drawing primitives shared by the graph and timeline renderers.
//!
//! Drawables implement [`Drawable`]: they report their size for layout and
//! render themselves into a [`LayeredOutput`] at a given center position.

mod arrow;
mod curve;
mod layer;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDirection, ArrowDrawer, ArrowStyle};
pub use curve::{basis_path_data, polyline_path_data};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Text, TextAnchor, TextDefinition};

use crate::geometry::{Point, Size};

pub trait Drawable: std::fmt::Debug {
    fn render_to_layers(&self, position: Point) -> LayeredOutput;
    fn size(&self) -> Size;
}
