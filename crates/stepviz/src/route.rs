//! Edge routing: clipping layout waypoints to node outlines.
//!
//! The layout produces raw waypoints running from the source center to the
//! target center. Before drawing, the first waypoint is replaced by the point
//! where the edge leaves the source outline, and the last one by the point
//! where it enters the target outline. Interior waypoints are kept as they
//! are. An endpoint without an [`Intersector`] keeps its raw position.

use stepviz_core::{geometry::Point, intersect::Direction};

/// Something with an outline that edges can be clipped to.
pub trait Intersector {
    /// Points where the line from the outline's center towards `point`
    /// crosses the outline, ordered from the center outwards.
    fn intersect(&self, point: Point, direction: Direction) -> Vec<Point>;
}

/// Clips `raw` waypoints to the outlines of `source` and `target`.
///
/// The source is intersected towards the second waypoint and the target
/// towards the second to last one. Target points are reversed so that the
/// route keeps running from source to target. Fewer than two waypoints are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// # use stepviz::route::{Intersector, route_edge};
/// # use stepviz_core::{geometry::Point, intersect::Direction};
/// struct Ring(Point);
///
/// impl Intersector for Ring {
///     fn intersect(&self, point: Point, _: Direction) -> Vec<Point> {
///         let offset = point.sub_point(self.0);
///         vec![self.0.add_point(offset.scale(10.0 / offset.hypot()))]
///     }
/// }
///
/// let raw = [Point::new(0.0, 0.0), Point::new(0.0, 50.0), Point::new(0.0, 100.0)];
/// let source = Ring(raw[0]);
/// let routed = route_edge(&raw, Some(&source), None);
///
/// assert_eq!(routed, [Point::new(0.0, 10.0), Point::new(0.0, 50.0), Point::new(0.0, 100.0)]);
/// ```
pub fn route_edge(
    raw: &[Point],
    source: Option<&dyn Intersector>,
    target: Option<&dyn Intersector>,
) -> Vec<Point> {
    let count = raw.len();
    if count < 2 {
        return raw.to_vec();
    }

    let mut points = Vec::with_capacity(count);

    match source.map(|source| source.intersect(raw[1], Direction::Out)) {
        Some(clipped) if !clipped.is_empty() => points.extend(clipped),
        _ => points.push(raw[0]),
    }

    points.extend_from_slice(&raw[1..count - 1]);

    match target.map(|target| target.intersect(raw[count - 2], Direction::In)) {
        Some(clipped) if !clipped.is_empty() => points.extend(clipped.into_iter().rev()),
        _ => points.push(raw[count - 1]),
    }

    points
}
