//! Boundary intersection math for node outlines.
//!
//! Edges are routed between node centers by the layout engine. Before they are
//! drawn, their first and last waypoints are clipped to the outline of the
//! node they touch. The functions here compute the point where the line from
//! a shape's center towards an external point crosses the shape's outline.
//!
//! None of the functions divide by zero. A point that coincides with the
//! center produces a deterministic point on the outline.

use crate::geometry::{Point, Size};

/// Which end of an edge is being clipped.
///
/// Containers treat incoming edges differently from outgoing ones: every
/// incoming edge lands on a fixed entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The edge ends at the node
    In,
    /// The edge starts at the node
    Out,
}

/// Intersection of the line from `center` to `point` with the outline of an
/// axis-aligned rectangle of `size` centered on `center`.
///
/// The half-extents decide which pair of sides is crossed. A zero `dx` or
/// `dy` forces the cross term to zero.
///
/// # Examples
///
/// ```
/// # use stepviz_core::geometry::{Point, Size};
/// # use stepviz_core::intersect::rectangle_intersection;
/// let hit = rectangle_intersection(
///     Point::new(0.0, 0.0),
///     Size::new(40.0, 20.0),
///     Point::new(100.0, 0.0),
/// );
/// assert_eq!(hit, Point::new(20.0, 0.0));
/// ```
pub fn rectangle_intersection(center: Point, size: Size, point: Point) -> Point {
    let dx = point.x() - center.x();
    let dy = point.y() - center.y();
    let mut half_width = size.width() / 2.0;
    let mut half_height = size.height() / 2.0;

    let (sx, sy) = if dy.abs() * half_width > dx.abs() * half_height {
        // Crosses the top or bottom side
        if dy < 0.0 {
            half_height = -half_height;
        }
        let sx = if dy == 0.0 { 0.0 } else { half_height * dx / dy };
        (sx, half_height)
    } else {
        // Crosses the left or right side
        if dx < 0.0 {
            half_width = -half_width;
        }
        let sy = if dx == 0.0 { 0.0 } else { half_width * dy / dx };
        (half_width, sy)
    };

    Point::new(center.x() + sx, center.y() + sy)
}

/// Intersection of the line from `center` to `point` with an ellipse of
/// radii `rx` and `ry` centered on `center`.
pub fn ellipse_intersection(center: Point, rx: f32, ry: f32, point: Point) -> Point {
    let px = center.x() - point.x();
    let py = center.y() - point.y();

    let det = (rx * rx * py * py + ry * ry * px * px).sqrt();
    if det == 0.0 {
        return Point::new(center.x() + rx, center.y());
    }

    let mut dx = (rx * ry * px / det).abs();
    if point.x() < center.x() {
        dx = -dx;
    }
    let mut dy = (rx * ry * py / det).abs();
    if point.y() < center.y() {
        dy = -dy;
    }

    Point::new(center.x() + dx, center.y() + dy)
}

/// Intersection with a circle of radius `radius`.
///
/// ```
/// # use float_cmp::assert_approx_eq;
/// # use stepviz_core::geometry::Point;
/// # use stepviz_core::intersect::circle_intersection;
/// let center = Point::new(10.0, 10.0);
/// let hit = circle_intersection(center, 5.0, Point::new(30.0, 30.0));
/// assert_approx_eq!(f32, hit.distance(center), 5.0, epsilon = 0.001);
/// ```
pub fn circle_intersection(center: Point, radius: f32, point: Point) -> Point {
    ellipse_intersection(center, radius, radius, point)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_rectangle_intersection_sides() {
        let center = Point::new(50.0, 50.0);
        let size = Size::new(20.0, 10.0);

        assert_eq!(
            rectangle_intersection(center, size, Point::new(50.0, 0.0)),
            Point::new(50.0, 45.0)
        );
        assert_eq!(
            rectangle_intersection(center, size, Point::new(50.0, 100.0)),
            Point::new(50.0, 55.0)
        );
        assert_eq!(
            rectangle_intersection(center, size, Point::new(0.0, 50.0)),
            Point::new(40.0, 50.0)
        );
        assert_eq!(
            rectangle_intersection(center, size, Point::new(100.0, 50.0)),
            Point::new(60.0, 50.0)
        );
    }

    #[test]
    fn test_rectangle_intersection_diagonal() {
        // Slope 1 from a 20x10 rect hits the bottom side
        let hit = rectangle_intersection(
            Point::new(0.0, 0.0),
            Size::new(20.0, 10.0),
            Point::new(30.0, 30.0),
        );
        assert_approx_eq!(f32, hit.x(), 5.0);
        assert_approx_eq!(f32, hit.y(), 5.0);
    }

    #[test]
    fn test_rectangle_intersection_degenerate_point() {
        let center = Point::new(3.0, 4.0);
        let hit = rectangle_intersection(center, Size::new(10.0, 6.0), center);
        assert_eq!(hit, Point::new(8.0, 4.0));
    }

    #[test]
    fn test_rectangle_intersection_zero_size() {
        let center = Point::new(1.0, 1.0);
        let hit = rectangle_intersection(center, Size::default(), Point::new(9.0, 3.0));
        assert_eq!(hit, center);
    }

    #[test]
    fn test_ellipse_intersection_axes() {
        let center = Point::new(0.0, 0.0);

        let right = ellipse_intersection(center, 10.0, 5.0, Point::new(100.0, 0.0));
        assert_approx_eq!(f32, right.x(), 10.0);
        assert_approx_eq!(f32, right.y(), 0.0);

        let up = ellipse_intersection(center, 10.0, 5.0, Point::new(0.0, -100.0));
        assert_approx_eq!(f32, up.x(), 0.0);
        assert_approx_eq!(f32, up.y(), -5.0);
    }

    #[test]
    fn test_ellipse_intersection_degenerate_point() {
        let center = Point::new(2.0, 2.0);
        let hit = ellipse_intersection(center, 4.0, 3.0, center);
        assert_eq!(hit, Point::new(6.0, 2.0));
    }

    #[test]
    fn test_circle_intersection_side() {
        let center = Point::new(0.0, 0.0);
        let hit = circle_intersection(center, 10.0, Point::new(-30.0, 40.0));

        assert_approx_eq!(f32, hit.x(), -6.0, epsilon = 0.0001);
        assert_approx_eq!(f32, hit.y(), 8.0, epsilon = 0.0001);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn center_strategy() -> impl Strategy<Value = Point> {
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1.0f32..200.0, 1.0f32..200.0).prop_map(|(w, h)| Size::new(w, h))
    }

    /// External points are placed clearly outside any generated shape.
    fn external_offset_strategy() -> impl Strategy<Value = Point> {
        (300.0f32..1000.0, 0.0f32..std::f32::consts::TAU)
            .prop_map(|(distance, angle)| Point::new(distance * angle.cos(), distance * angle.sin()))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// The rectangle hit lies on the outline.
    fn check_rectangle_hit_on_boundary(
        center: Point,
        size: Size,
        offset: Point,
    ) -> Result<(), TestCaseError> {
        let hit = rectangle_intersection(center, size, center.add_point(offset));
        let rel = hit.sub_point(center);
        let eps = 0.01;

        let on_vertical_side = approx_eq!(f32, rel.x().abs(), size.width() / 2.0, epsilon = eps)
            && rel.y().abs() <= size.height() / 2.0 + eps;
        let on_horizontal_side =
            approx_eq!(f32, rel.y().abs(), size.height() / 2.0, epsilon = eps)
                && rel.x().abs() <= size.width() / 2.0 + eps;
        prop_assert!(on_vertical_side || on_horizontal_side);
        Ok(())
    }

    /// The rectangle hit lies on the segment from the center to the point.
    fn check_rectangle_hit_on_segment(
        center: Point,
        size: Size,
        offset: Point,
    ) -> Result<(), TestCaseError> {
        let point = center.add_point(offset);
        let hit = rectangle_intersection(center, size, point);

        let total = center.distance(point);
        let through_hit = center.distance(hit) + hit.distance(point);
        prop_assert!(approx_eq!(f32, total, through_hit, epsilon = 0.5));
        Ok(())
    }

    /// The circle hit is exactly one radius away, on the side of the point.
    fn check_circle_hit_at_radius(
        center: Point,
        radius: f32,
        offset: Point,
    ) -> Result<(), TestCaseError> {
        let point = center.add_point(offset);
        let hit = circle_intersection(center, radius, point);

        prop_assert!(approx_eq!(f32, hit.distance(center), radius, epsilon = 0.01));
        prop_assert!(hit.distance(point) < center.distance(point));
        Ok(())
    }

    proptest! {
        #[test]
        fn rectangle_hit_on_boundary(
            center in center_strategy(),
            size in size_strategy(),
            offset in external_offset_strategy(),
        ) {
            check_rectangle_hit_on_boundary(center, size, offset)?;
        }

        #[test]
        fn rectangle_hit_on_segment(
            center in center_strategy(),
            size in size_strategy(),
            offset in external_offset_strategy(),
        ) {
            check_rectangle_hit_on_segment(center, size, offset)?;
        }

        #[test]
        fn circle_hit_at_radius(
            center in center_strategy(),
            radius in 1.0f32..100.0,
            offset in external_offset_strategy(),
        ) {
            check_circle_hit_at_radius(center, radius, offset)?;
        }
    }
}
