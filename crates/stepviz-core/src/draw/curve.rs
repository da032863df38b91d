//! Path data for edge curves.
//!
//! Routed edges are a handful of waypoints. They are drawn as a uniform cubic
//! B-spline ("basis" curve): the curve starts at the first waypoint, ends at
//! the last one and is pulled towards the points in between without passing
//! through them.

use crate::geometry::Point;

/// SVG path data of a B-spline through `points`.
///
/// - no points: empty string
/// - one point: a single move
/// - two points: a straight segment
///
/// ```
/// # use stepviz_core::draw::basis_path_data;
/// # use stepviz_core::geometry::Point;
/// let d = basis_path_data(&[Point::new(0.0, 0.0), Point::new(60.0, 0.0)]);
/// assert_eq!(d, "M 0 0 L 60 0");
/// ```
pub fn basis_path_data(points: &[Point]) -> String {
    let mut data = PathData::default();
    let Some((first, rest)) = points.split_first() else {
        return data.finish();
    };

    data.move_to(*first);
    if rest.is_empty() {
        return data.finish();
    }

    let mut p0 = *first;
    let mut p1 = rest[0];
    for (index, &p) in rest[1..].iter().enumerate() {
        if index == 0 {
            data.line_to(Point::new(
                (5.0 * p0.x() + p1.x()) / 6.0,
                (5.0 * p0.y() + p1.y()) / 6.0,
            ));
        }
        data.basis_segment(p0, p1, p);
        p0 = p1;
        p1 = p;
    }

    if points.len() > 2 {
        data.basis_segment(p0, p1, p1);
    }
    data.line_to(p1);
    data.finish()
}

/// SVG path data of straight segments through `points`.
pub fn polyline_path_data(points: &[Point]) -> String {
    let mut data = PathData::default();
    for (index, &point) in points.iter().enumerate() {
        if index == 0 {
            data.move_to(point);
        } else {
            data.line_to(point);
        }
    }
    data.finish()
}

#[derive(Default)]
struct PathData {
    commands: Vec<String>,
}

impl PathData {
    fn move_to(&mut self, p: Point) {
        self.commands.push(format!("M {} {}", p.x(), p.y()));
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(format!("L {} {}", p.x(), p.y()));
    }

    /// Cubic segment of the spline between control points `p0`, `p1` and `p`
    fn basis_segment(&mut self, p0: Point, p1: Point, p: Point) {
        let mut command = String::from("C");
        let controls = [
            ((2.0 * p0.x() + p1.x()) / 3.0, (2.0 * p0.y() + p1.y()) / 3.0),
            ((p0.x() + 2.0 * p1.x()) / 3.0, (p0.y() + 2.0 * p1.y()) / 3.0),
            (
                (p0.x() + 4.0 * p1.x() + p.x()) / 6.0,
                (p0.y() + 4.0 * p1.y() + p.y()) / 6.0,
            ),
        ];
        for (x, y) in controls {
            command.push_str(&format!(" {x} {y}"));
        }
        self.commands.push(command);
    }

    fn finish(self) -> String {
        self.commands.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_empty_and_single() {
        assert_eq!(basis_path_data(&[]), "");
        assert_eq!(basis_path_data(&[Point::new(3.0, 4.0)]), "M 3 4");
    }

    #[test]
    fn test_basis_three_points() {
        let d = basis_path_data(&[
            Point::new(0.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(6.0, 6.0),
        ]);
        assert_eq!(d, "M 0 0 L 1 0 C 2 0 4 0 5 1 C 6 2 6 4 6 5 L 6 6");
    }

    #[test]
    fn test_basis_four_points_ends_at_last() {
        let d = basis_path_data(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 12.0),
            Point::new(12.0, 12.0),
            Point::new(12.0, 24.0),
        ]);
        assert!(d.starts_with("M 0 0 L 0 2 C "));
        assert!(d.ends_with("L 12 24"));
        assert_eq!(d.matches('C').count(), 3);
    }

    #[test]
    fn test_polyline_path_data() {
        assert_eq!(polyline_path_data(&[]), "");
        assert_eq!(
            polyline_path_data(&[
                Point::new(1.0, 2.0),
                Point::new(1.0, 8.0),
                Point::new(5.0, 8.0),
            ]),
            "M 1 2 L 1 8 L 5 8"
        );
    }
}
