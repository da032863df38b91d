//! Node shapes: sizing, boundary intersection and SVG outlines.
//!
//! Every node of a laid out graph carries a [`NodeShape`]. The shape knows
//! the node's size (which drives the layout), how edges are clipped to its
//! outline ([`NodeShape::intersect`]) and how its outline is drawn
//! ([`NodeShape::draw`]).
//!
//! Shapes are drawn in node-local coordinates, with the node center at the
//! origin. Container shapes own the layouts of their nested graphs; those
//! are positioned relative to the container's top-left corner.
//!
//! | Kind | Outline | Size |
//! |------|---------|------|
//! | Anchor | circle, `r = max(w, h) / 2` | label + 20 |
//! | Regular state | rounded rect, `rx = 5` | label + 20 |
//! | Parallel | rounded rect, `rx = min(w, h) / 5` | branches + padding, plus `p` on the entry side |
//! | Map | three stacked rounded rects | iterator + padding, plus 15 in width |

use log::trace;
use svg::node::element as svg_element;

use stepviz_core::{
    draw::{Drawable, StrokeDefinition, Text, TextDefinition, basis_path_data},
    geometry::{Bounds, Point, Size},
    intersect::{Direction, circle_intersection, rectangle_intersection},
};

use crate::{config::Orientation, layout::GraphLayout};

/// Padding around anchor and state labels, split over both sides.
const LABEL_PADDING: f32 = 20.0;
/// Corner radius of regular states and map frames.
const STATE_CORNER_RADIUS: f32 = 5.0;

const PARALLEL_PADDING: f32 = 20.0;
const PARALLEL_BRANCH_SPACING: f32 = 20.0;

const MAP_PADDING: f32 = 20.0;
const MAP_PADDING_TOP: f32 = 20.0;
const MAP_FRAME_OFFSET: f32 = 5.0;
const MAP_FRAME_COUNT: usize = 3;

/// A nested graph placed inside a container.
#[derive(Debug, Clone)]
pub struct NestedLayout {
    offset: Point,
    layout: GraphLayout,
}

impl NestedLayout {
    /// Top-left corner of the nested graph, relative to the container's frame.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }
}

/// Geometry shared by parallel and map containers.
///
/// Coordinates are relative to the top-left corner of the frame. The frame
/// itself is drawn centered on the node, so for map states whose node is
/// wider than the frame the outline sits slightly left of the node bounds.
#[derive(Debug, Clone)]
pub struct ContainerShape {
    orientation: Orientation,
    frame: Size,
    size: Size,
    nested: Vec<NestedLayout>,
    feeders: Vec<Vec<Point>>,
}

impl ContainerShape {
    pub fn frame(&self) -> Size {
        self.frame
    }

    pub fn nested(&self) -> &[NestedLayout] {
        &self.nested
    }

    /// Lines from the entry point to the start state of every nested graph.
    pub fn feeders(&self) -> &[Vec<Point>] {
        &self.feeders
    }

    /// Top-left corner of the frame relative to the node center.
    pub fn frame_origin(&self) -> Point {
        Point::new(-self.frame.width() / 2.0, -self.frame.height() / 2.0)
    }

    /// Every incoming edge lands on the middle of the entry side.
    fn entry_point(&self, center: Point) -> Point {
        match self.orientation {
            Orientation::LeftRight => Point::new(center.x() - self.size.width() / 2.0, center.y()),
            Orientation::TopBottom => Point::new(center.x(), center.y() - self.size.height() / 2.0),
        }
    }
}

/// Outline of a node.
#[derive(Debug, Clone)]
pub enum NodeShape {
    /// Start and end anchors
    Anchor { label: String, size: Size, radius: f32 },
    /// Any state that is not a container
    State { label: String, size: Size },
    /// Parallel state with its branches
    Parallel(ContainerShape),
    /// Map state with its iterator
    Map(ContainerShape),
}

impl NodeShape {
    /// Circle around `label`.
    pub fn anchor(label: &str, text: &TextDefinition) -> Self {
        let size = padded_label_size(label, text);
        Self::Anchor {
            label: label.to_string(),
            size,
            radius: size.width().max(size.height()) / 2.0,
        }
    }

    /// Rounded rectangle around `label`.
    pub fn state(label: &str, text: &TextDefinition) -> Self {
        Self::State {
            label: label.to_string(),
            size: padded_label_size(label, text),
        }
    }

    /// Container holding `branches` next to each other.
    ///
    /// Branches are stacked vertically for left-to-right flow and placed
    /// side by side for top-to-bottom flow, 20 apart. The entry side gets
    /// extra room for the feeder lines.
    pub fn parallel(branches: Vec<GraphLayout>, orientation: Orientation) -> Self {
        let p = PARALLEL_PADDING;
        let mut offset = Point::default();
        let mut branches_size = Size::default();
        let mut placed = Vec::with_capacity(branches.len());

        for layout in branches {
            let size = layout.size();
            branches_size = branches_size.max(Size::new(
                offset.x() + size.width(),
                offset.y() + size.height(),
            ));
            placed.push((offset, layout));
            offset = match orientation {
                Orientation::LeftRight => offset.with_y(offset.y() + size.height() + PARALLEL_BRANCH_SPACING),
                Orientation::TopBottom => offset.with_x(offset.x() + size.width() + PARALLEL_BRANCH_SPACING),
            };
        }

        let root = match orientation {
            Orientation::LeftRight => Point::new(2.0 * p, p),
            Orientation::TopBottom => Point::new(p, 2.0 * p),
        };
        let mut frame = Size::new(2.0 * p + branches_size.width(), 2.0 * p + branches_size.height());
        frame = match orientation {
            Orientation::LeftRight => Size::new(frame.width() + p, frame.height()),
            Orientation::TopBottom => Size::new(frame.width(), frame.height() + p),
        };

        let feeders = placed
            .iter()
            .filter_map(|(offset, layout)| {
                let start = layout.start_center()?;
                Some(match orientation {
                    Orientation::LeftRight => {
                        let y = p + offset.y() + start.y();
                        vec![
                            Point::new(0.0, frame.height() / 2.0),
                            Point::new(p, frame.height() / 2.0),
                            Point::new(p, y),
                            Point::new(2.0 * p, y),
                        ]
                    }
                    Orientation::TopBottom => {
                        let x = p + offset.x() + start.x();
                        vec![
                            Point::new(frame.width() / 2.0, 0.0),
                            Point::new(frame.width() / 2.0, p),
                            Point::new(x, p),
                            Point::new(x, 2.0 * p),
                        ]
                    }
                })
            })
            .collect();

        let nested = placed
            .into_iter()
            .map(|(offset, layout)| NestedLayout {
                offset: root.add_point(offset),
                layout,
            })
            .collect();

        trace!(width = frame.width(), height = frame.height(); "Parallel container sized");
        Self::Parallel(ContainerShape {
            orientation,
            frame,
            size: frame,
            nested,
            feeders,
        })
    }

    /// Container holding one `iterator` graph, drawn as a stack of frames.
    pub fn map(iterator: GraphLayout, orientation: Orientation) -> Self {
        let p = MAP_PADDING;
        let inner = iterator.size();
        let frame = Size::new(2.0 * p + inner.width(), MAP_PADDING_TOP + inner.height() + p);
        let size = Size::new(
            frame.width() + MAP_FRAME_OFFSET * MAP_FRAME_COUNT as f32,
            frame.height(),
        );

        let feeders = iterator
            .start_center()
            .map(|start| match orientation {
                Orientation::LeftRight => {
                    let y = p + start.y();
                    vec![
                        Point::new(0.0, frame.height() / 2.0),
                        Point::new(p / 2.0, frame.height() / 2.0),
                        Point::new(p / 2.0, y),
                        Point::new(p, y),
                    ]
                }
                Orientation::TopBottom => {
                    let x = p + start.x();
                    vec![
                        Point::new(frame.width() / 2.0, 0.0),
                        Point::new(frame.width() / 2.0, p / 2.0),
                        Point::new(x, p / 2.0),
                        Point::new(x, p),
                    ]
                }
            })
            .into_iter()
            .collect();

        trace!(width = size.width(), height = size.height(); "Map container sized");
        Self::Map(ContainerShape {
            orientation,
            frame,
            size,
            nested: vec![NestedLayout {
                offset: Point::new(p, MAP_PADDING_TOP),
                layout: iterator,
            }],
            feeders,
        })
    }

    /// Size used by the layout.
    pub fn size(&self) -> Size {
        match self {
            Self::Anchor { size, .. } | Self::State { size, .. } => *size,
            Self::Parallel(container) | Self::Map(container) => container.size,
        }
    }

    /// Area covered by the drawn outline of a node centered on `center`.
    ///
    /// Map frames are stacked up and to the left of the frame, so their
    /// outline does not line up with [`NodeShape::size`].
    pub fn outline_bounds(&self, center: Point) -> Bounds {
        match self {
            Self::Map(container) => {
                let back = (MAP_FRAME_COUNT - 1) as f32 * MAP_FRAME_OFFSET;
                let origin = center.add_point(container.frame_origin());
                Bounds::new_from_top_left(
                    Point::new(origin.x() - back, origin.y() - back),
                    Size::new(container.frame.width() + back, container.frame.height() + back),
                )
            }
            _ => Bounds::new_from_center(center, self.size()),
        }
    }

    pub fn container(&self) -> Option<&ContainerShape> {
        match self {
            Self::Parallel(container) | Self::Map(container) => Some(container),
            _ => None,
        }
    }

    /// Points where the line from `center` towards `point` meets the outline.
    ///
    /// Containers return their fixed entry point for incoming edges.
    pub fn intersect(&self, center: Point, point: Point, direction: Direction) -> Vec<Point> {
        match self {
            Self::Anchor { radius, .. } => vec![circle_intersection(center, *radius, point)],
            Self::State { size, .. } => vec![rectangle_intersection(center, *size, point)],
            Self::Parallel(container) | Self::Map(container) => match direction {
                Direction::In => vec![container.entry_point(center)],
                Direction::Out => vec![rectangle_intersection(center, container.size, point)],
            },
        }
    }

    /// Draws the outline in node-local coordinates.
    ///
    /// Labels are drawn for anchors and states. Containers draw their frame
    /// and feeder lines; nested nodes are drawn by the caller.
    pub fn draw(&self, text: &TextDefinition) -> svg_element::Group {
        let group = svg_element::Group::new();
        match self {
            Self::Anchor { label, radius, .. } => {
                let circle = svg_element::Circle::new()
                    .set("class", "shape")
                    .set("cx", 0)
                    .set("cy", 0)
                    .set("r", *radius);
                add_label(group.add(circle), label, text)
            }
            Self::State { label, size } => {
                let rect = svg_element::Rectangle::new()
                    .set("class", "shape")
                    .set("rx", STATE_CORNER_RADIUS)
                    .set("ry", STATE_CORNER_RADIUS)
                    .set("x", -size.width() / 2.0)
                    .set("y", -size.height() / 2.0)
                    .set("width", size.width())
                    .set("height", size.height());
                add_label(group.add(rect), label, text)
            }
            Self::Parallel(container) => {
                let frame = container.frame;
                let radius = frame.width().min(frame.height()) / 5.0;
                let rect = svg_element::Rectangle::new()
                    .set("class", "shape")
                    .set("rx", radius)
                    .set("ry", radius)
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", frame.width())
                    .set("height", frame.height());
                add_feeders(container, framed_group(container).add(rect))
            }
            Self::Map(container) => {
                let frame = container.frame;
                let mut inner = framed_group(container);
                // Back to front
                for i in (0..MAP_FRAME_COUNT).rev() {
                    let shift = i as f32 * -MAP_FRAME_OFFSET;
                    let rect = svg_element::Rectangle::new()
                        .set("class", "shape")
                        .set("rx", STATE_CORNER_RADIUS)
                        .set("ry", STATE_CORNER_RADIUS)
                        .set("x", shift)
                        .set("y", shift)
                        .set("width", frame.width() - i as f32)
                        .set("height", frame.height() - i as f32);
                    inner = inner.add(rect);
                }
                add_feeders(container, inner)
            }
        }
    }
}

fn padded_label_size(label: &str, text: &TextDefinition) -> Size {
    let label_size = Text::new(text, label).calculate_size();
    Size::new(label_size.width() + LABEL_PADDING, label_size.height() + LABEL_PADDING)
}

fn add_label(mut group: svg_element::Group, label: &str, text: &TextDefinition) -> svg_element::Group {
    let rendered = Text::new(text, label).render_to_layers(Point::default());
    for node in rendered.render() {
        group = group.add(node);
    }
    group
}

/// Group translated so that the frame is centered on the node.
fn framed_group(container: &ContainerShape) -> svg_element::Group {
    let origin = container.frame_origin();
    svg_element::Group::new().set(
        "transform",
        format!("translate({},{})", origin.x(), origin.y()),
    )
}

fn add_feeders(container: &ContainerShape, mut group: svg_element::Group) -> svg_element::Group {
    let stroke = StrokeDefinition::default();
    for feeder in &container.feeders {
        let path = svg_element::Path::new()
            .set("class", "path feeder")
            .set("fill", "none")
            .set("d", basis_path_data(feeder));
        group = group.add(stepviz_core::apply_stroke!(path, &stroke));
    }
    group
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::layout::GraphLayout;

    fn text() -> TextDefinition {
        TextDefinition::default()
    }

    #[test]
    fn test_state_size_pads_label() {
        let label = Text::new(&text(), "Hello").calculate_size();
        let shape = NodeShape::state("Hello", &text());

        assert_approx_eq!(f32, shape.size().width(), label.width() + 20.0);
        assert_approx_eq!(f32, shape.size().height(), label.height() + 20.0);
    }

    #[test]
    fn test_anchor_radius_covers_the_larger_side() {
        let shape = NodeShape::anchor("Start", &text());
        let size = shape.size();
        match shape {
            NodeShape::Anchor { radius, .. } => {
                assert_approx_eq!(f32, radius, size.width().max(size.height()) / 2.0);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_anchor_intersection_is_on_circle() {
        let shape = NodeShape::anchor("End", &text());
        let NodeShape::Anchor { radius, .. } = shape else {
            panic!("not an anchor");
        };
        let center = Point::new(10.0, 10.0);
        let hit = shape.intersect(center, Point::new(10.0, 200.0), Direction::In);

        assert_eq!(hit.len(), 1);
        assert_approx_eq!(f32, hit[0].distance(center), radius, epsilon = 0.001);
        assert!(hit[0].y() > center.y());
    }

    #[test]
    fn test_parallel_sizes_top_bottom() {
        let branches = vec![
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            GraphLayout::from_size(Size::new(60.0, 80.0)),
        ];
        let shape = NodeShape::parallel(branches, Orientation::TopBottom);

        // bw = 100 + 20 + 60, bh = 80; extra padding on the entry side (top)
        assert_eq!(shape.size(), Size::new(40.0 + 180.0, 40.0 + 80.0 + 20.0));

        let container = shape.container().unwrap();
        assert_eq!(container.nested()[0].offset(), Point::new(20.0, 40.0));
        assert_eq!(container.nested()[1].offset(), Point::new(140.0, 40.0));
    }

    #[test]
    fn test_parallel_sizes_left_right() {
        let branches = vec![
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            GraphLayout::from_size(Size::new(60.0, 80.0)),
        ];
        let shape = NodeShape::parallel(branches, Orientation::LeftRight);

        // bw = 100, bh = 50 + 20 + 80; extra padding on the entry side (left)
        assert_eq!(shape.size(), Size::new(40.0 + 100.0 + 20.0, 40.0 + 150.0));

        let container = shape.container().unwrap();
        assert_eq!(container.nested()[0].offset(), Point::new(40.0, 20.0));
        assert_eq!(container.nested()[1].offset(), Point::new(40.0, 90.0));
    }

    #[test]
    fn test_container_incoming_edges_use_entry_point() {
        let shape = NodeShape::parallel(
            vec![GraphLayout::from_size(Size::new(100.0, 50.0))],
            Orientation::TopBottom,
        );
        let center = Point::new(200.0, 200.0);
        let size = shape.size();

        let entry = shape.intersect(center, Point::new(500.0, 0.0), Direction::In);
        assert_eq!(entry, vec![Point::new(200.0, 200.0 - size.height() / 2.0)]);

        let exit = shape.intersect(center, Point::new(200.0, 1000.0), Direction::Out);
        assert_eq!(exit, vec![Point::new(200.0, 200.0 + size.height() / 2.0)]);
    }

    #[test]
    fn test_left_right_entry_point() {
        let shape = NodeShape::map(
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            Orientation::LeftRight,
        );
        let size = shape.size();
        let entry = shape.intersect(Point::new(0.0, 0.0), Point::new(-50.0, 80.0), Direction::In);
        assert_eq!(entry, vec![Point::new(-size.width() / 2.0, 0.0)]);
    }

    #[test]
    fn test_map_size_adds_stacked_frames() {
        let shape = NodeShape::map(
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            Orientation::TopBottom,
        );

        assert_eq!(shape.size(), Size::new(140.0 + 15.0, 20.0 + 50.0 + 20.0));
        let container = shape.container().unwrap();
        assert_eq!(container.frame(), Size::new(140.0, 90.0));
        assert_eq!(container.nested()[0].offset(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_map_draws_three_frames() {
        let shape = NodeShape::map(
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            Orientation::TopBottom,
        );
        let rendered = shape.draw(&text()).to_string();
        assert_eq!(rendered.matches("<rect").count(), 3);
        assert!(rendered.contains("x=\"-10\""));
    }

    #[test]
    fn test_map_outline_covers_drawn_frames() {
        let shape = NodeShape::map(
            GraphLayout::from_size(Size::new(100.0, 50.0)),
            Orientation::TopBottom,
        );
        let bounds = shape.outline_bounds(Point::new(0.0, 0.0));

        // Frame 140x90 centered on the node, back frames shifted by up to 10
        assert_approx_eq!(f32, bounds.min_x(), -80.0);
        assert_approx_eq!(f32, bounds.max_x(), 70.0);
        assert_approx_eq!(f32, bounds.min_y(), -55.0);
        assert_approx_eq!(f32, bounds.max_y(), 45.0);
        assert!(bounds.max_x() < shape.size().width() / 2.0);
    }

    #[test]
    fn test_state_outline_matches_size() {
        let shape = NodeShape::state("Hello", &text());
        let center = Point::new(30.0, 40.0);
        assert_eq!(
            shape.outline_bounds(center),
            Bounds::new_from_center(center, shape.size())
        );
    }
}
