//! Layered layout of workflow graphs.
//!
//! [`Engine::layout`] turns a [`WorkflowGraph`] into a [`GraphLayout`]:
//!
//! 1. Every node gets a [`NodeShape`]. Containers are laid out first, since
//!    their size depends on the layout of their nested graphs (post-order).
//! 2. Ranks and the order within each rank come from `rust-sugiyama`.
//! 3. Coordinates are computed from the real node sizes and the configured
//!    spacing, and every edge gets raw waypoints.
//! 4. Waypoints are clipped to the node outlines by the edge router.
//!
//! Edges whose source or target is not a node of the graph are dropped here
//! with a warning. The resulting layout is translated so that its content
//! starts at the origin.

mod placement;
mod ranking;

use std::collections::HashMap;

use log::{debug, warn};

use stepviz_core::{
    draw::TextDefinition,
    geometry::{Bounds, Point, Size},
    intersect::Direction,
    semantic::StateType,
};

use crate::{
    config::{LayoutConfig, Orientation},
    error::StepvizError,
    route::{Intersector, route_edge},
    shape::NodeShape,
    structure::{GraphNode, NodeKind, WorkflowGraph},
};

use placement::{Placement, Spacing};

/// A node with its final position.
#[derive(Debug, Clone)]
pub struct PositionedNode {
    id: String,
    state: Option<(String, StateType)>,
    center: Point,
    shape: NodeShape,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the originating state, `None` for anchors.
    pub fn state_name(&self) -> Option<&str> {
        self.state.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn state_type(&self) -> Option<&StateType> {
        self.state.as_ref().map(|(_, state_type)| state_type)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn shape(&self) -> &NodeShape {
        &self.shape
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.center, self.shape.size())
    }

    fn translate(&mut self, offset: Point) {
        self.center = self.center.add_point(offset);
    }
}

impl Intersector for PositionedNode {
    fn intersect(&self, point: Point, direction: Direction) -> Vec<Point> {
        self.shape.intersect(self.center, point, direction)
    }
}

/// An edge with raw and routed waypoints.
#[derive(Debug, Clone)]
pub struct PositionedEdge {
    source: usize,
    target: usize,
    raw: Vec<Point>,
    points: Vec<Point>,
}

impl PositionedEdge {
    /// Index of the source node in [`GraphLayout::nodes`].
    pub fn source(&self) -> usize {
        self.source
    }

    /// Index of the target node in [`GraphLayout::nodes`].
    pub fn target(&self) -> usize {
        self.target
    }

    /// Waypoints from center to center, as produced by the layout.
    pub fn raw_points(&self) -> &[Point] {
        &self.raw
    }

    /// Waypoints clipped to the node outlines.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    fn translate(&mut self, offset: Point) {
        for point in self.raw.iter_mut().chain(self.points.iter_mut()) {
            *point = point.add_point(offset);
        }
    }
}

/// A laid out graph. Coordinates start at the origin.
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    orientation: Orientation,
    nodes: Vec<PositionedNode>,
    edges: Vec<PositionedEdge>,
    size: Size,
    start: Option<usize>,
}

impl GraphLayout {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[PositionedEdge] {
        &self.edges
    }

    /// Size of the content, from the origin.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Center of the `StartAt` state, if the graph has one.
    pub fn start_center(&self) -> Option<Point> {
        self.start.map(|index| self.nodes[index].center)
    }

    /// Calls `visit` for this layout and every nested layout, with the
    /// position of the nested layout's origin in the coordinates of this
    /// layout and its nesting depth.
    ///
    /// A layout is visited before the layouts nested in its containers.
    pub fn visit_layouts<'a>(&'a self, visit: &mut impl FnMut(&'a GraphLayout, Point, usize)) {
        self.visit_layouts_at(Point::default(), 0, visit);
    }

    fn visit_layouts_at<'a>(
        &'a self,
        origin: Point,
        depth: usize,
        visit: &mut impl FnMut(&'a GraphLayout, Point, usize),
    ) {
        visit(self, origin, depth);

        for node in &self.nodes {
            let Some(container) = node.shape.container() else {
                continue;
            };
            let frame_origin = origin
                .add_point(node.center)
                .add_point(container.frame_origin());
            for nested in container.nested() {
                nested.layout().visit_layouts_at(
                    frame_origin.add_point(nested.offset()),
                    depth + 1,
                    visit,
                );
            }
        }
    }

    /// Calls `visit` for every node, nested ones included, with the node's
    /// center in the coordinates of this layout and its nesting depth.
    pub fn visit_nodes<'a>(&'a self, visit: &mut impl FnMut(&'a PositionedNode, Point, usize)) {
        self.visit_layouts(&mut |layout, origin, depth| {
            for node in &layout.nodes {
                visit(node, origin.add_point(node.center), depth);
            }
        });
    }

    /// Empty layout occupying `size`, for sizing containers in tests.
    #[cfg(test)]
    pub(crate) fn from_size(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// Layered layout engine.
///
/// Holds the flow direction, spacing and the label style used to size
/// nodes.
#[derive(Debug, Clone)]
pub struct Engine {
    orientation: Orientation,
    spacing: Spacing,
    text: TextDefinition,
}

impl Engine {
    pub fn new(config: &LayoutConfig, text: TextDefinition) -> Self {
        Self {
            orientation: config.direction(),
            spacing: Spacing {
                rank: config.rank_spacing(),
                node: config.node_spacing(),
                edge: config.edge_spacing(),
            },
            text,
        }
    }

    /// Overrides the configured flow direction.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Lays out `graph` and every nested graph.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Layout`] if the layered layout engine fails.
    pub fn layout(&self, graph: &WorkflowGraph) -> Result<GraphLayout, StepvizError> {
        let shapes = graph
            .nodes()
            .map(|node| self.shape(node))
            .collect::<Result<Vec<_>, _>>()?;
        let sizes: Vec<Size> = shapes.iter().map(NodeShape::size).collect();

        let mut edges = Vec::with_capacity(graph.edges().len());
        for edge in graph.edges() {
            match (graph.node_index(edge.source()), graph.node_index(edge.target())) {
                (Some(source), Some(target)) => edges.push((source, target)),
                _ => warn!(
                    source = edge.source(),
                    target = edge.target();
                    "Dropping edge with unknown endpoint"
                ),
            }
        }

        let components = ranking::rank_nodes(sizes.len(), &edges)?;
        let placement = Placement::new(&components, &sizes, self.orientation, self.spacing);

        let nodes: Vec<PositionedNode> = graph
            .nodes()
            .zip(shapes)
            .enumerate()
            .map(|(index, (node, shape))| PositionedNode {
                id: node.id().to_string(),
                state: node
                    .state_name()
                    .zip(node.state_type())
                    .map(|(name, state_type)| (name.to_string(), state_type.clone())),
                center: placement.center(index),
                shape,
            })
            .collect();

        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
        let edges: Vec<PositionedEdge> = edges
            .into_iter()
            .map(|(source, target)| {
                let duplicate = seen.entry((source, target)).or_insert(0);
                let raw = placement.waypoints(source, target, *duplicate);
                *duplicate += 1;
                let points = route_edge(&raw, Some(&nodes[source]), Some(&nodes[target]));
                PositionedEdge {
                    source,
                    target,
                    raw,
                    points,
                }
            })
            .collect();

        let start = graph
            .start_node()
            .and_then(|node| graph.node_index(node.id()));

        let mut layout = GraphLayout {
            orientation: self.orientation,
            nodes,
            edges,
            size: Size::default(),
            start,
        };
        layout.normalize();

        debug!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            width = layout.size.width(),
            height = layout.size.height();
            "Graph laid out"
        );
        Ok(layout)
    }

    fn shape(&self, node: &GraphNode) -> Result<NodeShape, StepvizError> {
        Ok(match node.kind() {
            NodeKind::Anchor(anchor) => NodeShape::anchor(anchor.label(), &self.text),
            NodeKind::RegularState => NodeShape::state(node.label(), &self.text),
            NodeKind::ParallelContainer { branches } => {
                let branches = branches
                    .iter()
                    .map(|branch| self.layout(branch))
                    .collect::<Result<Vec<_>, _>>()?;
                NodeShape::parallel(branches, self.orientation)
            }
            NodeKind::MapContainer { iterator } => {
                NodeShape::map(self.layout(iterator)?, self.orientation)
            }
        })
    }
}

impl GraphLayout {
    /// Moves the content so that its bounds start at the origin.
    fn normalize(&mut self) {
        let node_bounds = self.nodes.iter().map(PositionedNode::bounds);
        let edge_bounds = self
            .edges
            .iter()
            .filter_map(|edge| Bounds::from_points(edge.raw.iter().chain(&edge.points).copied()));
        let Some(bounds) = node_bounds
            .chain(edge_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
        else {
            return;
        };

        let offset = Point::new(-bounds.min_x(), -bounds.min_y());
        for node in &mut self.nodes {
            node.translate(offset);
        }
        for edge in &mut self.edges {
            edge.translate(offset);
        }
        self.size = bounds.to_size();
    }
}
