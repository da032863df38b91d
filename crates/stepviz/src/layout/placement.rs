//! Coordinates from ranks and real node sizes.
//!
//! Positions are computed in flow space, where the main axis follows the
//! ranks and the cross axis runs along a rank. For top-to-bottom flow the
//! main axis is y; for left-to-right flow the axes are swapped on the way
//! out.

use stepviz_core::geometry::{Point, Size};

use super::ranking::RankedComponent;
use crate::config::Orientation;

/// Spacing between ranks, nodes and parallel edges.
#[derive(Debug, Clone, Copy)]
pub(super) struct Spacing {
    pub rank: f32,
    pub node: f32,
    pub edge: f32,
}

/// Rank of a node inside its component.
#[derive(Debug, Clone, Copy)]
struct Slot {
    component: usize,
    rank: usize,
}

/// Main-axis extent of every rank of a component.
#[derive(Debug, Clone, Default)]
struct ComponentRanks {
    starts: Vec<f32>,
    extents: Vec<f32>,
}

/// Node centers plus what is needed to route edges between them.
#[derive(Debug)]
pub(super) struct Placement {
    orientation: Orientation,
    spacing: Spacing,
    /// Flow-space centers, indexed like the graph nodes
    centers: Vec<Point>,
    /// Flow-space sizes, indexed like the graph nodes
    sizes: Vec<Size>,
    slots: Vec<Option<Slot>>,
    components: Vec<ComponentRanks>,
}

impl Placement {
    /// Places every node of `components`. `sizes` are the node sizes in
    /// drawing space, indexed like the graph nodes.
    pub fn new(
        components: &[RankedComponent],
        sizes: &[Size],
        orientation: Orientation,
        spacing: Spacing,
    ) -> Self {
        let sizes: Vec<Size> = sizes.iter().map(|size| to_flow_size(*size, orientation)).collect();
        let mut centers = vec![Point::default(); sizes.len()];
        let mut slots = vec![None; sizes.len()];
        let mut ranks = Vec::with_capacity(components.len());
        let mut cross_offset = 0.0;

        for (component_idx, component) in components.iter().enumerate() {
            let mut geometry = ComponentRanks::default();
            let mut main = 0.0;
            for rank in &component.ranks {
                let extent = rank
                    .iter()
                    .map(|node| sizes[node.index].height())
                    .fold(0.0, f32::max);
                geometry.starts.push(main);
                geometry.extents.push(extent);
                main += extent + spacing.rank;
            }

            let unit = cross_unit(component, &sizes, spacing.node);
            let mut min_cross = f32::MAX;
            let mut max_cross = f32::MIN;

            for (rank_idx, rank) in component.ranks.iter().enumerate() {
                let main_center = geometry.starts[rank_idx] + geometry.extents[rank_idx] / 2.0;
                let mut previous: Option<(f32, f32)> = None;

                for node in rank {
                    let width = sizes[node.index].width();
                    let mut cross = node.hint as f32 * unit;
                    if let Some((prev_cross, prev_width)) = previous {
                        cross = cross.max(prev_cross + (prev_width + width) / 2.0 + spacing.node);
                    }
                    previous = Some((cross, width));

                    min_cross = min_cross.min(cross - width / 2.0);
                    max_cross = max_cross.max(cross + width / 2.0);
                    centers[node.index] = Point::new(cross, main_center);
                    slots[node.index] = Some(Slot {
                        component: component_idx,
                        rank: rank_idx,
                    });
                }
            }

            if min_cross > max_cross {
                ranks.push(geometry);
                continue;
            }

            for node in component.ranks.iter().flatten() {
                let center = centers[node.index];
                centers[node.index] = center.with_x(center.x() - min_cross + cross_offset);
            }
            cross_offset += max_cross - min_cross + spacing.node;
            ranks.push(geometry);
        }

        Self {
            orientation,
            spacing,
            centers,
            sizes,
            slots,
            components: ranks,
        }
    }

    /// Center of node `index` in drawing space.
    pub fn center(&self, index: usize) -> Point {
        self.to_drawing(self.centers[index])
    }

    /// Raw waypoints of an edge from `source` to `target`, both node indices.
    ///
    /// `duplicate` counts earlier edges between the same two nodes; each
    /// one is shifted by the edge spacing so parallel edges stay apart.
    pub fn waypoints(&self, source: usize, target: usize, duplicate: usize) -> Vec<Point> {
        let s = self.centers[source];
        let t = self.centers[target];
        let shift = duplicate_shift(duplicate, self.spacing.edge / 2.0);

        let points = match (self.slots[source], self.slots[target]) {
            _ if source == target => self.self_loop(source, duplicate),
            (Some(a), Some(b)) if a.component == b.component && a.rank != b.rank => {
                let ranks = &self.components[a.component];
                let (source_gap, target_gap) = if a.rank < b.rank {
                    (
                        ranks.starts[a.rank] + ranks.extents[a.rank] + self.spacing.rank / 2.0,
                        ranks.starts[b.rank] - self.spacing.rank / 2.0,
                    )
                } else {
                    (
                        ranks.starts[a.rank] - self.spacing.rank / 2.0,
                        ranks.starts[b.rank] + ranks.extents[b.rank] + self.spacing.rank / 2.0,
                    )
                };
                vec![
                    s,
                    Point::new(s.x() + shift, source_gap),
                    Point::new(t.x() + shift, target_gap),
                    t,
                ]
            }
            _ => {
                let mid = s.midpoint(t);
                vec![s, mid.with_y(mid.y() + shift), t]
            }
        };

        points.into_iter().map(|point| self.to_drawing(point)).collect()
    }

    /// Small loop below the node, on its exit side.
    fn self_loop(&self, index: usize, duplicate: usize) -> Vec<Point> {
        let center = self.centers[index];
        let size = self.sizes[index];
        let depth = self.spacing.rank / 2.0 + duplicate as f32 * self.spacing.edge / 2.0;
        let below = center.y() + size.height() / 2.0 + depth;
        vec![
            center,
            Point::new(center.x() - size.width() / 4.0, below),
            Point::new(center.x() + size.width() / 4.0, below),
            center,
        ]
    }

    fn to_drawing(&self, point: Point) -> Point {
        match self.orientation {
            Orientation::TopBottom => point,
            Orientation::LeftRight => point.transpose(),
        }
    }
}

fn to_flow_size(size: Size, orientation: Orientation) -> Size {
    match orientation {
        Orientation::TopBottom => size,
        Orientation::LeftRight => size.transpose(),
    }
}

/// Scale from Sugiyama cross positions to drawing units.
///
/// The smallest scale that keeps every pair of neighbours in a rank apart.
/// Components without such pairs fall back to the average node width.
fn cross_unit(component: &RankedComponent, sizes: &[Size], node_spacing: f32) -> f32 {
    let unit = component
        .ranks
        .iter()
        .flat_map(|rank| rank.windows(2))
        .filter_map(|pair| {
            let distance = (pair[1].hint - pair[0].hint) as f32;
            (distance > f32::EPSILON).then(|| {
                let needed = (sizes[pair[0].index].width() + sizes[pair[1].index].width()) / 2.0
                    + node_spacing;
                needed / distance
            })
        })
        .fold(0.0, f32::max);

    if unit > 0.0 {
        return unit;
    }

    let nodes: Vec<f32> = component
        .ranks
        .iter()
        .flatten()
        .map(|node| sizes[node.index].width())
        .collect();
    if nodes.is_empty() {
        return node_spacing;
    }
    nodes.iter().sum::<f32>() / nodes.len() as f32 / 2.0 + node_spacing
}

/// 0, +d, -d, +2d, -2d, ...
fn duplicate_shift(duplicate: usize, distance: f32) -> f32 {
    let step = duplicate.div_ceil(2) as f32 * distance;
    if duplicate % 2 == 1 { step } else { -step }
}
