//! Rank assignment through the `rust-sugiyama` layered layout.
//!
//! Only the combinatorial part of the Sugiyama result is used: which rank
//! each node lands on and the order of nodes within a rank. Actual
//! coordinates are computed afterwards from the real node sizes, see
//! [`super::placement`].

use std::{collections::HashMap, panic};

use log::{debug, warn};
use rust_sugiyama::configure::Config;

use crate::error::StepvizError;

/// Tolerance when grouping Sugiyama coordinates into ranks.
const RANK_EPSILON: f64 = 1e-6;

/// One node as placed by the ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RankedNode {
    /// Index of the node in graph insertion order
    pub index: usize,
    /// Cross-axis position hint from the Sugiyama result
    pub hint: f64,
}

/// A connected component, as ranks of nodes ordered along the cross axis.
#[derive(Debug, Clone, Default)]
pub(super) struct RankedComponent {
    pub ranks: Vec<Vec<RankedNode>>,
}

impl RankedComponent {
    fn singleton(index: usize) -> Self {
        Self {
            ranks: vec![vec![RankedNode { index, hint: 0.0 }]],
        }
    }

    /// Smallest node index, used to order components.
    fn first_index(&self) -> usize {
        self.ranks
            .iter()
            .flatten()
            .map(|node| node.index)
            .min()
            .unwrap_or(usize::MAX)
    }
}

/// Ranks `node_count` nodes connected by `edges` (pairs of node indices).
///
/// Self-loops and repeated pairs are ignored for ranking. Nodes that take
/// part in no edge become single-node components. Components are returned
/// in order of their first node.
///
/// # Errors
///
/// Returns [`StepvizError::Layout`] if the layout engine panics.
pub(super) fn rank_nodes(
    node_count: usize,
    edges: &[(usize, usize)],
) -> Result<Vec<RankedComponent>, StepvizError> {
    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for &(source, target) in edges {
        if source == target {
            continue;
        }
        let (Ok(source), Ok(target)) = (u32::try_from(source), u32::try_from(target)) else {
            return Err(StepvizError::Layout(format!(
                "Node index out of range for layout engine: {source} -> {target}"
            )));
        };
        if !pairs.contains(&(source, target)) {
            pairs.push((source, target));
        }
    }

    let mut components = Vec::new();
    let mut ranked = vec![false; node_count];

    if !pairs.is_empty() {
        debug!(nodes = node_count, edges = pairs.len(); "Applying Sugiyama algorithm");

        let layouts = panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: 1.0,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&pairs, &config)
        })
        .map_err(|err| {
            let message = err
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| err.downcast_ref::<&str>().copied())
                .unwrap_or("unknown error");
            StepvizError::Layout(format!("Sugiyama layout engine panicked: {message}"))
        })?;

        for (coords, _, _) in &layouts {
            let coords: Vec<(usize, f64, f64)> = coords
                .iter()
                .filter(|(index, _)| *index < node_count)
                .map(|&(index, (x, y))| (index, x, y))
                .collect();
            if coords.is_empty() {
                continue;
            }
            for &(index, _, _) in &coords {
                ranked[index] = true;
            }
            components.push(component_from_coords(&coords, edges));
        }
    }

    for (index, _) in ranked.iter().enumerate().filter(|(_, ranked)| !**ranked) {
        components.push(RankedComponent::singleton(index));
    }

    components.sort_by_key(RankedComponent::first_index);

    if components.iter().flat_map(|c| c.ranks.iter()).flatten().count() != node_count {
        warn!(nodes = node_count; "Layout engine did not rank every node");
    }

    Ok(components)
}

/// Groups Sugiyama coordinates into ranks of increasing flow.
fn component_from_coords(coords: &[(usize, f64, f64)], edges: &[(usize, usize)]) -> RankedComponent {
    let mut levels: Vec<f64> = coords.iter().map(|&(_, _, y)| y).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < RANK_EPSILON);

    let level_of = |y: f64| {
        levels
            .iter()
            .position(|level| (level - y).abs() < RANK_EPSILON)
            .unwrap_or(0)
    };
    let mut rank_of: HashMap<usize, usize> = coords
        .iter()
        .map(|&(index, _, y)| (index, level_of(y)))
        .collect();

    // The engine may grow ranks in either direction along y. Flip if most
    // edges point against increasing rank.
    let (forward, backward) = edges
        .iter()
        .filter_map(|(s, t)| Some((*rank_of.get(s)?, *rank_of.get(t)?)))
        .fold((0, 0), |(f, b), (s, t)| match s.cmp(&t) {
            std::cmp::Ordering::Less => (f + 1, b),
            std::cmp::Ordering::Greater => (f, b + 1),
            std::cmp::Ordering::Equal => (f, b),
        });
    let last = levels.len().saturating_sub(1);
    if backward > forward {
        for rank in rank_of.values_mut() {
            *rank = last - *rank;
        }
    }

    let mut ranks = vec![Vec::new(); levels.len()];
    for &(index, x, _) in coords {
        if let Some(&rank) = rank_of.get(&index) {
            ranks[rank].push(RankedNode { index, hint: x });
        }
    }
    for rank in &mut ranks {
        rank.sort_by(|a, b| a.hint.total_cmp(&b.hint).then(a.index.cmp(&b.index)));
    }

    RankedComponent { ranks }
}
