//! Order-preserving directed graph of workflow nodes.
//!
//! Nodes are stored by id in insertion order and edges in a plain vector,
//! with per-node indices of incoming and outgoing edges. The graph is
//! directed and allows self-loops, multiple edges between the same pair of
//! nodes, and edges whose endpoints were never added.

use std::collections::HashMap;

use indexmap::IndexMap;

use stepviz_core::semantic::StateType;

/// Which anchor a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Start,
    End,
}

impl AnchorKind {
    /// Node id of the anchor.
    pub fn id(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    /// Text drawn inside the anchor.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
        }
    }
}

/// Closed set of node kinds. Renderers match on it exhaustively.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Anchor(AnchorKind),
    RegularState,
    ParallelContainer { branches: Vec<WorkflowGraph> },
    MapContainer { iterator: Box<WorkflowGraph> },
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::ParallelContainer { .. } | Self::MapContainer { .. })
    }
}

/// A node of the workflow graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: String,
    label: String,
    state: Option<(String, StateType)>,
    kind: NodeKind,
}

impl GraphNode {
    pub fn anchor(kind: AnchorKind) -> Self {
        Self {
            id: kind.id().to_string(),
            label: kind.label().to_string(),
            state: None,
            kind: NodeKind::Anchor(kind),
        }
    }

    pub fn state(name: &str, state_type: StateType, kind: NodeKind) -> Self {
        Self {
            id: state_node_id(name),
            label: name.to_string(),
            state: Some((name.to_string(), state_type)),
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the originating state, `None` for anchors.
    pub fn state_name(&self) -> Option<&str> {
        self.state.as_ref().map(|(name, _)| name.as_str())
    }

    /// Type of the originating state, `None` for anchors.
    pub fn state_type(&self) -> Option<&StateType> {
        self.state.as_ref().map(|(_, state_type)| state_type)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// Node id of the state called `name`.
pub fn state_node_id(name: &str) -> String {
    format!("state-{name}")
}

/// A directed transition between two node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    source: String,
    target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Workflow graph with nodes and edges in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    nodes: IndexMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    incoming_edges: HashMap<String, Vec<usize>>,
    outgoing_edges: HashMap<String, Vec<usize>>,
    start_at: Option<String>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node`. A node with the same id is replaced in place.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Adds an edge. Endpoints are not checked and duplicates are kept.
    pub fn add_edge(&mut self, edge: GraphEdge) -> usize {
        let idx = self.edges.len();
        self.outgoing_edges
            .entry(edge.source.clone())
            .or_default()
            .push(idx);
        self.incoming_edges
            .entry(edge.target.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
        idx
    }

    pub(super) fn set_start_at(&mut self, start_at: &str) {
        self.start_at = Some(start_at.to_string());
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Index of the node in insertion order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node of the `StartAt` state, if it was added.
    pub fn start_node(&self) -> Option<&GraphNode> {
        self.start_at
            .as_deref()
            .and_then(|name| self.nodes.get(&state_node_id(name)))
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes
            .values()
            .filter(|node| !self.incoming_edges.contains_key(&node.id))
    }

    /// Targets of the edges leaving `source_id`, skipping unknown targets.
    pub fn outgoing_nodes<'a>(&'a self, source_id: &str) -> impl Iterator<Item = &'a GraphNode> {
        self.outgoing_edges
            .get(source_id)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.nodes.get(&self.edges[idx].target))
    }

    /// Total number of nodes, nested graphs included.
    pub fn total_nodes_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| {
                1 + match node.kind() {
                    NodeKind::ParallelContainer { branches } => {
                        branches.iter().map(WorkflowGraph::total_nodes_count).sum()
                    }
                    NodeKind::MapContainer { iterator } => iterator.total_nodes_count(),
                    _ => 0,
                }
            })
            .sum()
    }
}
