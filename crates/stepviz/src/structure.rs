//! Graph model of a workflow definition.
//!
//! A [`WorkflowGraph`] is built from a [`Definition`](stepviz_core::semantic::Definition)
//! by [`WorkflowGraph::from_definition`]. It is the input of the layout
//! stage: one [`GraphNode`] per state plus optional start/end anchors, and
//! one [`GraphEdge`] per transition.
//!
//! Parallel and map states own nested graphs built from their branches or
//! iterator. Nested graphs never carry anchors.

mod builder;
mod graph;

pub use graph::{AnchorKind, GraphEdge, GraphNode, NodeKind, WorkflowGraph, state_node_id};
