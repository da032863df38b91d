//! Builds [`WorkflowGraph`]s from workflow definitions.

use log::{debug, trace};

use stepviz_core::semantic::{Definition, State, StateType};

use super::graph::{AnchorKind, GraphEdge, GraphNode, NodeKind, WorkflowGraph, state_node_id};
use crate::error::StepvizError;

impl WorkflowGraph {
    /// Builds the graph of `definition`.
    ///
    /// Nodes are added anchors first, then one node per state in document
    /// order. For every state its successor edges follow in
    /// [`State::successors`] order, then the edge from `start` if it is the
    /// `StartAt` state, then the edge to `end` if it is terminal. Anchor
    /// edges only exist when `with_anchors` is set.
    ///
    /// Transition targets are not checked. Containers build their nested
    /// definitions recursively, always without anchors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stepviz::structure::WorkflowGraph;
    /// # use stepviz::semantic::{Definition, State, StateType};
    /// let definition = Definition::new("A")
    ///     .with_state("A", State::new(StateType::Task).with_next("B"))
    ///     .with_state("B", State::new(StateType::Succeed));
    ///
    /// let graph = WorkflowGraph::from_definition(&definition, true);
    /// let ids: Vec<_> = graph.nodes().map(|node| node.id()).collect();
    /// assert_eq!(ids, ["start", "end", "state-A", "state-B"]);
    /// assert_eq!(graph.edges().len(), 3);
    /// ```
    pub fn from_definition(definition: &Definition, with_anchors: bool) -> Self {
        let mut graph = WorkflowGraph::new();
        graph.set_start_at(definition.start_at());

        if with_anchors {
            graph.add_node(GraphNode::anchor(AnchorKind::Start));
            graph.add_node(GraphNode::anchor(AnchorKind::End));
        }

        for (name, state) in definition.states() {
            let id = state_node_id(name);
            graph.add_node(GraphNode::state(name, state.kind().clone(), node_kind(state)));

            for next in state.successors() {
                graph.add_edge(GraphEdge::new(&id, state_node_id(next)));
            }

            if with_anchors && definition.start_at() == name {
                graph.add_edge(GraphEdge::new(AnchorKind::Start.id(), &id));
            }

            if with_anchors && state.is_terminal() {
                graph.add_edge(GraphEdge::new(&id, AnchorKind::End.id()));
            }

            trace!(state = name.as_str(), kind:% = state.kind(); "State added to graph");
        }

        debug!(
            nodes = graph.nodes_count(),
            edges = graph.edges().len(),
            anchors = with_anchors;
            "Workflow graph built"
        );
        graph
    }

    /// Like [`WorkflowGraph::from_definition`], but rejects definitions that
    /// cannot be drawn.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Graph`] if a parallel state, at any depth,
    /// has no branches.
    pub fn try_from_definition(
        definition: &Definition,
        with_anchors: bool,
    ) -> Result<Self, StepvizError> {
        check_containers(definition)?;
        Ok(Self::from_definition(definition, with_anchors))
    }
}

fn check_containers(definition: &Definition) -> Result<(), StepvizError> {
    for (name, state) in definition.states() {
        if *state.kind() == StateType::Parallel && state.branches().is_empty() {
            return Err(StepvizError::Graph(format!(
                "Parallel state `{name}` has no branches"
            )));
        }
        for nested in state.branches().iter().chain(state.iterator()) {
            check_containers(nested)?;
        }
    }
    Ok(())
}

fn node_kind(state: &State) -> NodeKind {
    match state.kind() {
        StateType::Parallel => NodeKind::ParallelContainer {
            branches: state
                .branches()
                .iter()
                .map(|branch| WorkflowGraph::from_definition(branch, false))
                .collect(),
        },
        StateType::Map => NodeKind::MapContainer {
            iterator: Box::new(
                state
                    .iterator()
                    .map(|iterator| WorkflowGraph::from_definition(iterator, false))
                    .unwrap_or_default(),
            ),
        },
        _ => NodeKind::RegularState,
    }
}
