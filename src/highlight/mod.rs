//! Flow highlighting: which nodes and flow edges can run before or after the
//! selected node.
//!
//! Predecessors are walked strictly backward and successors strictly forward;
//! a node reached going backward never continues the walk forward. Each
//! direction keeps its own visited set keyed by node id, so cycles terminate.

use crate::data::NodeId;
use crate::graph::Graph;
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;
use std::fmt;

/// A flow edge, identified by the slot it leaves from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowEdgeId {
    pub source: NodeId,
    pub slot: usize,
    pub target: NodeId,
}

impl fmt::Display for FlowEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] -> {}", self.source, self.slot, self.target)
    }
}

/// Every node and flow edge in exactly one of two states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowHighlight {
    pub highlighted_nodes: BTreeSet<NodeId>,
    pub highlighted_edges: BTreeSet<FlowEdgeId>,
    pub muted_nodes: BTreeSet<NodeId>,
    pub muted_edges: BTreeSet<FlowEdgeId>,
}

impl FlowHighlight {
    /// Nothing highlighted: the unhighlighted state of the whole graph.
    pub fn cleared(graph: &Graph) -> Self {
        Self {
            highlighted_nodes: BTreeSet::new(),
            highlighted_edges: BTreeSet::new(),
            muted_nodes: graph.nodes().iter().map(|n| n.uid.clone()).collect(),
            muted_edges: flow_edges(graph).into_iter().collect(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.highlighted_nodes.is_empty() && self.highlighted_edges.is_empty()
    }

    pub fn is_highlighted(&self, id: &NodeId) -> bool {
        self.highlighted_nodes.contains(id)
    }
}

/// All flow edges whose target exists. Dangling flow references are not
/// edges.
pub fn flow_edges(graph: &Graph) -> Vec<FlowEdgeId> {
    graph
        .nodes()
        .iter()
        .flat_map(|node| {
            node.flow_uids
                .iter()
                .enumerate()
                .filter_map(move |(slot, target)| {
                    let target = target.as_ref()?;
                    Some(FlowEdgeId {
                        source: node.uid.clone(),
                        slot,
                        target: target.clone(),
                    })
                })
        })
        .filter(|edge| graph.contains(&edge.target))
        .collect()
}

/// Highlights everything that flows into or out of `selected`.
///
/// A selection without flow ports, or one that is not in the graph, yields
/// the cleared state.
pub fn highlight(graph: &Graph, selected: &NodeId) -> FlowHighlight {
    let has_flow_ports = graph
        .node(selected)
        .and_then(|n| graph.definition_of(n))
        .is_some_and(|d| d.has_flow_ports());
    if !has_flow_ports {
        return FlowHighlight::cleared(graph);
    }

    let edges = flow_edges(graph);
    let mut incoming: AHashMap<&NodeId, Vec<&FlowEdgeId>> = AHashMap::new();
    let mut outgoing: AHashMap<&NodeId, Vec<&FlowEdgeId>> = AHashMap::new();
    for edge in &edges {
        incoming.entry(&edge.target).or_default().push(edge);
        outgoing.entry(&edge.source).or_default().push(edge);
    }

    let mut nodes = BTreeSet::from([selected.clone()]);
    let mut highlighted_edges = BTreeSet::new();

    // Backward to predecessors.
    walk(selected, &incoming, |e| &e.source, &mut nodes, &mut highlighted_edges);
    // Forward to successors.
    walk(selected, &outgoing, |e| &e.target, &mut nodes, &mut highlighted_edges);

    let muted_nodes = graph
        .nodes()
        .iter()
        .map(|n| n.uid.clone())
        .filter(|id| !nodes.contains(id))
        .collect();
    let muted_edges = edges
        .iter()
        .filter(|e| !highlighted_edges.contains(*e))
        .cloned()
        .collect();

    FlowHighlight {
        highlighted_nodes: nodes,
        highlighted_edges,
        muted_nodes,
        muted_edges,
    }
}

/// Depth-first walk in one direction. `adjacent` maps a node to the edges
/// leaving it in that direction and `next` picks the far end of an edge.
fn walk<'a>(
    start: &'a NodeId,
    adjacent: &AHashMap<&'a NodeId, Vec<&'a FlowEdgeId>>,
    next: impl Fn(&'a FlowEdgeId) -> &'a NodeId,
    nodes: &mut BTreeSet<NodeId>,
    edges: &mut BTreeSet<FlowEdgeId>,
) {
    let mut visited: AHashSet<&NodeId> = AHashSet::from_iter([start]);
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        let Some(adjacent_edges) = adjacent.get(current) else {
            continue;
        };
        for edge in adjacent_edges {
            edges.insert((*edge).clone());
            let far = next(*edge);
            if visited.insert(far) {
                nodes.insert(far.clone());
                stack.push(far);
            }
        }
    }
}
