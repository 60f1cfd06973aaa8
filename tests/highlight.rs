//! Tests for flow highlighting.
mod common;
use common::*;
use std::collections::BTreeSet;
use udongraph::highlight::flow_edges;
use udongraph::prelude::*;

fn assert_partition(graph: &Graph, result: &FlowHighlight) {
    let all_nodes: BTreeSet<NodeId> = graph.nodes().iter().map(|n| n.uid.clone()).collect();
    let union: BTreeSet<NodeId> = result
        .highlighted_nodes
        .union(&result.muted_nodes)
        .cloned()
        .collect();
    assert_eq!(union, all_nodes);
    assert!(result.highlighted_nodes.is_disjoint(&result.muted_nodes));

    let all_edges: BTreeSet<FlowEdgeId> = flow_edges(graph).into_iter().collect();
    let union: BTreeSet<FlowEdgeId> = result
        .highlighted_edges
        .union(&result.muted_edges)
        .cloned()
        .collect();
    assert_eq!(union, all_edges);
    assert!(result.highlighted_edges.is_disjoint(&result.muted_edges));
}

#[test]
fn test_highlight_middle_of_chain() {
    let (graph, ids) = create_flow_chain(3);
    let result = highlight(&graph, &ids[2]);

    let expected: BTreeSet<NodeId> = ids.iter().cloned().collect();
    assert_eq!(result.highlighted_nodes, expected);
    assert_eq!(result.highlighted_edges.len(), 3);
    assert!(result.muted_nodes.is_empty());
    assert_partition(&graph, &result);
}

#[test]
fn test_highlight_directions_never_cross() {
    // start -> a -> b and start -> c, branch point at start.
    // Selecting a: start is a predecessor; c is only reachable forward from
    // start and must stay muted.
    let mut graph = empty_graph();
    let start = graph.add_node("Block", Position::default()).unwrap();
    let a = graph.add_node("Debug_Log", Position::default()).unwrap();
    let b = graph.add_node("Debug_Log", Position::default()).unwrap();
    let c = graph.add_node("Debug_Log", Position::default()).unwrap();
    graph.connect_flow(&start, 0, &a).unwrap();
    graph.connect_flow(&a, 0, &b).unwrap();
    graph.connect_flow(&start, 1, &c).unwrap();

    let result = highlight(&graph, &a);
    assert!(result.is_highlighted(&start));
    assert!(result.is_highlighted(&a));
    assert!(result.is_highlighted(&b));
    assert!(!result.is_highlighted(&c));
    assert!(result.muted_nodes.contains(&c));
    assert!(result.muted_edges.iter().any(|e| e.target == c));
    assert_partition(&graph, &result);
}

#[test]
fn test_highlight_terminates_on_cycles() {
    let mut graph = empty_graph();
    let event = graph.add_node("Event_Update", Position::default()).unwrap();
    let loop_node = graph.add_node("While", Position::default()).unwrap();
    let body = graph.add_node("Debug_Log", Position::default()).unwrap();
    let after = graph.add_node("Debug_Log", Position::default()).unwrap();
    graph.connect_flow(&event, 0, &loop_node).unwrap();
    graph.connect_flow(&loop_node, 0, &body).unwrap();
    graph.connect_flow(&body, 0, &loop_node).unwrap();
    graph.connect_flow(&loop_node, 1, &after).unwrap();

    let result = highlight(&graph, &body);
    assert_eq!(result.highlighted_nodes.len(), 4);
    assert_eq!(result.highlighted_edges.len(), 4);
    assert_partition(&graph, &result);
}

#[test]
fn test_highlight_clears_for_nodes_without_flow_ports() {
    let (mut graph, ids) = create_flow_chain(1);
    let constant = graph.add_node("Const_Int", Position::default()).unwrap();
    graph.connect(&constant, 0, &ids[1], 0).unwrap();

    let result = highlight(&graph, &constant);
    assert!(result.is_cleared());
    assert_eq!(result, FlowHighlight::cleared(&graph));
    assert_eq!(result.muted_nodes.len(), graph.len());
    assert_partition(&graph, &result);

    let missing = highlight(&graph, &NodeId::from("missing"));
    assert!(missing.is_cleared());
}

#[test]
fn test_highlight_ignores_data_edges() {
    let (mut graph, ids) = create_flow_chain(1);
    let other_event = graph.add_node("Event_Interact", Position::default()).unwrap();
    let constant = graph.add_node("Const_Int", Position::default()).unwrap();
    graph.connect(&constant, 0, &ids[1], 0).unwrap();

    let result = highlight(&graph, &ids[1]);
    assert!(!result.is_highlighted(&constant));
    assert!(!result.is_highlighted(&other_event));
    assert_eq!(result.highlighted_nodes.len(), 2);
}

#[test]
fn test_flow_edges_skip_dangling_targets() {
    let mut start = NodeData::new("Event_Start", Position::default());
    start.flow_uids = vec![Some(NodeId::from("gone"))];
    let data = GraphData {
        nodes: vec![start],
        ..Default::default()
    };
    let graph = Graph::from_data(registry(), data);
    assert!(flow_edges(&graph).is_empty());
}
