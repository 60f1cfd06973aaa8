//! Tests for graph mutation, type checks, compilation and repair.
mod common;
use common::*;
use udongraph::prelude::*;

fn raw_node(id: &str, full_name: &str) -> NodeData {
    let mut node = NodeData::new(full_name, Position::default());
    node.uid = NodeId::from(id);
    node
}

fn raw_variable(id: &str, name: &str) -> NodeData {
    let mut node = raw_node(id, "Variable_int");
    node.node_values = vec![
        Value::Int(0),
        Value::String(name.to_string()),
        Value::Bool(false),
        Value::Null,
    ];
    node
}

fn raw_change_event(id: &str, variable: &str) -> NodeData {
    let mut node = raw_node(id, "Event_OnVariableChange");
    node.node_values = vec![Value::String(variable.to_string())];
    node.flow_uids = vec![None];
    node
}

#[test]
fn test_add_node_sizes_slots_from_definition() {
    let mut graph = empty_graph();
    let id = graph
        .add_node("For", Position::new(10.0, 20.0))
        .expect("Failed to add node");

    let node = graph.node(&id).unwrap();
    assert_eq!(node.node_uids.len(), 3);
    assert_eq!(node.flow_uids.len(), 2);
    assert_eq!(node.node_values, vec![Value::Int(0); 3]);
    assert_eq!(node.position, Position::new(10.0, 20.0));
    assert_eq!(graph.title(&id), Some("For"));
}

#[test]
fn test_add_node_rejects_unknown_type() {
    let mut graph = empty_graph();
    let result = graph.add_node("Does_Not_Exist", Position::default());
    assert_eq!(
        result,
        Err(GraphError::UnknownType("Does_Not_Exist".to_string()))
    );
    assert!(graph.is_empty());
}

#[test]
fn test_custom_definitions_get_reserved_value_slots() {
    let bare = |full_name: &str, kind: NodeKind, outputs: Vec<PortDefinition>| NodeDefinition {
        full_name: full_name.to_string(),
        kind,
        values: vec![],
        inputs: vec![],
        outputs,
        flow_input: false,
        flow_outputs: vec![],
    };
    let registry = NodeRegistry::builder()
        .with_definition(bare("Variable_Custom", NodeKind::Variable, vec![]))
        .with_definition(bare(
            "Get_Variable",
            NodeKind::Getter,
            vec![PortDefinition::new("value", "object")],
        ))
        .build();
    let mut graph = Graph::new(std::sync::Arc::new(registry));

    let variable = graph
        .add_variable("Custom", "speed", true)
        .expect("Failed to add variable");
    let node = graph.node(&variable).unwrap();
    assert_eq!(node.node_values.len(), 4);
    assert_eq!(graph.variable_name(&variable), Some("speed"));

    let getter = graph
        .add_getter(&variable, Position::default())
        .expect("Failed to add getter");
    assert_eq!(
        graph.node(&getter).unwrap().variable_ref().as_ref(),
        Some(&variable)
    );
    assert_eq!(graph.compile().nodes.len(), 2);
}

#[test]
fn test_connect_and_overwrite_input() {
    let mut graph = empty_graph();
    let a = graph.add_node("Const_Int", Position::default()).unwrap();
    let b = graph.add_node("Const_Int", Position::default()).unwrap();
    let add = graph.add_node("Int_Add", Position::default()).unwrap();

    graph.connect(&a, 0, &add, 0).expect("Failed to connect");
    assert_eq!(
        graph.node(&add).unwrap().node_uids[0],
        Some(DataRef::new(a.clone(), 0))
    );

    // Connecting the same edge again changes nothing
    graph.connect(&a, 0, &add, 0).expect("Reconnect should be a no-op");

    // A second producer replaces the first
    graph.connect(&b, 0, &add, 0).expect("Failed to overwrite");
    assert_eq!(
        graph.node(&add).unwrap().node_uids[0],
        Some(DataRef::new(b, 0))
    );
}

#[test]
fn test_connect_rejects_incompatible_types() {
    let mut graph = empty_graph();
    let text = graph.add_node("Const_String", Position::default()).unwrap();
    let add = graph.add_node("Int_Add", Position::default()).unwrap();

    match graph.connect(&text, 0, &add, 0) {
        Err(GraphError::TypeMismatch {
            source_type,
            target_type,
        }) => {
            assert_eq!(source_type, "string");
            assert_eq!(target_type, "int");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
    assert_eq!(graph.node(&add).unwrap().node_uids[0], None);
}

#[test]
fn test_connect_accepts_subtypes_and_object() {
    let mut graph = empty_graph();
    let get_transform = graph
        .add_node("Component_GetTransform", Position::default())
        .unwrap();
    let other = graph
        .add_node("Component_GetTransform", Position::default())
        .unwrap();
    let log = graph.add_node("Debug_Log", Position::default()).unwrap();

    // Transform derives from Component
    assert!(graph.connect(&get_transform, 0, &other, 0).is_ok());
    // Everything is assignable to object
    assert!(graph.connect(&get_transform, 0, &log, 0).is_ok());
}

#[test]
fn test_connect_allows_component_to_event_receiver() {
    let mut graph = empty_graph();
    let get_component = graph
        .add_node("GameObject_GetComponent", Position::default())
        .unwrap();
    let send = graph
        .add_node("UdonBehaviour_SendCustomEvent", Position::default())
        .unwrap();

    assert!(graph.connect(&get_component, 0, &send, 0).is_ok());
}

#[test]
fn test_connect_reports_missing_ports() {
    let mut graph = empty_graph();
    let a = graph.add_node("Const_Int", Position::default()).unwrap();
    let add = graph.add_node("Int_Add", Position::default()).unwrap();

    assert!(matches!(
        graph.connect(&a, 3, &add, 0),
        Err(GraphError::SlotOutOfRange { port: "output", .. })
    ));
    assert!(matches!(
        graph.connect(&a, 0, &add, 2),
        Err(GraphError::SlotOutOfRange { port: "input", .. })
    ));
    assert!(matches!(
        graph.connect(&NodeId::from("nope"), 0, &add, 0),
        Err(GraphError::NodeNotFound(_))
    ));
}

#[test]
fn test_getter_output_resolves_to_variable_type() {
    let (mut graph, _variable, getter, _setter) = create_count_graph();
    assert_eq!(graph.output_type(&getter, 0).unwrap(), "int");

    let add = graph.add_node("Int_Add", Position::default()).unwrap();
    let concat = graph.add_node("String_Concat", Position::default()).unwrap();
    assert!(graph.connect(&getter, 0, &add, 0).is_ok());
    assert!(graph.connect(&getter, 0, &concat, 0).is_err());
}

#[test]
fn test_connect_flow_requires_flow_input() {
    let mut graph = empty_graph();
    let start = graph.add_node("Event_Start", Position::default()).unwrap();
    let update = graph.add_node("Event_Update", Position::default()).unwrap();
    let log = graph.add_node("Debug_Log", Position::default()).unwrap();

    assert_eq!(
        graph.connect_flow(&start, 0, &update),
        Err(GraphError::NoFlowInput(update.clone()))
    );
    assert!(matches!(
        graph.connect_flow(&start, 1, &log),
        Err(GraphError::SlotOutOfRange { .. })
    ));

    graph.connect_flow(&start, 0, &log).expect("Failed to connect flow");
    assert_eq!(graph.node(&start).unwrap().flow_uids[0], Some(log.clone()));

    assert_eq!(graph.disconnect_flow(&start, 0).unwrap(), Some(log));
    assert_eq!(graph.node(&start).unwrap().flow_uids[0], None);
}

#[test]
fn test_disconnect_returns_previous_reference() {
    let mut graph = empty_graph();
    let a = graph.add_node("Const_Int", Position::default()).unwrap();
    let add = graph.add_node("Int_Add", Position::default()).unwrap();
    graph.connect(&a, 0, &add, 1).unwrap();

    assert_eq!(
        graph.disconnect(&add, 1).unwrap(),
        Some(DataRef::new(a, 0))
    );
    assert_eq!(graph.disconnect(&add, 1).unwrap(), None);
}

#[test]
fn test_set_value_checks_kind() {
    let mut graph = empty_graph();
    let constant = graph.add_node("Const_Float", Position::default()).unwrap();

    assert!(graph.set_value(&constant, 0, Value::Float(2.5)).is_ok());
    // Int literals are accepted for float slots
    assert!(graph.set_value(&constant, 0, Value::Int(3)).is_ok());
    assert!(matches!(
        graph.set_value(&constant, 0, Value::String("x".to_string())),
        Err(GraphError::InvalidValue { .. })
    ));
    assert!(matches!(
        graph.set_value(&constant, 1, Value::Float(1.0)),
        Err(GraphError::SlotOutOfRange { port: "value", .. })
    ));
}

#[test]
fn test_remove_node_clears_references() {
    let (mut graph, ids) = create_flow_chain(2);
    let a = graph.add_node("Const_Int", Position::default()).unwrap();
    graph.connect(&a, 0, &ids[1], 0).unwrap();
    let group = graph.add_group("logic", &[a.clone(), ids[1].clone()]);

    let removed = graph.remove_node(&ids[1]);
    assert_eq!(removed, vec![ids[1].clone()]);
    assert!(!graph.contains(&ids[1]));
    assert_eq!(graph.node(&ids[0]).unwrap().flow_uids[0], None);
    assert!(graph.nodes().iter().all(|n| !n.references(&ids[1])));

    let group = graph.groups().iter().find(|g| g.uid == group).unwrap();
    assert_eq!(group.contained, vec![a]);
}

#[test]
fn test_remove_variable_cascades_to_dependents() {
    let (mut graph, variable, getter, setter) = create_count_graph();
    let add = graph.add_node("Int_Add", Position::default()).unwrap();
    graph.connect(&getter, 0, &add, 0).unwrap();

    let removed = graph.remove_node(&variable);
    assert_eq!(removed.len(), 3);
    assert_eq!(removed.last(), Some(&variable));
    assert!(removed.contains(&getter) && removed.contains(&setter));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.node(&add).unwrap().node_uids[0], None);
}

#[test]
fn test_compile_orders_variables_first() {
    let mut graph = empty_graph();
    let start = graph.add_node("Event_Start", Position::default()).unwrap();
    let comment = graph.add_node("Comment", Position::default()).unwrap();
    let first = graph.add_variable("int", "first", false).unwrap();
    let log = graph.add_node("Debug_Log", Position::default()).unwrap();
    let second = graph.add_variable("string", "second", true).unwrap();

    let program = graph.compile();
    let order: Vec<&NodeId> = program.node_ids().collect();
    assert_eq!(order, vec![&first, &second, &start, &log]);
    assert!(!order.contains(&&comment));
}

#[test]
fn test_compile_never_emits_dangling_references() {
    let mut log = raw_node("log", "Debug_Log");
    log.node_values = vec![Value::Null];
    log.node_uids = vec![Some(DataRef::new(NodeId::from("missing"), 0))];
    log.flow_uids = vec![Some(NodeId::from("gone"))];
    let mut start = raw_node("start", "Event_Start");
    start.flow_uids = vec![Some(NodeId::from("log"))];
    let unknown = raw_node("weird", "Not_A_Type");
    let data = GraphData {
        nodes: vec![start, log, unknown],
        ..Default::default()
    };

    let graph = Graph::from_data(registry(), data);
    let program = graph.compile();

    let ids: Vec<&NodeId> = program.node_ids().collect();
    assert_eq!(ids.len(), 2);
    for node in &program.nodes {
        for reference in node.node_uids.iter().flatten() {
            assert!(ids.contains(&&reference.node));
        }
        for target in node.flow_uids.iter().flatten() {
            assert!(ids.contains(&target));
        }
    }
    assert_eq!(program.nodes[0].flow_uids[0], Some(NodeId::from("log")));
}

#[test]
fn test_compile_sizes_reference_arrays_to_type() {
    let mut log = raw_node("log", "Debug_Log");
    log.flow_uids = vec![None, None, Some(NodeId::from("log"))];
    let data = GraphData {
        nodes: vec![log],
        ..Default::default()
    };

    let graph = Graph::from_data(registry(), data);
    let program = graph.compile();
    assert_eq!(program.nodes[0].node_uids, vec![None]);
    assert_eq!(program.nodes[0].flow_uids, vec![None]);
    // The stored data is left for the repair pass
    assert_eq!(graph.node(&NodeId::from("log")).unwrap().flow_uids.len(), 3);
}

#[test]
fn test_compile_with_reports_assembler_failure() {
    let (graph, _) = create_flow_chain(1);

    let status = graph.compile_with(&FailingAssembler);
    assert!(matches!(status, CompileStatus::Failed { .. }));
    assert!(!status.is_compiled());

    match graph.compile_with(&ListingAssembler) {
        CompileStatus::Compiled { assembly } => {
            assert_eq!(assembly.lines().count(), 2);
            assert!(assembly.contains("Event_Start"));
        }
        other => panic!("Expected Compiled, got {:?}", other),
    }
}

#[test]
fn test_compiled_graph_artifact_round_trip() {
    let (graph, _) = create_flow_chain(3);
    let program = graph.compile();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("program.bin");
    let path = path.to_str().unwrap();
    program.save(path).expect("Failed to save artifact");

    let loaded = CompiledGraph::from_file(path).expect("Failed to load artifact");
    assert_eq!(loaded, program);
    assert!(CompiledGraph::from_bytes(&[0xff, 0x00]).is_err());
}

#[test]
fn test_validate_reports_and_repair_fixes() {
    let mut log = raw_node("log", "Debug_Log");
    log.node_values = vec![Value::Null];
    log.node_uids = vec![Some(DataRef::new(NodeId::from("missing"), 0))];
    // Wrong flow slot count
    log.flow_uids = vec![];
    let data = GraphData {
        nodes: vec![
            raw_variable("var", "hp"),
            raw_change_event("on1", "var"),
            raw_change_event("on2", "var"),
            raw_change_event("orphan", "nothing"),
            log,
            raw_node("weird", "Not_A_Type"),
        ],
        ..Default::default()
    };
    let mut graph = Graph::from_data(registry(), data);

    let issues = graph.validate();
    let kinds: Vec<&IssueKind> = issues.iter().map(|i| &i.kind).collect();
    assert!(kinds.contains(&&IssueKind::DuplicateChangeEvent {
        variable: NodeId::from("var")
    }));
    assert!(kinds.contains(&&IssueKind::MissingVariable));
    assert!(kinds.contains(&&IssueKind::UnknownType {
        type_name: "Not_A_Type".to_string()
    }));
    assert!(kinds.iter().any(|k| matches!(k, IssueKind::DanglingDataRef { slot: 0, .. })));
    assert!(kinds.iter().any(|k| matches!(k, IssueKind::SlotCountMismatch { .. })));
    assert!(issues.iter().all(|i| i.select.is_some() && i.fix.is_some()));

    let fixed = graph.repair();
    assert!(!fixed.is_empty());
    assert!(graph.validate().is_empty());
    assert!(graph.contains(&NodeId::from("on1")));
    assert!(!graph.contains(&NodeId::from("on2")));
    assert!(!graph.contains(&NodeId::from("orphan")));
    assert!(!graph.contains(&NodeId::from("weird")));
    assert_eq!(graph.node(&NodeId::from("log")).unwrap().flow_uids, vec![None]);

    // A second pass has nothing left to do
    assert!(graph.repair().is_empty());
}

#[test]
fn test_apply_fix_is_harmless_when_repeated() {
    let mut graph = empty_graph();
    let log = graph.add_node("Debug_Log", Position::default()).unwrap();
    let fix = FixCommand::ClearDataRef {
        node: log.clone(),
        slot: 0,
    };
    assert!(!graph.apply_fix(&fix));
    assert!(!graph.apply_fix(&FixCommand::RemoveNode {
        node: NodeId::from("nope")
    }));
    assert!(graph.apply_fix(&FixCommand::RemoveNode { node: log.clone() }));
    assert!(!graph.apply_fix(&FixCommand::RemoveNode { node: log }));
}

#[test]
fn test_graph_data_json_round_trip() {
    let (graph, _variable, _getter, _setter) = create_count_graph();
    let json = graph.data().to_json().expect("Failed to serialize");
    let data = GraphData::from_json(&json).expect("Failed to parse");

    let reloaded = Graph::from_data(registry(), data);
    assert_eq!(reloaded.data(), graph.data());
    assert_eq!(reloaded.variables(), graph.variables());
}
