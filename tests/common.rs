//! Common test utilities for building graphs, scenes and assemblers.
use std::cell::Cell;
use std::sync::Arc;
use udongraph::error::AssemblerError;
use udongraph::network_ids::NetworkScene;
use udongraph::prelude::*;

/// The built-in registry, shared the way an editor shares it between graphs.
#[allow(dead_code)]
pub fn registry() -> Arc<NodeRegistry> {
    Arc::new(NodeRegistry::with_defaults())
}

#[allow(dead_code)]
pub fn empty_graph() -> Graph {
    Graph::new(registry())
}

/// A graph with one int variable `count`, a getter and a setter for it.
///
/// Returns `(graph, variable, getter, setter)`.
#[allow(dead_code)]
pub fn create_count_graph() -> (Graph, NodeId, NodeId, NodeId) {
    let mut graph = empty_graph();
    let variable = graph
        .add_variable("int", "count", false)
        .expect("Failed to add variable");
    let getter = graph
        .add_getter(&variable, Position::new(0.0, 100.0))
        .expect("Failed to add getter");
    let setter = graph
        .add_setter(&variable, Position::new(200.0, 100.0))
        .expect("Failed to add setter");
    (graph, variable, getter, setter)
}

/// A linear flow `Start -> Log -> Log -> ...` with `logs` log nodes.
///
/// Returns the graph and the ids in flow order, the event first.
#[allow(dead_code)]
pub fn create_flow_chain(logs: usize) -> (Graph, Vec<NodeId>) {
    let mut graph = empty_graph();
    let mut ids = vec![
        graph
            .add_node("Event_Start", Position::new(0.0, 0.0))
            .expect("Failed to add event"),
    ];
    for i in 0..logs {
        let id = graph
            .add_node("Debug_Log", Position::new(200.0 * (i + 1) as f32, 0.0))
            .expect("Failed to add log");
        let previous = ids.last().cloned().expect("chain is never empty");
        graph
            .connect_flow(&previous, 0, &id)
            .expect("Failed to connect flow");
        ids.push(id);
    }
    (graph, ids)
}

/// A scene with three networked objects and one without an id.
///
/// | path  | id   | types              |
/// |-------|------|--------------------|
/// | A/B   | 5    | Foo                |
/// | A/D   | 7    | Foo, Bar           |
/// | A/E   | 9    | Baz                |
/// | A/F   | none | Foo                |
#[allow(dead_code)]
pub fn create_scene() -> NetworkScene {
    let mut scene = NetworkScene::new();
    scene.add("A/B", &["Foo"], Some(5));
    scene.add("A/D", &["Foo", "Bar"], Some(7));
    scene.add("A/E", &["Baz"], Some(9));
    scene.add("A/F", &["Foo"], None);
    scene
}

/// An assembler that always fails.
#[allow(dead_code)]
pub struct FailingAssembler;

impl Assembler for FailingAssembler {
    fn assemble(&self, program: &CompiledGraph) -> std::result::Result<String, AssemblerError> {
        match program.nodes.first() {
            Some(node) => Err(AssemblerError::NodeRejected {
                node_id: node.uid.clone(),
                message: "unsupported".to_string(),
            }),
            None => Err(AssemblerError::Generic("empty program".to_string())),
        }
    }
}

/// An assembler that counts how often it ran and succeeds with the node count.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingAssembler {
    pub calls: Cell<usize>,
}

impl Assembler for CountingAssembler {
    fn assemble(&self, program: &CompiledGraph) -> std::result::Result<String, AssemblerError> {
        self.calls.set(self.calls.get() + 1);
        Ok(format!("{} nodes", program.nodes.len()))
    }
}
