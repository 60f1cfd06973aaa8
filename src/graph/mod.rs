//! The graph model: owns one program's node data and keeps it consistent
//! under interactive edits.

use crate::data::{
    CommentData, DataRef, GraphData, GroupData, NodeData, NodeId, Position, Value, ValueKind,
};
use crate::error::GraphError;
use crate::registry::{
    NodeDefinition, NodeKind, NodeRegistry, OBJECT_TYPE, VARIABLE_TYPE, variable_value_type,
};
use crate::variables::{self, DEFAULT_VARIABLE_NAME, NAME_SLOT, SYNC_SLOT, VARIABLE_SLOTS};
use ahash::AHashMap;
use std::sync::Arc;
use uuid::Uuid;

mod compile;
mod validation;

pub use compile::*;
pub use validation::*;

pub struct Graph {
    registry: Arc<NodeRegistry>,
    data: GraphData,
    /// Display titles as last refreshed. Variable renames rewrite the titles
    /// of every dependent node.
    titles: AHashMap<NodeId, String>,
}

impl Graph {
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self {
            registry,
            data: GraphData::default(),
            titles: AHashMap::new(),
        }
    }

    /// Wraps loaded data. Structural problems are tolerated here and only
    /// reported; [`Graph::repair`] fixes them.
    pub fn from_data(registry: Arc<NodeRegistry>, data: GraphData) -> Self {
        let mut graph = Self {
            registry,
            data,
            titles: AHashMap::new(),
        };
        graph.refresh_all_titles();
        let issues = graph.validate();
        if !issues.is_empty() {
            log::warn!(
                "Loaded graph has {} structural issue(s); they will be repaired on reload",
                issues.len()
            );
        }
        graph
    }

    /// Replaces the whole node store, e.g. after the host restored an undo
    /// snapshot.
    pub fn replace_data(&mut self, data: GraphData) {
        self.data = data;
        self.refresh_all_titles();
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    pub fn data(&self) -> &GraphData {
        &self.data
    }

    pub fn into_data(self) -> GraphData {
        self.data
    }

    pub fn nodes(&self) -> &[NodeData] {
        &self.data.nodes
    }

    pub fn len(&self) -> usize {
        self.data.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&NodeData> {
        self.data.nodes.iter().find(|n| &n.uid == id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut NodeData> {
        self.data.nodes.iter_mut().find(|n| &n.uid == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn definition_of(&self, node: &NodeData) -> Option<&NodeDefinition> {
        self.registry.get(&node.full_name)
    }

    pub fn kind_of(&self, id: &NodeId) -> Option<NodeKind> {
        self.node(id)
            .and_then(|n| self.definition_of(n))
            .map(|d| d.kind)
    }

    /// Resolves a data reference, treating dangling ids as unconnected.
    pub fn resolve(&self, reference: &DataRef) -> Option<&NodeData> {
        self.node(&reference.node)
    }

    pub fn title(&self, id: &NodeId) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    pub fn comments(&self) -> &[CommentData] {
        &self.data.comments
    }

    pub fn groups(&self) -> &[GroupData] {
        &self.data.groups
    }

    /// Creates a node of a registered type with every slot unconnected and
    /// every value at its type's default.
    pub fn add_node(&mut self, type_name: &str, position: Position) -> Result<NodeId, GraphError> {
        let definition = self.registry.definition(type_name)?;
        let mut node = NodeData::new(type_name, position);
        node.node_values = definition
            .value_types()
            .map(|t| ValueKind::from_type_name(t).default_value())
            .collect();
        node.node_values.resize(value_slot_count(definition), Value::Null);
        node.resize_slots(definition.inputs.len(), definition.flow_outputs.len());

        if definition.kind == NodeKind::Variable {
            let name = variables::unique_name(
                DEFAULT_VARIABLE_NAME,
                &self.colliding_names(DEFAULT_VARIABLE_NAME, None),
            );
            node.node_values[NAME_SLOT] = Value::String(name);
            node.node_values[SYNC_SLOT] = Value::Null;
        }

        while self.contains(&node.uid) {
            node.uid = NodeId::generate();
        }
        let id = node.uid.clone();
        self.data.nodes.push(node);
        self.refresh_title(&id);
        log::debug!("Added node '{}' ({})", id, type_name);
        Ok(id)
    }

    /// Inserts an already-built node, normalizing its slot arrays to the
    /// type definition. The caller guarantees the id is fresh.
    pub(crate) fn insert_node(&mut self, mut node: NodeData) {
        if let Some(definition) = self.registry.get(&node.full_name) {
            node.resize_slots(definition.inputs.len(), definition.flow_outputs.len());
            node.node_values
                .resize(value_slot_count(definition), Value::Null);
        }
        let id = node.uid.clone();
        self.data.nodes.push(node);
        self.refresh_title(&id);
    }

    /// Edits one value slot. Variable names go through the rename path so
    /// collisions are still resolved.
    pub fn set_value(&mut self, id: &NodeId, index: usize, value: Value) -> Result<(), GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        if index >= node.node_values.len() {
            return Err(GraphError::SlotOutOfRange {
                node_id: id.clone(),
                port: "value",
                index,
                available: node.node_values.len(),
            });
        }
        if node.is_variable() && index == NAME_SLOT {
            let name = value.as_str().unwrap_or_default().to_string();
            self.rename_variable(id, &name)?;
            return Ok(());
        }

        let declared = self
            .definition_of(node)
            .and_then(|d| d.value_types().nth(index))
            .unwrap_or(OBJECT_TYPE);
        let expected = self.resolve_port_type(node, declared);
        if !ValueKind::from_type_name(&expected).accepts(&value) {
            return Err(GraphError::InvalidValue {
                node_id: id.clone(),
                index,
                expected,
            });
        }

        if let Some(node) = self.node_mut(id) {
            node.node_values[index] = value;
        }
        Ok(())
    }

    /// Type of a data output, with variable placeholders resolved.
    pub fn output_type(&self, id: &NodeId, index: usize) -> Result<String, GraphError> {
        let (node, definition) = self.node_with_definition(id)?;
        let port = definition
            .outputs
            .get(index)
            .ok_or_else(|| GraphError::SlotOutOfRange {
                node_id: id.clone(),
                port: "output",
                index,
                available: definition.outputs.len(),
            })?;
        Ok(self.resolve_port_type(node, &port.type_name))
    }

    /// Type of a data input, with variable placeholders resolved.
    pub fn input_type(&self, id: &NodeId, index: usize) -> Result<String, GraphError> {
        let (node, definition) = self.node_with_definition(id)?;
        let port = definition
            .inputs
            .get(index)
            .ok_or_else(|| GraphError::SlotOutOfRange {
                node_id: id.clone(),
                port: "input",
                index,
                available: definition.inputs.len(),
            })?;
        Ok(self.resolve_port_type(node, &port.type_name))
    }

    /// Connects a data output to a data input, replacing whatever produced
    /// that input before. Reconnecting an identical edge does nothing.
    pub fn connect(
        &mut self,
        source: &NodeId,
        source_output: usize,
        dest: &NodeId,
        dest_input: usize,
    ) -> Result<(), GraphError> {
        let source_type = self.output_type(source, source_output)?;
        let target_type = self.input_type(dest, dest_input)?;
        let reference = DataRef::new(source.clone(), source_output);

        let existing = self
            .node(dest)
            .and_then(|n| n.node_uids.get(dest_input))
            .cloned()
            .flatten();
        if existing.as_ref() == Some(&reference) {
            return Ok(());
        }

        if !self
            .registry
            .types()
            .is_assignable(&source_type, &target_type)
        {
            return Err(GraphError::TypeMismatch {
                source_type,
                target_type,
            });
        }

        let (_, dest_definition) = self.node_with_definition(dest)?;
        let (input_count, flow_count) = (
            dest_definition.inputs.len(),
            dest_definition.flow_outputs.len(),
        );
        if let Some(node) = self.node_mut(dest) {
            node.resize_slots(input_count, flow_count);
            node.node_uids[dest_input] = Some(reference);
        }
        log::debug!(
            "Connected {}[{}] -> {}[{}]",
            source,
            source_output,
            dest,
            dest_input
        );
        Ok(())
    }

    /// Points a flow output at the next node to execute, replacing the
    /// previous target of that slot.
    pub fn connect_flow(
        &mut self,
        source: &NodeId,
        source_slot: usize,
        dest: &NodeId,
    ) -> Result<(), GraphError> {
        let (_, source_definition) = self.node_with_definition(source)?;
        let (input_count, flow_count) = (
            source_definition.inputs.len(),
            source_definition.flow_outputs.len(),
        );
        if source_slot >= flow_count {
            return Err(GraphError::SlotOutOfRange {
                node_id: source.clone(),
                port: "flow output",
                index: source_slot,
                available: flow_count,
            });
        }
        let (_, dest_definition) = self.node_with_definition(dest)?;
        if !dest_definition.flow_input {
            return Err(GraphError::NoFlowInput(dest.clone()));
        }

        if let Some(node) = self.node_mut(source) {
            node.resize_slots(input_count, flow_count);
            node.flow_uids[source_slot] = Some(dest.clone());
        }
        log::debug!("Connected flow {}[{}] -> {}", source, source_slot, dest);
        Ok(())
    }

    /// Clears a data input. Returns the reference that was removed.
    pub fn disconnect(
        &mut self,
        dest: &NodeId,
        dest_input: usize,
    ) -> Result<Option<DataRef>, GraphError> {
        let node = self
            .node_mut(dest)
            .ok_or_else(|| GraphError::NodeNotFound(dest.clone()))?;
        let available = node.node_uids.len();
        let slot = node
            .node_uids
            .get_mut(dest_input)
            .ok_or_else(|| GraphError::SlotOutOfRange {
                node_id: dest.clone(),
                port: "input",
                index: dest_input,
                available,
            })?;
        Ok(slot.take())
    }

    /// Clears a flow output. Returns the node it pointed at.
    pub fn disconnect_flow(
        &mut self,
        source: &NodeId,
        source_slot: usize,
    ) -> Result<Option<NodeId>, GraphError> {
        let node = self
            .node_mut(source)
            .ok_or_else(|| GraphError::NodeNotFound(source.clone()))?;
        let available = node.flow_uids.len();
        let slot = node
            .flow_uids
            .get_mut(source_slot)
            .ok_or_else(|| GraphError::SlotOutOfRange {
                node_id: source.clone(),
                port: "flow output",
                index: source_slot,
                available,
            })?;
        Ok(slot.take())
    }

    /// Removes a node and every reference to it. Removing a variable first
    /// removes its getters, setters and change events. Returns the ids of all
    /// removed nodes, dependents first.
    pub fn remove_node(&mut self, id: &NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(id) else {
            log::warn!("Cannot remove node '{}': not in the graph", id);
            return Vec::new();
        };

        let mut removed = Vec::new();
        if node.is_variable() {
            for dependent in self.dependents_of(id) {
                removed.extend(self.remove_node(&dependent));
            }
        }

        self.data.nodes.retain(|n| &n.uid != id);
        for other in self.data.nodes.iter_mut() {
            other.clear_references_to(id);
        }
        for group in self.data.groups.iter_mut() {
            group.contained.retain(|member| member != id);
        }
        self.titles.remove(id);
        removed.push(id.clone());
        log::debug!("Removed node '{}'", id);
        removed
    }

    /// Getter, setter and change-event nodes pointing at `variable`.
    pub fn dependents_of(&self, variable: &NodeId) -> Vec<NodeId> {
        self.data
            .nodes
            .iter()
            .filter(|n| {
                self.definition_of(n)
                    .is_some_and(|d| d.kind.references_variable())
                    && n.variable_ref().as_ref() == Some(variable)
            })
            .map(|n| n.uid.clone())
            .collect()
    }

    pub fn add_comment(&mut self, text: &str, position: Position) -> String {
        let uid = Uuid::new_v4().to_string();
        self.data.comments.push(CommentData {
            uid: uid.clone(),
            text: text.to_string(),
            position,
        });
        uid
    }

    /// Groups existing nodes under a title. Unknown ids are left out.
    pub fn add_group(&mut self, title: &str, members: &[NodeId]) -> String {
        let uid = Uuid::new_v4().to_string();
        let contained = members
            .iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect();
        self.data.groups.push(GroupData {
            uid: uid.clone(),
            title: title.to_string(),
            contained,
        });
        uid
    }

    pub(crate) fn refresh_title(&mut self, id: &NodeId) {
        if let Some(title) = self.node(id).map(|n| variables::display_title(self, n)) {
            self.titles.insert(id.clone(), title);
        }
    }

    fn refresh_all_titles(&mut self) {
        self.titles = self
            .data
            .nodes
            .iter()
            .map(|n| (n.uid.clone(), variables::display_title(self, n)))
            .collect();
    }

    fn node_with_definition(
        &self,
        id: &NodeId,
    ) -> Result<(&NodeData, &NodeDefinition), GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let definition = self.registry.definition(&node.full_name)?;
        Ok((node, definition))
    }

    /// Replaces the variable placeholder with the referenced variable's value
    /// type. Unresolvable placeholders fall back to the root type.
    fn resolve_port_type(&self, node: &NodeData, declared: &str) -> String {
        if declared != VARIABLE_TYPE {
            return declared.to_string();
        }
        node.variable_ref()
            .and_then(|var| self.node(&var))
            .and_then(|var| variable_value_type(&var.full_name))
            .unwrap_or(OBJECT_TYPE)
            .to_string()
    }
}

/// Value slots a node of this type carries. Variables and the nodes bound to
/// one always have room for their reserved slots, whatever the definition
/// declares.
fn value_slot_count(definition: &NodeDefinition) -> usize {
    let reserved = match definition.kind {
        NodeKind::Variable => VARIABLE_SLOTS,
        kind if kind.references_variable() => 1,
        _ => 0,
    };
    definition.value_count().max(reserved)
}
