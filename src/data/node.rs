use super::value::Value;
use crate::registry::VARIABLE_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable node identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Position) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// A data-input reference: the producing node and which of its outputs feeds
/// this slot. A missing output index means the producer's first output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataRef {
    pub node: NodeId,
    #[serde(default)]
    pub output: Option<usize>,
}

impl DataRef {
    pub fn new(node: NodeId, output: usize) -> Self {
        Self {
            node,
            output: Some(output),
        }
    }

    pub fn output_index(&self) -> usize {
        self.output.unwrap_or(0)
    }
}

/// The serialized record of a single node.
///
/// Edges are not stored separately: `node_uids` holds one entry per data
/// input, `flow_uids` one entry per flow output. Both arrays always have the
/// length dictated by the node's type definition; unconnected slots are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub uid: NodeId,
    pub full_name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub node_values: Vec<Value>,
    #[serde(default)]
    pub node_uids: Vec<Option<DataRef>>,
    #[serde(default)]
    pub flow_uids: Vec<Option<NodeId>>,
}

impl NodeData {
    pub fn new(full_name: &str, position: Position) -> Self {
        Self {
            uid: NodeId::generate(),
            full_name: full_name.to_string(),
            position,
            node_values: Vec::new(),
            node_uids: Vec::new(),
            flow_uids: Vec::new(),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.full_name.starts_with(VARIABLE_PREFIX)
    }

    /// The id stored in value slot 0, used by getter, setter and change-event
    /// nodes to point at their variable.
    pub fn variable_ref(&self) -> Option<NodeId> {
        self.node_values
            .first()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(NodeId::from)
    }

    pub fn references(&self, id: &NodeId) -> bool {
        self.node_uids.iter().flatten().any(|r| &r.node == id)
            || self.flow_uids.iter().flatten().any(|f| f == id)
    }

    /// Clears every data and flow reference pointing at `id`. Returns how
    /// many slots were cleared.
    pub fn clear_references_to(&mut self, id: &NodeId) -> usize {
        let mut cleared = 0;
        for slot in self.node_uids.iter_mut() {
            if slot.as_ref().is_some_and(|r| &r.node == id) {
                *slot = None;
                cleared += 1;
            }
        }
        for slot in self.flow_uids.iter_mut() {
            if slot.as_ref() == Some(id) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Pads or truncates the reference arrays to the given slot counts.
    pub fn resize_slots(&mut self, data_inputs: usize, flow_outputs: usize) {
        self.node_uids.resize(data_inputs, None);
        self.flow_uids.resize(flow_outputs, None);
    }
}
