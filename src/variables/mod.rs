//! Variables and the nodes that read, write or watch them.
//!
//! A variable is a node whose type name starts with `Variable_`. Getters,
//! setters and change events reference it by id through value slot 0, so a
//! rename only has to refresh their titles.

mod naming;
mod sync;

pub use naming::*;
pub use sync::*;

use crate::data::{NodeData, NodeId, Position, Value};
use crate::error::GraphError;
use crate::graph::Graph;
use crate::registry::{NodeKind, variable_type_name, variable_value_type};
use ahash::AHashSet;

pub const DEFAULT_SLOT: usize = 0;
pub const NAME_SLOT: usize = 1;
pub const PUBLIC_SLOT: usize = 2;
pub const SYNC_SLOT: usize = 3;
pub(crate) const VARIABLE_SLOTS: usize = 4;

pub const GETTER_TYPE: &str = "Get_Variable";
pub const SETTER_TYPE: &str = "Set_Variable";
pub const CHANGE_EVENT_TYPE: &str = "Event_OnVariableChange";

/// A variable as shown in the variables list.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub id: NodeId,
    pub name: String,
    pub value_type: String,
    pub default: Value,
    pub public: bool,
    pub sync: Option<SyncMode>,
}

impl VariableInfo {
    fn from_node(node: &NodeData) -> Option<Self> {
        let value_type = variable_value_type(&node.full_name)?;
        let slot = |index: usize| node.node_values.get(index).cloned().unwrap_or_default();
        Some(Self {
            id: node.uid.clone(),
            name: slot(NAME_SLOT).as_str().unwrap_or_default().to_string(),
            value_type: value_type.to_string(),
            default: slot(DEFAULT_SLOT),
            public: slot(PUBLIC_SLOT).as_bool().unwrap_or(false),
            sync: SyncMode::from_value(&slot(SYNC_SLOT)),
        })
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved(&self.name)
    }
}

/// All variables of the graph, user-visible ones first and reserved ones
/// after, each group in collection order.
pub fn derive_variables(graph: &Graph) -> Vec<VariableInfo> {
    let (user, reserved): (Vec<VariableInfo>, Vec<VariableInfo>) = graph
        .nodes()
        .iter()
        .filter_map(VariableInfo::from_node)
        .partition(|v| !v.is_reserved());
    user.into_iter().chain(reserved).collect()
}

/// The title a node displays, derived from its kind and, for variable
/// accessors, the current variable name.
pub(crate) fn display_title(graph: &Graph, node: &NodeData) -> String {
    let Some(definition) = graph.definition_of(node) else {
        return node.full_name.clone();
    };
    let variable_name = || {
        node.variable_ref()
            .and_then(|id| graph.variable_name(&id).map(str::to_string))
            .unwrap_or_else(|| "<missing>".to_string())
    };
    match definition.kind {
        NodeKind::Variable => node
            .node_values
            .get(NAME_SLOT)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        NodeKind::Getter => format!("Get {}", variable_name()),
        NodeKind::Setter => format!("Set {}", variable_name()),
        NodeKind::ChangeEvent => format!("On {} Changed", variable_name()),
        NodeKind::Comment => node
            .node_values
            .first()
            .and_then(Value::as_str)
            .unwrap_or("Comment")
            .to_string(),
        _ => node.full_name.replace('_', " "),
    }
}

impl Graph {
    pub fn variables(&self) -> Vec<VariableInfo> {
        derive_variables(self)
    }

    pub fn variable(&self, id: &NodeId) -> Option<VariableInfo> {
        self.node(id).and_then(VariableInfo::from_node)
    }

    pub fn variable_name(&self, id: &NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.is_variable())
            .and_then(|n| n.node_values.get(NAME_SLOT))
            .and_then(Value::as_str)
    }

    pub fn find_variable(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .iter()
            .find(|n| {
                n.is_variable() && n.node_values.get(NAME_SLOT).and_then(Value::as_str) == Some(name)
            })
            .map(|n| n.uid.clone())
    }

    /// Names a new or renamed variable must not take. Reserved names only
    /// count when the candidate is itself reserved.
    pub(crate) fn colliding_names(&self, candidate: &str, exclude: Option<&NodeId>) -> AHashSet<String> {
        let include_reserved = is_reserved(candidate);
        self.nodes()
            .iter()
            .filter(|n| n.is_variable() && Some(&n.uid) != exclude)
            .filter_map(|n| n.node_values.get(NAME_SLOT).and_then(Value::as_str))
            .filter(|name| include_reserved || !is_reserved(name))
            .map(str::to_string)
            .collect()
    }

    /// Creates a variable of a registered value type. The name is sanitized
    /// and made unique; the name actually used can be read back through
    /// [`Graph::variable_name`].
    pub fn add_variable(
        &mut self,
        value_type: &str,
        name: &str,
        public: bool,
    ) -> Result<NodeId, GraphError> {
        let id = self.add_node(&variable_type_name(value_type), Position::default())?;
        let sanitized = sanitize_identifier(name);
        let actual = unique_name(&sanitized, &self.colliding_names(&sanitized, Some(&id)));
        if let Some(node) = self.node_mut(&id) {
            node.node_values[NAME_SLOT] = Value::String(actual);
            node.node_values[PUBLIC_SLOT] = Value::Bool(public);
        }
        self.refresh_title(&id);
        Ok(id)
    }

    /// Renames a variable and returns the name actually assigned.
    ///
    /// The requested name is sanitized; if another variable already uses it
    /// a numeric suffix is bumped until it is unique. Renaming to the current
    /// name changes nothing. Every getter, setter and change event of the
    /// variable gets its title refreshed.
    pub fn rename_variable(&mut self, id: &NodeId, new_name: &str) -> Result<String, GraphError> {
        let current = self
            .require_variable(id)?
            .node_values
            .get(NAME_SLOT)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let sanitized = sanitize_identifier(new_name);
        if sanitized == current {
            return Ok(current);
        }

        let actual = unique_name(&sanitized, &self.colliding_names(&sanitized, Some(id)));
        if let Some(node) = self.node_mut(id) {
            if node.node_values.len() < VARIABLE_SLOTS {
                node.node_values.resize(VARIABLE_SLOTS, Value::Null);
            }
            node.node_values[NAME_SLOT] = Value::String(actual.clone());
        }
        self.refresh_title(id);
        self.refresh_dependent_titles(id);
        log::debug!("Renamed variable '{}' from '{}' to '{}'", id, current, actual);
        Ok(actual)
    }

    /// Removes a variable together with its getters, setters and change
    /// events.
    pub fn remove_variable(&mut self, id: &NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.require_variable(id)?;
        Ok(self.remove_node(id))
    }

    /// Sets or clears (`None`) the sync mode of a variable.
    pub fn set_sync_mode(&mut self, id: &NodeId, mode: Option<SyncMode>) -> Result<(), GraphError> {
        let value_type = variable_value_type(&self.require_variable(id)?.full_name)
            .unwrap_or_default()
            .to_string();
        if let Some(mode) = mode.filter(|m| !m.supported_by(&value_type)) {
            return Err(GraphError::UnsupportedSyncMode {
                value_type,
                mode: mode.to_string(),
            });
        }
        if let Some(node) = self.node_mut(id) {
            if node.node_values.len() < VARIABLE_SLOTS {
                node.node_values.resize(VARIABLE_SLOTS, Value::Null);
            }
            node.node_values[SYNC_SLOT] =
                mode.map_or(Value::Null, |m| Value::String(m.as_str().to_string()));
        }
        Ok(())
    }

    /// The change event watching `variable`, if any.
    pub fn change_event_for(&self, variable: &NodeId) -> Option<NodeId> {
        self.dependents_of(variable)
            .into_iter()
            .find(|id| self.kind_of(id) == Some(NodeKind::ChangeEvent))
    }

    /// Adds the change event for `variable`. Each variable has at most one;
    /// asking for a second logs a warning and returns `Ok(None)` without
    /// touching the graph.
    pub fn add_change_event(
        &mut self,
        variable: &NodeId,
        position: Position,
    ) -> Result<Option<NodeId>, GraphError> {
        self.require_variable(variable)?;
        if let Some(existing) = self.change_event_for(variable) {
            log::warn!(
                "Variable '{}' already has change event '{}'; not adding another",
                variable,
                existing
            );
            return Ok(None);
        }
        self.add_accessor(CHANGE_EVENT_TYPE, variable, position)
            .map(Some)
    }

    pub fn add_getter(&mut self, variable: &NodeId, position: Position) -> Result<NodeId, GraphError> {
        self.require_variable(variable)?;
        self.add_accessor(GETTER_TYPE, variable, position)
    }

    pub fn add_setter(&mut self, variable: &NodeId, position: Position) -> Result<NodeId, GraphError> {
        self.require_variable(variable)?;
        self.add_accessor(SETTER_TYPE, variable, position)
    }

    fn add_accessor(
        &mut self,
        type_name: &str,
        variable: &NodeId,
        position: Position,
    ) -> Result<NodeId, GraphError> {
        let id = self.add_node(type_name, position)?;
        if let Some(node) = self.node_mut(&id) {
            node.node_values[0] = Value::String(variable.to_string());
        }
        self.refresh_title(&id);
        Ok(id)
    }

    fn require_variable(&self, id: &NodeId) -> Result<&NodeData, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        if node.is_variable() {
            Ok(node)
        } else {
            Err(GraphError::NotAVariable(id.clone()))
        }
    }

    pub(crate) fn refresh_dependent_titles(&mut self, variable: &NodeId) {
        for dependent in self.dependents_of(variable) {
            self.refresh_title(&dependent);
        }
    }
}
