/// How the graph core treats a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Ordinary,
    Event,
    Constant,
    Control,
    Variable,
    Getter,
    Setter,
    ChangeEvent,
    Comment,
}

impl NodeKind {
    /// Nodes that point at a variable through value slot 0.
    pub fn references_variable(self) -> bool {
        matches!(
            self,
            NodeKind::Getter | NodeKind::Setter | NodeKind::ChangeEvent
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortDefinition {
    pub name: String,
    pub type_name: String,
}

impl PortDefinition {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

/// Everything the graph needs to know about a node type.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefinition {
    pub full_name: String,
    pub kind: NodeKind,
    /// Data inputs, one `node_uids` slot each.
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
    pub flow_input: bool,
    /// Flow output names, one `flow_uids` slot each.
    pub flow_outputs: Vec<String>,
    /// Leading value slots that do not back a data input, such as a
    /// constant's literal or a getter's variable id.
    pub values: Vec<PortDefinition>,
}

impl NodeDefinition {
    pub fn value_count(&self) -> usize {
        self.values.len() + self.inputs.len()
    }

    pub fn has_flow_ports(&self) -> bool {
        self.flow_input || !self.flow_outputs.is_empty()
    }

    /// Type names of every value slot: the leading values, then one literal
    /// fallback per data input.
    pub fn value_types(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .chain(self.inputs.iter())
            .map(|p| p.type_name.as_str())
    }
}
