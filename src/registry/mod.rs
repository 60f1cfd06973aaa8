//! Explicit registration of node types and the type hierarchy.
//!
//! Node types are never discovered at runtime: the built-in catalog is
//! registered by [`NodeRegistry::with_defaults`] and anything else is added
//! through the [`NodeRegistryBuilder`].

use ahash::AHashMap;

mod builtin;
mod definition;
mod types;

pub use builtin::DEFAULT_VARIABLE_TYPES;
pub use definition::*;
pub use types::*;

use crate::error::GraphError;

/// Type-name prefix shared by all variable nodes.
pub const VARIABLE_PREFIX: &str = "Variable_";

pub struct NodeRegistry {
    definitions: AHashMap<String, NodeDefinition>,
    types: TypeHierarchy,
}

pub struct NodeRegistryBuilder {
    registry: NodeRegistry,
}

impl NodeRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::with_defaults(),
        }
    }

    /// Starts from an empty registry instead of the built-in catalog.
    pub fn empty() -> Self {
        Self {
            registry: NodeRegistry::empty(),
        }
    }

    pub fn with_definition(mut self, definition: NodeDefinition) -> Self {
        self.registry.register(definition);
        self
    }

    pub fn with_type(mut self, type_name: &str, parents: &[&str]) -> Self {
        self.registry.types.declare(type_name, parents);
        self
    }

    /// Registers `Variable_<type_name>` so variables of that type can be
    /// created.
    pub fn with_variable_type(mut self, type_name: &str) -> Self {
        self.registry.register_variable_type(type_name);
        self
    }

    pub fn build(self) -> NodeRegistry {
        self.registry
    }
}

impl Default for NodeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn builder() -> NodeRegistryBuilder {
        NodeRegistryBuilder::new()
    }

    pub fn empty() -> Self {
        Self {
            definitions: AHashMap::new(),
            types: TypeHierarchy::new(),
        }
    }

    /// The built-in node catalog, type hierarchy and variable types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (type_name, parents) in builtin::BUILTIN_TYPES {
            registry.types.declare(type_name, parents);
        }
        builtin::register_builtin_nodes(&mut registry);
        for type_name in DEFAULT_VARIABLE_TYPES {
            registry.register_variable_type(type_name);
        }
        registry
    }

    pub fn register(&mut self, definition: NodeDefinition) {
        self.definitions
            .insert(definition.full_name.clone(), definition);
    }

    fn register_variable_type(&mut self, type_name: &str) {
        if !self.types.contains(type_name) {
            self.types.declare(type_name, &[]);
        }
        self.register(NodeDefinition {
            full_name: variable_type_name(type_name),
            kind: NodeKind::Variable,
            values: vec![
                PortDefinition::new("default", type_name),
                PortDefinition::new("name", "string"),
                PortDefinition::new("public", "bool"),
                PortDefinition::new("sync", "string"),
            ],
            inputs: Vec::new(),
            outputs: Vec::new(),
            flow_input: false,
            flow_outputs: Vec::new(),
        });
    }

    pub fn get(&self, full_name: &str) -> Option<&NodeDefinition> {
        self.definitions.get(full_name)
    }

    pub fn definition(&self, full_name: &str) -> Result<&NodeDefinition, GraphError> {
        self.get(full_name)
            .ok_or_else(|| GraphError::UnknownType(full_name.to_string()))
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.definitions.contains_key(full_name)
    }

    pub fn types(&self) -> &TypeHierarchy {
        &self.types
    }

    /// Registered type names, sorted, for palettes and diagnostics.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// `Variable_<value_type>`.
pub fn variable_type_name(value_type: &str) -> String {
    format!("{}{}", VARIABLE_PREFIX, value_type)
}

/// The value type of a variable node type name, if it is one.
pub fn variable_value_type(full_name: &str) -> Option<&str> {
    full_name.strip_prefix(VARIABLE_PREFIX)
}
