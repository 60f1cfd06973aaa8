use ahash::{AHashMap, AHashSet};

/// Root of the type hierarchy. Every registered type derives from it.
pub const OBJECT_TYPE: &str = "object";
/// Base class of all scene components.
pub const COMPONENT_TYPE: &str = "Component";
/// Interface implemented by scripted behaviours that can receive events.
pub const EVENT_RECEIVER_TYPE: &str = "IUdonEventReceiver";
/// Placeholder port type resolved through the node's variable.
pub const VARIABLE_TYPE: &str = "T";

/// Parent links between registered type names, used for port assignability.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    parents: AHashMap<String, Vec<String>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `type_name` with the given direct supertypes.
    pub fn declare(&mut self, type_name: &str, parents: &[&str]) {
        let entry = self.parents.entry(type_name.to_string()).or_default();
        for parent in parents {
            if !entry.iter().any(|p| p == parent) {
                entry.push(parent.to_string());
            }
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        type_name == OBJECT_TYPE || self.parents.contains_key(type_name)
    }

    /// Whether `ancestor` is `type_name` itself or one of its transitive
    /// supertypes.
    pub fn is_subtype(&self, type_name: &str, ancestor: &str) -> bool {
        if type_name == ancestor || ancestor == OBJECT_TYPE {
            return true;
        }
        let mut visited = AHashSet::new();
        let mut stack = vec![type_name];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(parents) = self.parents.get(current) {
                for parent in parents {
                    if parent == ancestor {
                        return true;
                    }
                    stack.push(parent);
                }
            }
        }
        false
    }

    /// Whether an output of `source` may feed an input of `target`.
    ///
    /// Accepted when the types are identical, when either is a supertype of
    /// the other, or for the event-receiver/component pair.
    pub fn is_assignable(&self, source: &str, target: &str) -> bool {
        source == target
            || self.is_subtype(source, target)
            || self.is_subtype(target, source)
            || is_receiver_component_pair(source, target)
    }
}

/// Event receivers are connectable to and from component ports even though
/// neither type derives from the other.
fn is_receiver_component_pair(source: &str, target: &str) -> bool {
    matches!(
        (source, target),
        (EVENT_RECEIVER_TYPE, COMPONENT_TYPE) | (COMPONENT_TYPE, EVENT_RECEIVER_TYPE)
    )
}
