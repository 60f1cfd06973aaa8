use super::Graph;
use crate::data::{NodeData, NodeId, Value};
use crate::error::{ArtifactError, AssemblerError};
use crate::registry::NodeKind;
use ahash::AHashSet;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::{Read, Write};

/// The ordered node list handed to the assembler.
///
/// Variables come first, every other node follows in collection order, and
/// every reference resolves to a node in the list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompiledGraph {
    pub nodes: Vec<NodeData>,
}

impl CompiledGraph {
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.uid)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Generic(format!("Serialization failed: {}", e)))
    }

    /// Saves the compiled program to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads a compiled program from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| {
            ArtifactError::Generic(format!("Could not open file '{}': {}", path, e))
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            ArtifactError::Generic(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(program, _)| program)
            .map_err(|e| ArtifactError::Generic(format!("Deserialization failed: {}", e)))
    }
}

/// The external assembler that turns a compiled node list into a program.
pub trait Assembler {
    fn assemble(&self, program: &CompiledGraph) -> Result<String, AssemblerError>;
}

/// Outcome of the last compile, shown to the user as a status indicator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CompileStatus {
    #[default]
    NotCompiled,
    Compiled { assembly: String },
    Failed { message: String },
}

impl CompileStatus {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileStatus::Compiled { .. })
    }
}

/// An assembler that writes one line per node. Useful for inspecting what the
/// real assembler would receive.
pub struct ListingAssembler;

impl Assembler for ListingAssembler {
    fn assemble(&self, program: &CompiledGraph) -> Result<String, AssemblerError> {
        let mut out = String::new();
        for (index, node) in program.nodes.iter().enumerate() {
            let values = node.node_values.iter().join(", ");
            let inputs = node
                .node_uids
                .iter()
                .map(|slot| match slot {
                    Some(r) => format!("{}:{}", r.node, r.output_index()),
                    None => "_".to_string(),
                })
                .join(", ");
            let flows = node
                .flow_uids
                .iter()
                .map(|slot| slot.as_ref().map_or("_".to_string(), NodeId::to_string))
                .join(", ");
            writeln!(
                out,
                "{:04} {} {} values=[{}] inputs=[{}] flow=[{}]",
                index, node.uid, node.full_name, values, inputs, flows
            )
            .map_err(|e| AssemblerError::Generic(e.to_string()))?;
        }
        Ok(out)
    }
}

impl Graph {
    /// Produces the node list the assembler accepts.
    ///
    /// Comments and nodes of unregistered types are left out. Reference
    /// arrays are sized to the node's type, and any data or flow reference
    /// that does not resolve to a node in the output is cleared, so the
    /// assembler never sees a dangling id.
    pub fn compile(&self) -> CompiledGraph {
        let included: Vec<&NodeData> = self
            .nodes()
            .iter()
            .filter(|node| match self.definition_of(node) {
                Some(definition) => definition.kind != NodeKind::Comment,
                None => {
                    log::warn!(
                        "Skipping node '{}' of unknown type '{}' during compile",
                        node.uid,
                        node.full_name
                    );
                    false
                }
            })
            .collect();
        let present: AHashSet<&NodeId> = included.iter().map(|n| &n.uid).collect();

        let nodes = included
            .iter()
            .sorted_by_key(|node| !node.is_variable())
            .map(|node| {
                let mut node = (*node).clone();
                if let Some(definition) = self.definition_of(&node) {
                    node.resize_slots(definition.inputs.len(), definition.flow_outputs.len());
                    let values = super::value_slot_count(definition);
                    if node.node_values.len() < values {
                        node.node_values.resize(values, Value::Null);
                    }
                }
                for slot in node.node_uids.iter_mut() {
                    if slot.as_ref().is_some_and(|r| !present.contains(&r.node)) {
                        log::debug!("Dropping dangling data reference in '{}'", node.uid);
                        *slot = None;
                    }
                }
                for slot in node.flow_uids.iter_mut() {
                    if slot.as_ref().is_some_and(|f| !present.contains(f)) {
                        log::debug!("Dropping dangling flow reference in '{}'", node.uid);
                        *slot = None;
                    }
                }
                node
            })
            .collect();

        CompiledGraph { nodes }
    }

    /// Compiles and hands the result to `assembler`. Assembler failures are
    /// reported through the returned status, never propagated.
    pub fn compile_with(&self, assembler: &dyn Assembler) -> CompileStatus {
        let program = self.compile();
        match assembler.assemble(&program) {
            Ok(assembly) => CompileStatus::Compiled { assembly },
            Err(e) => {
                log::error!("Assembly failed: {}", e);
                CompileStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
