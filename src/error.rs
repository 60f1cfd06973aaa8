use crate::data::NodeId;
use thiserror::Error;

/// Errors raised by graph mutations that the caller asked for explicitly.
///
/// Structural problems found while *reading* a graph (dangling references,
/// stale slots) are never reported through this type; they are logged and
/// surfaced as [`crate::graph::GraphIssue`]s instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node type '{0}' is not registered")]
    UnknownType(String),

    #[error("Node '{0}' not found in the graph")]
    NodeNotFound(NodeId),

    #[error("Node '{node_id}' has no {port} slot {index} (it has {available})")]
    SlotOutOfRange {
        node_id: NodeId,
        port: &'static str,
        index: usize,
        available: usize,
    },

    #[error("Cannot connect output of type '{source_type}' to input of type '{target_type}'")]
    TypeMismatch {
        source_type: String,
        target_type: String,
    },

    #[error("Node '{0}' has no flow input")]
    NoFlowInput(NodeId),

    #[error("Node '{0}' is not a variable")]
    NotAVariable(NodeId),

    #[error("Variable type '{value_type}' does not support sync mode '{mode}'")]
    UnsupportedSyncMode { value_type: String, mode: String },

    #[error("Value for slot {index} of node '{node_id}' must be of type '{expected}'")]
    InvalidValue {
        node_id: NodeId,
        index: usize,
        expected: String,
    },
}

/// Errors reported by an external [`crate::graph::Assembler`].
#[derive(Error, Debug, Clone)]
pub enum AssemblerError {
    #[error("Assembly failed at node '{node_id}': {message}")]
    NodeRejected { node_id: NodeId, message: String },

    #[error("Assembler error: {0}")]
    Generic(String),
}

/// Errors while persisting or loading a compiled program artifact.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Artifact error: {0}")]
    Generic(String),
}

/// Errors while reading a network-id export file.
///
/// Individual malformed entries never produce an error; they are skipped and
/// logged. Only a document that is not a keyed object at all fails.
#[derive(Error, Debug, Clone)]
pub enum NetworkIdError {
    #[error("Could not access network id file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Network id document is malformed: {0}")]
    Parse(String),
}

/// Errors from a [`crate::session::PreferenceStore`].
#[derive(Error, Debug, Clone)]
pub enum PreferencesError {
    #[error("Could not access preferences at '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Preferences file is malformed: {0}")]
    Parse(String),
}
