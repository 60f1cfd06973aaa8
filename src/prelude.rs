//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the udongraph
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use udongraph::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let data = GraphData::from_file("path/to/graph.json")?;
//! let graph = Graph::from_data(Arc::new(NodeRegistry::with_defaults()), data);
//!
//! for issue in graph.validate() {
//!     println!("{}", issue);
//! }
//!
//! let program = graph.compile();
//! program.save("path/to/program.bin")?;
//! # Ok(())
//! # }
//! ```

// Graph model and compilation
pub use crate::graph::{
    Assembler, CompileStatus, CompiledGraph, FixCommand, Graph, GraphIssue, IssueKind,
    ListingAssembler,
};
pub use crate::registry::{NodeDefinition, NodeKind, NodeRegistry, PortDefinition};

// Data structures
pub use crate::data::{DataRef, GraphData, NodeData, NodeId, Position, Value, ValueKind};

// Variables
pub use crate::variables::{SyncMode, VariableInfo};

// Editor features
pub use crate::clipboard::{ClipboardBlob, copy, paste, paste_text};
pub use crate::highlight::{FlowEdgeId, FlowHighlight, highlight};
pub use crate::session::{EditorSession, HostEvent, PreferenceStore, Preferences};

// Network ids
pub use crate::network_ids::{ConflictGroup, ConflictKind, NetworkIdResolver, NetworkScene};

// Error types
pub use crate::error::{GraphError, NetworkIdError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
