//! The serializable node data store.
//!
//! Nodes reference each other by [`NodeId`], never by pointer, so a
//! [`GraphData`] can be persisted, copied to the clipboard or handed to the
//! assembler as-is.

mod graph_data;
mod node;
mod value;

pub use graph_data::*;
pub use node::*;
pub use value::*;
