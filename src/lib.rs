//! # UdonGraph - Node Graph Core for Visual Behaviour Programs
//!
//! **UdonGraph** is the editing core behind a visual programming editor: it owns the node
//! data of one program, keeps it consistent while the user edits it, and turns it into the
//! linear node list an external assembler consumes.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Registry**: Use `NodeRegistry::builder()` to register the node types and the
//!     type hierarchy your host exposes. The built-in catalog covers events, constants,
//!     control flow, variables and a set of common operations.
//! 2.  **Edit a Graph**: Add nodes, connect data and flow ports, create and rename variables.
//!     Every mutation is type checked and keeps references consistent.
//! 3.  **Inspect**: Highlight the execution flow around a node, validate and repair loaded
//!     data, or copy a selection to the clipboard and paste it elsewhere.
//! 4.  **Compile**: `Graph::compile` produces the ordered node list; `Graph::compile_with`
//!     hands it to an `Assembler` and reports the outcome as a `CompileStatus`.
//!
//! Separately, the `network_ids` module reconciles a saved id file with the ids of a scene.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use udongraph::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let registry = Arc::new(NodeRegistry::with_defaults());
//!     let mut graph = Graph::new(registry);
//!
//!     // A variable and a getter that reads it
//!     let count = graph.add_variable("int", "count", false)?;
//!     let getter = graph.add_getter(&count, Position::new(0.0, 0.0))?;
//!
//!     // Start -> Debug.Log(count)
//!     let start = graph.add_node("Event_Start", Position::new(-200.0, 0.0))?;
//!     let log_node = graph.add_node("Debug_Log", Position::new(200.0, 0.0))?;
//!     graph.connect_flow(&start, 0, &log_node)?;
//!     graph.connect(&getter, 0, &log_node, 0)?;
//!
//!     // Renames propagate to every accessor
//!     let name = graph.rename_variable(&count, "score")?;
//!     println!("Getter now reads: {}", graph.title(&getter).unwrap_or_default());
//!     println!("Variable is called: {}", name);
//!
//!     // Compile and assemble
//!     match graph.compile_with(&ListingAssembler) {
//!         CompileStatus::Compiled { assembly } => println!("{}", assembly),
//!         other => println!("-> Compile did not succeed: {:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod clipboard;
pub mod data;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod network_ids;
pub mod prelude;
pub mod registry;
pub mod session;
pub mod variables;
