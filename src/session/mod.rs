//! The editing session that sits between the host editor and one graph.
//!
//! The host drives it with edits, selection changes, host events and clock
//! ticks. Edits are coalesced so a burst of changes recompiles once, after
//! the configured quiet period.

mod debounce;
mod preferences;

pub use debounce::*;
pub use preferences::*;

use crate::data::{GraphData, NodeId, Position};
use crate::graph::{Assembler, CompileStatus, Graph};
use crate::highlight::{self, FlowHighlight};
use std::time::{Duration, Instant};

/// Notifications from the host. Each is handled once, when it arrives.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The asset containing the graph was saved.
    SceneSaved,
    /// Scripts were reloaded; node types may have changed.
    AssemblyReload,
    /// The host restored an undo snapshot.
    UndoRedo(GraphData),
    PlayModeChanged { playing: bool },
}

pub struct EditorSession<S: PreferenceStore> {
    graph: Graph,
    store: S,
    preferences: Preferences,
    debouncer: Debouncer,
    selection: Option<NodeId>,
    highlight: FlowHighlight,
    status: CompileStatus,
    playing: bool,
}

impl<S: PreferenceStore> EditorSession<S> {
    /// Opens a session. Unreadable preferences fall back to the defaults.
    pub fn open(graph: Graph, store: S) -> Self {
        let preferences = store.load().unwrap_or_else(|e| {
            log::warn!("Using default preferences: {}", e);
            Preferences::default()
        });
        let debouncer = Debouncer::new(Duration::from_millis(preferences.recompile_debounce_ms));
        let highlight = FlowHighlight::cleared(&graph);
        Self {
            graph,
            store,
            preferences,
            debouncer,
            selection: None,
            highlight,
            status: CompileStatus::NotCompiled,
            playing: false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> &CompileStatus {
        &self.status
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selection.as_ref()
    }

    pub fn highlight(&self) -> &FlowHighlight {
        &self.highlight
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn recompile_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Runs one edit against the graph and schedules a recompile.
    pub fn edit<R>(&mut self, now: Instant, apply: impl FnOnce(&mut Graph) -> R) -> R {
        let result = apply(&mut self.graph);
        self.debouncer.notify(now);
        self.refresh_highlight();
        result
    }

    pub fn select(&mut self, node: Option<NodeId>) {
        self.selection = node;
        self.refresh_highlight();
    }

    /// Snaps a position to the grid when snapping is enabled.
    pub fn snap(&self, position: Position) -> Position {
        if !self.preferences.snap_to_grid || self.preferences.grid_size <= 0.0 {
            return position;
        }
        let grid = self.preferences.grid_size;
        Position::new(
            (position.x / grid).round() * grid,
            (position.y / grid).round() * grid,
        )
    }

    pub fn handle_event(&mut self, event: HostEvent, now: Instant, assembler: &dyn Assembler) {
        match event {
            HostEvent::SceneSaved => {
                log::debug!("Scene saved, compiling now");
                self.recompile(assembler);
            }
            HostEvent::AssemblyReload => {
                if self.preferences.auto_repair_on_reload {
                    let repaired = self.graph.repair();
                    if !repaired.is_empty() {
                        log::warn!("Repaired {} issue(s) after reload", repaired.len());
                    }
                    self.refresh_highlight();
                }
                self.recompile(assembler);
            }
            HostEvent::UndoRedo(data) => {
                self.graph.replace_data(data);
                self.debouncer.notify(now);
                self.refresh_highlight();
            }
            HostEvent::PlayModeChanged { playing } => {
                let entering = playing && !self.playing;
                self.playing = playing;
                if entering && (self.debouncer.is_pending() || !self.status.is_compiled()) {
                    log::debug!("Entering play mode, compiling now");
                    self.recompile(assembler);
                }
            }
        }
    }

    /// Advances the clock. Returns `true` when a debounced recompile ran.
    pub fn tick(&mut self, now: Instant, assembler: &dyn Assembler) -> bool {
        if !self.debouncer.poll(now) {
            return false;
        }
        self.status = self.graph.compile_with(assembler);
        true
    }

    /// Replaces the preferences and persists them.
    pub fn set_preferences(&mut self, preferences: Preferences) {
        if preferences == self.preferences {
            return;
        }
        self.debouncer
            .set_delay(Duration::from_millis(preferences.recompile_debounce_ms));
        self.preferences = preferences;
        if let Err(e) = self.store.save(&self.preferences) {
            log::error!("Failed to save preferences: {}", e);
        }
        self.refresh_highlight();
    }

    fn recompile(&mut self, assembler: &dyn Assembler) {
        self.debouncer.cancel();
        self.status = self.graph.compile_with(assembler);
    }

    fn refresh_highlight(&mut self) {
        if self
            .selection
            .as_ref()
            .is_some_and(|id| !self.graph.contains(id))
        {
            self.selection = None;
        }
        self.highlight = match &self.selection {
            Some(selected) if self.preferences.highlight_flow => {
                highlight::highlight(&self.graph, selected)
            }
            _ => FlowHighlight::cleared(&self.graph),
        };
    }
}
