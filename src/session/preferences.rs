use crate::error::PreferencesError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Editor preferences, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Highlight the flow of the selected node
    pub highlight_flow: bool,
    /// Quiet period after the last edit before recompiling
    pub recompile_debounce_ms: u64,
    /// Repair dangling references when assemblies reload
    pub auto_repair_on_reload: bool,
    pub snap_to_grid: bool,
    pub grid_size: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            highlight_flow: true,
            recompile_debounce_ms: 500,
            auto_repair_on_reload: true,
            snap_to_grid: false,
            grid_size: 20.0,
        }
    }
}

/// Where preferences live between sessions. Loaded once when a session opens
/// and saved whenever they change.
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences, PreferencesError>;
    fn save(&mut self, preferences: &Preferences) -> Result<(), PreferencesError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    /// A missing file yields the defaults.
    fn load(&self) -> Result<Preferences, PreferencesError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&content).map_err(|e| PreferencesError::Parse(e.to_string()))
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| PreferencesError::Parse(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Keeps preferences in memory. Counts saves so callers can observe them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: Option<Preferences>,
    saves: usize,
}

impl MemoryStore {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            stored: Some(preferences),
            saves: 0,
        }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn stored(&self) -> Option<&Preferences> {
        self.stored.as_ref()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        Ok(self.stored.clone().unwrap_or_default())
    }

    fn save(&mut self, preferences: &Preferences) -> Result<(), PreferencesError> {
        self.stored = Some(preferences.clone());
        self.saves += 1;
        Ok(())
    }
}
