use super::{LoadedEntry, LoadedIds, NetworkId, NetworkScene};
use crate::error::NetworkIdError;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Writes every assigned id of the scene as `{ "<id>": { "path", "types" } }`.
pub fn export_ids(scene: &NetworkScene) -> Result<String, NetworkIdError> {
    let entries: BTreeMap<String, LoadedEntry> = scene
        .objects()
        .iter()
        .filter_map(|o| {
            let id = o.network_id?;
            Some((
                id.to_string(),
                LoadedEntry {
                    path: o.path.clone(),
                    types: Some(o.types.clone()),
                },
            ))
        })
        .collect();
    serde_json::to_string_pretty(&entries).map_err(|e| NetworkIdError::Parse(e.to_string()))
}

/// Reads an id file.
///
/// Values may be a bare path string or an object with `path` and optional
/// `types`. Keys that are not integers and values of any other shape are
/// logged and skipped; only a document that is not a JSON object fails.
pub fn import_ids(text: &str) -> Result<LoadedIds, NetworkIdError> {
    let document: serde_json::Map<String, JsonValue> =
        serde_json::from_str(text).map_err(|e| NetworkIdError::Parse(e.to_string()))?;

    let mut loaded = LoadedIds::new();
    for (key, value) in document {
        let Ok(id) = key.trim().parse::<NetworkId>() else {
            log::warn!("Skipping network id entry with non-integer key '{}'", key);
            continue;
        };
        let entry = match value {
            JsonValue::String(path) => LoadedEntry::new(&path),
            JsonValue::Object(_) => match serde_json::from_value::<LoadedEntry>(value) {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping network id {}: {}", id, e);
                    continue;
                }
            },
            other => {
                log::warn!("Skipping network id {}: unexpected value {}", id, other);
                continue;
            }
        };
        loaded.insert(id, entry);
    }
    Ok(loaded)
}

pub fn load_ids<P: AsRef<Path>>(path: P) -> Result<LoadedIds, NetworkIdError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| NetworkIdError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    import_ids(&text)
}

pub fn save_ids<P: AsRef<Path>>(scene: &NetworkScene, path: P) -> Result<(), NetworkIdError> {
    let path = path.as_ref();
    let text = export_ids(scene)?;
    fs::write(path, text).map_err(|e| NetworkIdError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
