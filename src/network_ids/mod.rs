//! Reconciles a saved id-to-object mapping with the ids currently assigned
//! in a scene.
//!
//! The scene side is a flat list of networked objects, each addressed by its
//! hierarchy path. The loaded side is whatever an id file contained. Both are
//! turned into dictionaries keyed by id, compared, and every disagreement is
//! reported as a [`ConflictGroup`] the user can accept or ignore.

mod conflict;
mod file;

pub use conflict::*;
pub use file::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NetworkId = i32;

/// Stable handle of a scene object, independent of its path or id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub object: ObjectRef,
    pub path: String,
    /// Serialized component type names, in component order.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub network_id: Option<NetworkId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkScene {
    #[serde(default)]
    objects: Vec<SceneObject>,
}

impl NetworkScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Adds an object and returns its handle. An id already held by another
    /// object moves to the new one.
    pub fn add(&mut self, path: &str, types: &[&str], network_id: Option<NetworkId>) -> ObjectRef {
        let object = ObjectRef(
            self.objects
                .iter()
                .map(|o| o.object.0 + 1)
                .max()
                .unwrap_or(1),
        );
        self.objects.push(SceneObject {
            object,
            path: path.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            network_id: None,
        });
        if let Some(id) = network_id {
            self.assign(object, id);
        }
        object
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, object: ObjectRef) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.object == object)
    }

    pub fn by_path(&self, path: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.path == path)
    }

    pub fn by_id(&self, id: NetworkId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.network_id == Some(id))
    }

    /// Gives `id` to `object`, taking it away from any other holder so ids
    /// stay unique. Returns `false` when the object is not in the scene.
    pub fn assign(&mut self, object: ObjectRef, id: NetworkId) -> bool {
        if self.get(object).is_none() {
            return false;
        }
        for other in self.objects.iter_mut() {
            if other.object == object {
                other.network_id = Some(id);
            } else if other.network_id == Some(id) {
                log::debug!("Network id {} moved away from '{}'", id, other.path);
                other.network_id = None;
            }
        }
        true
    }

    pub fn clear_id(&mut self, object: ObjectRef) {
        if let Some(o) = self.objects.iter_mut().find(|o| o.object == object) {
            o.network_id = None;
        }
    }
}

/// One side of the comparison for a single id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdEntry {
    /// The scene object at `path`, if the path resolves.
    pub object: Option<ObjectRef>,
    pub path: String,
    /// `None` when the source did not record component types.
    pub types: Option<Vec<String>>,
}

/// An entry read from an id file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

impl LoadedEntry {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            types: None,
        }
    }

    pub fn with_types(path: &str, types: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            types: Some(types.iter().map(|t| t.to_string()).collect()),
        }
    }
}

pub type LoadedIds = BTreeMap<NetworkId, LoadedEntry>;

/// Every id currently assigned in the scene.
pub fn scene_dictionary(scene: &NetworkScene) -> BTreeMap<NetworkId, IdEntry> {
    scene
        .objects()
        .iter()
        .filter_map(|o| {
            let id = o.network_id?;
            Some((
                id,
                IdEntry {
                    object: Some(o.object),
                    path: o.path.clone(),
                    types: Some(o.types.clone()),
                },
            ))
        })
        .collect()
}

/// Loaded entries with their paths resolved against the scene.
pub fn loaded_dictionary(scene: &NetworkScene, loaded: &LoadedIds) -> BTreeMap<NetworkId, IdEntry> {
    loaded
        .iter()
        .map(|(id, entry)| {
            (
                *id,
                IdEntry {
                    object: scene.by_path(&entry.path).map(|o| o.object),
                    path: entry.path.clone(),
                    types: entry.types.clone(),
                },
            )
        })
        .collect()
}

/// Holds the pending import and keeps the conflict report current.
pub struct NetworkIdResolver {
    scene: NetworkScene,
    loaded: LoadedIds,
    report: ConflictReport,
}

impl NetworkIdResolver {
    pub fn new(scene: NetworkScene, loaded: LoadedIds) -> Self {
        let report = detect_conflicts(&scene, &loaded);
        Self {
            scene,
            loaded,
            report,
        }
    }

    pub fn report(&self) -> &ConflictReport {
        &self.report
    }

    pub fn scene(&self) -> &NetworkScene {
        &self.scene
    }

    pub fn into_scene(self) -> NetworkScene {
        self.scene
    }

    /// Loaded entries not yet ignored or dropped.
    pub fn pending(&self) -> &LoadedIds {
        &self.loaded
    }

    /// Applies the loaded side of `group`.
    ///
    /// Not-found entries are dropped from the import. Every other kind binds
    /// the loaded id to the object at the loaded path, or to the object that
    /// currently holds the id when the path does not resolve, and then
    /// records that object's path and types as the loaded entry. Accepting a
    /// group twice has the same effect as accepting it once.
    pub fn accept(&mut self, group: &ConflictGroup) {
        for id in group.loaded.keys() {
            let Some(entry) = self.loaded.get(id).cloned() else {
                continue;
            };
            if group.kind == ConflictKind::NotFound {
                log::debug!("Dropping unresolvable network id {} ('{}')", id, entry.path);
                self.loaded.remove(id);
                continue;
            }

            let target = self
                .scene
                .by_path(&entry.path)
                .or_else(|| self.scene.by_id(*id))
                .map(|o| o.object);
            let Some(target) = target else {
                log::warn!(
                    "Cannot accept network id {}: no object at '{}' and no current holder",
                    id,
                    entry.path
                );
                continue;
            };

            self.scene.assign(target, *id);
            if let Some(object) = self.scene.get(target) {
                let resolved = LoadedEntry {
                    path: object.path.clone(),
                    types: Some(object.types.clone()),
                };
                self.loaded.insert(*id, resolved);
            }
        }
        self.redetect();
    }

    /// Drops the loaded side of `group` from the pending import.
    pub fn ignore(&mut self, group: &ConflictGroup) {
        for id in group.loaded.keys() {
            self.loaded.remove(id);
        }
        self.redetect();
    }

    /// Accepts every group of the current report.
    pub fn accept_all(&mut self) {
        let groups = self.report.groups.clone();
        for group in &groups {
            self.accept(group);
        }
    }

    fn redetect(&mut self) {
        self.report = detect_conflicts(&self.scene, &self.loaded);
        log::debug!(
            "Network id conflicts: {} group(s), {} clean id(s)",
            self.report.groups.len(),
            self.report.clean.len()
        );
    }
}
