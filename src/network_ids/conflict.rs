use super::{IdEntry, LoadedIds, NetworkId, NetworkScene, SceneObject, loaded_dictionary, scene_dictionary};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictKind {
    /// The loaded id is held by a different object than the loaded entry
    /// points at.
    ObjectConflict,
    /// The object is known under a different id.
    IdConflict,
    /// The loaded entry resolves to nothing in the scene.
    NotFound,
    /// The loaded entry names an object that has no id yet.
    NewId,
    /// Same id and object, but the component types changed.
    TypeMismatch,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConflictKind::ObjectConflict => "object conflict",
            ConflictKind::IdConflict => "id conflict",
            ConflictKind::NotFound => "not found",
            ConflictKind::NewId => "new id",
            ConflictKind::TypeMismatch => "type mismatch",
        };
        f.write_str(label)
    }
}

/// One row of the resolver: every disagreement of one kind that shares an id
/// or a path with another.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictGroup {
    pub kind: ConflictKind,
    pub scene: BTreeMap<NetworkId, IdEntry>,
    pub loaded: BTreeMap<NetworkId, IdEntry>,
    ids: BTreeSet<NetworkId>,
    paths: BTreeSet<String>,
}

impl ConflictGroup {
    fn new(kind: ConflictKind) -> Self {
        Self {
            kind,
            scene: BTreeMap::new(),
            loaded: BTreeMap::new(),
            ids: BTreeSet::new(),
            paths: BTreeSet::new(),
        }
    }

    /// Every id this group touches, on either side.
    pub fn ids(&self) -> &BTreeSet<NetworkId> {
        &self.ids
    }

    pub fn paths(&self) -> &BTreeSet<String> {
        &self.paths
    }

    fn with_scene(mut self, id: NetworkId, entry: IdEntry) -> Self {
        self.ids.insert(id);
        self.paths.insert(entry.path.clone());
        self.scene.insert(id, entry);
        self
    }

    fn with_loaded(mut self, id: NetworkId, entry: IdEntry) -> Self {
        self.ids.insert(id);
        self.paths.insert(entry.path.clone());
        self.loaded.insert(id, entry);
        self
    }

    fn overlaps(&self, other: &ConflictGroup) -> bool {
        self.kind == other.kind
            && (!self.ids.is_disjoint(&other.ids) || !self.paths.is_disjoint(&other.paths))
    }

    fn absorb(&mut self, other: ConflictGroup) {
        self.scene.extend(other.scene);
        self.loaded.extend(other.loaded);
        self.ids.extend(other.ids);
        self.paths.extend(other.paths);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictReport {
    pub groups: Vec<ConflictGroup>,
    /// Scene ids not involved in any conflict.
    pub clean: BTreeMap<NetworkId, IdEntry>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups_of(&self, kind: ConflictKind) -> impl Iterator<Item = &ConflictGroup> {
        self.groups.iter().filter(move |g| g.kind == kind)
    }
}

/// Compares the scene's ids with a pending import.
pub fn detect_conflicts(scene: &NetworkScene, loaded: &LoadedIds) -> ConflictReport {
    let scene_ids = scene_dictionary(scene);
    let loaded_ids = loaded_dictionary(scene, loaded);
    let scene_entry = |object: &SceneObject| -> Option<(NetworkId, IdEntry)> {
        let id = object.network_id?;
        scene_ids.get(&id).map(|entry| (id, entry.clone()))
    };

    let mut candidates = Vec::new();
    for (&id, entry) in &loaded_ids {
        let at_path = scene.by_path(&entry.path);
        let holder = scene.by_id(id);

        match at_path {
            Some(object) if object.network_id == Some(id) => {
                let types_differ = entry
                    .types
                    .as_ref()
                    .is_some_and(|types| types != &object.types);
                if types_differ {
                    let mut group = ConflictGroup::new(ConflictKind::TypeMismatch);
                    if let Some((scene_id, scene_entry)) = scene_entry(object) {
                        group = group.with_scene(scene_id, scene_entry);
                    }
                    candidates.push(group.with_loaded(id, entry.clone()));
                }
            }
            Some(object) => {
                if let Some((scene_id, scene_entry)) = scene_entry(object) {
                    candidates.push(
                        ConflictGroup::new(ConflictKind::IdConflict)
                            .with_scene(scene_id, scene_entry)
                            .with_loaded(id, entry.clone()),
                    );
                }
                match holder.and_then(scene_entry) {
                    Some((scene_id, scene_entry)) => candidates.push(
                        ConflictGroup::new(ConflictKind::ObjectConflict)
                            .with_scene(scene_id, scene_entry)
                            .with_loaded(id, entry.clone()),
                    ),
                    None if object.network_id.is_none() => candidates.push(
                        ConflictGroup::new(ConflictKind::NewId).with_loaded(id, entry.clone()),
                    ),
                    None => {}
                }
            }
            None => match holder.and_then(scene_entry) {
                Some((scene_id, scene_entry)) => candidates.push(
                    ConflictGroup::new(ConflictKind::IdConflict)
                        .with_scene(scene_id, scene_entry)
                        .with_loaded(id, entry.clone()),
                ),
                None => candidates.push(
                    ConflictGroup::new(ConflictKind::NotFound).with_loaded(id, entry.clone()),
                ),
            },
        }
    }

    let groups = merge_groups(candidates);
    let involved: BTreeSet<NetworkId> = groups
        .iter()
        .flat_map(|g| g.scene.keys().copied())
        .collect();
    let clean = scene_ids
        .into_iter()
        .filter(|(id, _)| !involved.contains(id))
        .collect();

    ConflictReport { groups, clean }
}

/// Folds each candidate into every existing group it overlaps with. A
/// candidate that overlaps several groups joins them into one.
fn merge_groups(candidates: Vec<ConflictGroup>) -> Vec<ConflictGroup> {
    let mut groups: Vec<ConflictGroup> = Vec::new();
    for mut candidate in candidates {
        let mut index = 0;
        let mut insert_at = None;
        while index < groups.len() {
            if groups[index].overlaps(&candidate) {
                let existing = groups.remove(index);
                candidate.absorb(existing);
                insert_at.get_or_insert(index);
            } else {
                index += 1;
            }
        }
        let position = insert_at.unwrap_or(groups.len());
        groups.insert(position, candidate);
    }
    groups
}
