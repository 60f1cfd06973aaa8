//! Copy and paste of node selections, within one graph or across graphs.

use crate::data::{DataRef, NodeData, NodeId, Position, Value};
use crate::graph::Graph;
use crate::registry::NodeKind;
use crate::variables::{DEFAULT_VARIABLE_NAME, NAME_SLOT, sanitize_identifier, unique_name};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A portable selection. Positions are relative to the selection's center
/// and variables come before every other node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardBlob {
    pub nodes: Vec<NodeData>,
}

impl ClipboardBlob {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses clipboard text. Anything that is not well-formed node data is
    /// treated as foreign content and yields `None`.
    pub fn from_text(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(blob) => Some(blob),
            Err(e) => {
                log::debug!("Ignoring clipboard content that is not node data: {}", e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Copies the selected nodes.
///
/// Variables used by selected getters, setters or change events are copied
/// too, even when not selected. Positions are re-centered on the bounding box
/// of the selected nodes.
pub fn copy(graph: &Graph, selected: &[NodeId]) -> ClipboardBlob {
    let selected: AHashSet<&NodeId> = selected.iter().collect();
    let picked: Vec<&NodeData> = graph
        .nodes()
        .iter()
        .filter(|n| selected.contains(&n.uid))
        .collect();

    let referenced_variables: AHashSet<NodeId> = picked
        .iter()
        .filter(|n| {
            graph
                .definition_of(n)
                .is_some_and(|d| d.kind.references_variable())
        })
        .filter_map(|n| n.variable_ref())
        .collect();

    let center = bounding_box_center(&picked);
    let nodes = graph
        .nodes()
        .iter()
        .filter(|n| {
            selected.contains(&n.uid) || (n.is_variable() && referenced_variables.contains(&n.uid))
        })
        .sorted_by_key(|n| !n.is_variable())
        .map(|n| {
            let mut copy = n.clone();
            copy.position = Position::new(n.position.x - center.x, n.position.y - center.y);
            copy
        })
        .collect();

    ClipboardBlob { nodes }
}

fn bounding_box_center(nodes: &[&NodeData]) -> Position {
    let Some(first) = nodes.first() else {
        return Position::default();
    };
    let (mut min, mut max) = (first.position, first.position);
    for node in nodes {
        min.x = min.x.min(node.position.x);
        min.y = min.y.min(node.position.y);
        max.x = max.x.max(node.position.x);
        max.y = max.y.max(node.position.y);
    }
    Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
}

/// Pastes clipboard text at `origin`. Text that is not node data pastes
/// nothing and returns an empty map.
pub fn paste_text(graph: &mut Graph, text: &str, origin: Position) -> AHashMap<NodeId, NodeId> {
    match ClipboardBlob::from_text(text) {
        Some(blob) => paste(graph, &blob, origin),
        None => AHashMap::new(),
    }
}

/// Instantiates `blob` in `graph` with fresh ids and returns the old to new
/// id map of every node that was created.
///
/// References between pasted nodes are rewritten to the new ids; references
/// to anything outside the blob are dropped. Pasted variables whose name is
/// already used get a suffixed name. A change event is skipped when its
/// variable already has one.
pub fn paste(graph: &mut Graph, blob: &ClipboardBlob, origin: Position) -> AHashMap<NodeId, NodeId> {
    let registry = graph.registry().clone();
    let mut id_map: AHashMap<NodeId, NodeId> = AHashMap::new();
    let mut fresh: AHashSet<NodeId> = AHashSet::new();
    let mut accepted: Vec<&NodeData> = Vec::new();

    for node in &blob.nodes {
        if !registry.contains(&node.full_name) {
            log::warn!(
                "Skipping pasted node '{}' of unknown type '{}'",
                node.uid,
                node.full_name
            );
            continue;
        }
        if id_map.contains_key(&node.uid) {
            log::warn!("Skipping duplicate node '{}' in clipboard", node.uid);
            continue;
        }
        let mut new_id = NodeId::generate();
        while graph.contains(&new_id) || fresh.contains(&new_id) {
            new_id = NodeId::generate();
        }
        fresh.insert(new_id.clone());
        id_map.insert(node.uid.clone(), new_id);
        accepted.push(node);
    }

    // Events for a variable that already has one are dropped before any
    // reference is rewritten, so nothing can point at them.
    let mut watched_variables: AHashSet<NodeId> = AHashSet::new();
    let mut skipped_events: Vec<NodeId> = Vec::new();
    accepted.retain(|node| {
        let is_event = registry
            .get(&node.full_name)
            .is_some_and(|d| d.kind == NodeKind::ChangeEvent);
        if !is_event {
            return true;
        }
        let duplicate = match node.variable_ref().and_then(|v| id_map.get(&v).cloned()) {
            Some(variable) => {
                graph.change_event_for(&variable).is_some()
                    || !watched_variables.insert(variable)
            }
            None => false,
        };
        if duplicate {
            log::warn!(
                "Skipping pasted change event '{}': variable already has one",
                node.uid
            );
            skipped_events.push(node.uid.clone());
        }
        !duplicate
    });
    for uid in &skipped_events {
        id_map.remove(uid);
    }

    let mut created = AHashMap::new();

    for node in accepted {
        let kind = registry.get(&node.full_name).map(|d| d.kind);
        let mut pasted = node.clone();
        pasted.uid = id_map[&node.uid].clone();
        pasted.position = origin.offset(node.position);

        for slot in pasted.node_uids.iter_mut() {
            *slot = slot.take().and_then(|r| {
                id_map.get(&r.node).map(|new| DataRef {
                    node: new.clone(),
                    output: r.output,
                })
            });
        }
        for slot in pasted.flow_uids.iter_mut() {
            *slot = slot.take().and_then(|target| id_map.get(&target).cloned());
        }

        if pasted.is_variable() {
            let requested = pasted
                .node_values
                .get(NAME_SLOT)
                .and_then(Value::as_str)
                .map(sanitize_identifier)
                .unwrap_or_else(|| DEFAULT_VARIABLE_NAME.to_string());
            let actual = unique_name(&requested, &graph.colliding_names(&requested, None));
            if actual != requested {
                log::debug!("Pasted variable '{}' renamed to '{}'", requested, actual);
            }
            if pasted.node_values.len() <= NAME_SLOT {
                pasted.node_values.resize(NAME_SLOT + 1, Value::Null);
            }
            pasted.node_values[NAME_SLOT] = Value::String(actual);
        }

        if kind.is_some_and(|k| k.references_variable()) {
            let variable = pasted.variable_ref().and_then(|v| id_map.get(&v).cloned());
            if pasted.node_values.is_empty() {
                pasted.node_values.push(Value::Null);
            }
            pasted.node_values[0] = variable
                .as_ref()
                .map_or(Value::Null, |v| Value::String(v.to_string()));
        }

        created.insert(node.uid.clone(), pasted.uid.clone());
        graph.insert_node(pasted);
    }

    for variable in created.values() {
        if graph.node(variable).is_some_and(|n| n.is_variable()) {
            graph.refresh_dependent_titles(variable);
        }
    }
    log::debug!("Pasted {} node(s)", created.len());
    created
}
