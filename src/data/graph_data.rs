use super::node::{NodeData, NodeId, Position};
use serde::{Deserialize, Serialize};
use std::fs;

/// A free-floating comment. Visual only; never compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    pub uid: String,
    pub text: String,
    #[serde(default)]
    pub position: Position,
}

/// A visual group. Membership is a weak reference by node id: deleting a node
/// drops it from `contained` but leaves the group in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub contained: Vec<NodeId>,
}

/// The persisted form of one graph program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub comments: Vec<CommentData>,
    #[serde(default)]
    pub groups: Vec<GroupData>,
}

impl GraphData {
    /// Load graph data from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
