//! Identifier types: semantic node ids, render ids and widget ids

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a node resource
///
/// Serializes as a plain string (e.g. "dtn-root", "result-eligible").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify this id against a question-node prefix
    pub fn kind(&self, node_prefix: &str) -> NodeKind {
        NodeKind::classify(self, node_prefix)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of a node, either presenting further options or terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A question with answer options leading to further nodes
    Question,
    /// A terminal result with no further options
    Answer,
}

impl NodeKind {
    /// Classify a node id by naming convention.
    ///
    /// Ids starting with `node_prefix` are question nodes, everything else is
    /// an answer node. This only depends on its arguments.
    pub fn classify(id: &NodeId, node_prefix: &str) -> Self {
        if id.as_str().starts_with(node_prefix) {
            NodeKind::Question
        } else {
            NodeKind::Answer
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Question => write!(f, "question"),
            NodeKind::Answer => write!(f, "answer"),
        }
    }
}

/// Handle of one displayed node instance.
///
/// Distinct from the [`NodeId`]: the same node may be displayed again after
/// being removed, and gets a fresh render id each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderId(u64);

impl RenderId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn seq(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dtr-{}", self.0)
    }
}

/// Identifier of one mounted tree widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    /// Create a new random WidgetId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
