//! Node in the knowledge graph.

use serde::{Deserialize, Serialize};
use super::Point;

/// Stable node identifier, as produced by the note parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A concept extracted from the investigator's notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Display text. Matched by [`GraphSnapshot::find`](super::GraphSnapshot::find)
    /// and [`GraphSnapshot::search`](super::GraphSnapshot::search).
    #[serde(default)]
    pub label: String,
    /// Free-form context the concept was written under.
    #[serde(default)]
    pub context: String,
    /// Canvas-space position, when the layout engine has placed the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl Node {
    /// A node whose label equals its id.
    pub fn new(id: impl Into<NodeId>) -> Self {
        let id = id.into();
        Self {
            label: id.0.clone(),
            id,
            context: String::new(),
            position: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Exact id match, or whole-label match ignoring ASCII case.
    pub fn matches(&self, query: &str) -> bool {
        self.id.0 == query || self.label.eq_ignore_ascii_case(query)
    }

    /// Case-insensitive substring match on the label, as the search box does.
    /// An empty query matches every node.
    pub fn label_contains(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}
