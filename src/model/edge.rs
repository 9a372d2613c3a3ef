//! Edge between two concepts.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Synthetic edge identity: the edge's index within its snapshot.
///
/// Only stable for the lifetime of one snapshot (one render cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge-{}", self.0)
    }
}

/// What kind of link the note grammar produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Relation,
    /// Bidirectional in meaning, still stored as `from -> to`.
    Equivalence,
    Group,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Relation => write!(f, "relation"),
            EdgeKind::Equivalence => write!(f, "equivalence"),
            EdgeKind::Group => write!(f, "group"),
        }
    }
}

/// A directed edge. Endpoints may reference ids absent from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub context: String,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Relation,
            label: String::new(),
            context: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// The "other" end of the edge from the given node.
    pub fn other_node(&self, from: &NodeId) -> Option<&NodeId> {
        if *from == self.from { Some(&self.to) }
        else if *from == self.to { Some(&self.from) }
        else { None }
    }
}
