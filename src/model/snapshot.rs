//! GraphSnapshot: immutable view of nodes and edges for one analysis pass.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::{Edge, EdgeId, Layout, Node, NodeId, Point};
use crate::{Error, Result};

/// One render cycle's worth of graph.
///
/// Nodes are unique by id. Edges are unordered in meaning but their index is
/// used as [`EdgeId`], so iteration order is stable for the lifetime of the
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

/// Wire shape used by the backend (`{"nodes": [...], "edges": [...]}`).
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl<'de> Deserialize<'de> for GraphSnapshot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawSnapshot::deserialize(deserializer)?;
        GraphSnapshot::new(raw.nodes, raw.edges).map_err(serde::de::Error::custom)
    }
}

impl GraphSnapshot {
    /// Build a snapshot. Fails on duplicate node ids; dangling edges are kept.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }
        Ok(Self { nodes, edges, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the backend's JSON graph payload.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges paired with their synthetic ids.
    pub fn edges_indexed(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node in the index, i.e. its slot in [`nodes`](Self::nodes).
    pub(crate) fn slot(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Edges whose endpoint(s) reference ids absent from the snapshot.
    pub fn dangling_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges_indexed()
            .filter(|(_, e)| !self.contains(&e.from) || !self.contains(&e.to))
    }

    /// Nodes whose id equals `query` or whose whole label matches it,
    /// ignoring ASCII case.
    pub fn find(&self, query: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.matches(query)).collect()
    }

    /// Free-text search: nodes whose label contains `query`, ignoring case,
    /// in snapshot order.
    pub fn search(&self, query: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.label_contains(query)).collect()
    }

    /// Distinct non-empty contexts, sorted.
    pub fn contexts(&self) -> Vec<&str> {
        let mut contexts: Vec<&str> = self
            .nodes
            .iter()
            .map(|n| n.context.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        contexts.sort_unstable();
        contexts.dedup();
        contexts
    }

    /// Sub-snapshot of the nodes written under `context`.
    ///
    /// Only edges with both endpoints kept survive, so cross-context and
    /// dangling edges are dropped. An empty `context` means "no filter" and
    /// returns the whole snapshot.
    pub fn filter_by_context(&self, context: &str) -> GraphSnapshot {
        if context.is_empty() {
            return self.clone();
        }
        let nodes: Vec<Node> = self.nodes.iter().filter(|n| n.context == context).cloned().collect();
        let index: HashMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| index.contains_key(&e.from) && index.contains_key(&e.to))
            .cloned()
            .collect();
        debug!(context, nodes = nodes.len(), edges = edges.len(), "snapshot filtered by context");
        GraphSnapshot { nodes, edges, index }
    }

    /// Resolve a mixed list of ids and labels to node ids, in snapshot order.
    pub fn resolve<'q>(&self, queries: impl IntoIterator<Item = &'q str>) -> Vec<NodeId> {
        let queries: Vec<&str> = queries.into_iter().collect();
        self.nodes
            .iter()
            .filter(|n| queries.iter().any(|q| n.matches(q)))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Outgoing adjacency by node slot, built once per analysis call.
    ///
    /// Targets are slots too; edges with a missing endpoint are left out.
    pub(crate) fn out_adjacency(&self) -> Vec<SmallVec<[usize; 4]>> {
        let mut adj: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); self.nodes.len()];
        for edge in &self.edges {
            if let (Some(from), Some(to)) = (self.slot(&edge.from), self.slot(&edge.to)) {
                adj[from].push(to);
            }
        }
        adj
    }
}

/// Node positions carried on the snapshot itself.
impl Layout for GraphSnapshot {
    fn position(&self, id: &NodeId) -> Option<Point> {
        self.node(id).and_then(|n| n.position)
    }
}
