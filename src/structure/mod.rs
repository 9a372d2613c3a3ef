//! # Structural Classification
//!
//! Degree-based node classes over a [`GraphSnapshot`]: hubs, sources,
//! sinks, orphans and peripherals. All functions are pure.
//!
//! Dangling edges (an endpoint id missing from the snapshot) still count for
//! the endpoint that does exist, and for nothing else.

pub mod hierarchy;
pub mod metrics;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::model::{GraphSnapshot, NodeId};

pub use hierarchy::{assign_levels, HierarchyLevels, LevelPolicy};
pub use metrics::{GraphMetrics, graph_metrics};

/// Undirected degree of every node in the snapshot, zero-filled.
///
/// Each edge adds one to `from` and one to `to`; a self-loop therefore
/// counts twice.
pub fn degrees(snapshot: &GraphSnapshot) -> HashMap<NodeId, usize> {
    let mut counts = vec![0usize; snapshot.node_count()];
    for edge in snapshot.edges() {
        if let Some(i) = snapshot.slot(&edge.from) {
            counts[i] += 1;
        }
        if let Some(i) = snapshot.slot(&edge.to) {
            counts[i] += 1;
        }
    }
    snapshot
        .nodes()
        .iter()
        .zip(counts)
        .map(|(n, d)| (n.id.clone(), d))
        .collect()
}

/// Nodes whose degree is strictly greater than `threshold`.
pub fn hubs(snapshot: &GraphSnapshot, threshold: usize) -> HashSet<NodeId> {
    let hubs: HashSet<NodeId> = degrees(snapshot)
        .into_iter()
        .filter(|(_, d)| *d > threshold)
        .map(|(id, _)| id)
        .collect();
    debug!(threshold, hubs = hubs.len(), "hub classification");
    hubs
}

/// Nodes no edge points to. Isolated nodes are sources.
pub fn sources(snapshot: &GraphSnapshot) -> HashSet<NodeId> {
    let targets: HashSet<&NodeId> = snapshot.edges().iter().map(|e| &e.to).collect();
    snapshot
        .nodes()
        .iter()
        .filter(|n| !targets.contains(&n.id))
        .map(|n| n.id.clone())
        .collect()
}

/// Nodes with no outgoing edge. Isolated nodes are sinks.
pub fn sinks(snapshot: &GraphSnapshot) -> HashSet<NodeId> {
    let origins: HashSet<&NodeId> = snapshot.edges().iter().map(|e| &e.from).collect();
    snapshot
        .nodes()
        .iter()
        .filter(|n| !origins.contains(&n.id))
        .map(|n| n.id.clone())
        .collect()
}

/// Nodes touched by no edge at all.
pub fn orphans(snapshot: &GraphSnapshot) -> HashSet<NodeId> {
    degrees(snapshot)
        .into_iter()
        .filter(|(_, d)| *d == 0)
        .map(|(id, _)| id)
        .collect()
}

/// Nodes with at most one incident edge end.
pub fn peripherals(snapshot: &GraphSnapshot) -> HashSet<NodeId> {
    degrees(snapshot)
        .into_iter()
        .filter(|(_, d)| *d <= 1)
        .map(|(id, _)| id)
        .collect()
}
