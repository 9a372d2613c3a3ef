//! Whole-graph summary metrics shown next to the density view.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::GraphSnapshot;

/// Summary numbers for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_count: usize,
    /// Edges whose endpoints both exist.
    pub edge_count: usize,
    pub dangling_edges: usize,
    /// `E / (N(N-1)/2)`, undirected. 0 for graphs with fewer than two nodes.
    pub global_density: f64,
    /// `sum(degree) / N`.
    pub average_degree: f64,
    /// Mean local clustering coefficient over nodes with ≥ 2 neighbours.
    pub clustering_coefficient: f64,
    pub hubs: usize,
    pub peripherals: usize,
    pub orphans: usize,
}

/// Compute [`GraphMetrics`], counting hubs above `hub_threshold`.
pub fn graph_metrics(snapshot: &GraphSnapshot, hub_threshold: usize) -> GraphMetrics {
    let n = snapshot.node_count();
    let dangling = snapshot.dangling_edges().count();
    let edge_count = snapshot.edge_count() - dangling;

    let degrees = super::degrees(snapshot);
    let degree_sum: usize = degrees.values().sum();

    let global_density = if n <= 1 {
        0.0
    } else {
        edge_count as f64 / (n * (n - 1) / 2) as f64
    };
    let average_degree = if n == 0 { 0.0 } else { degree_sum as f64 / n as f64 };

    let metrics = GraphMetrics {
        node_count: n,
        edge_count,
        dangling_edges: dangling,
        global_density,
        average_degree,
        clustering_coefficient: clustering_coefficient(snapshot),
        hubs: degrees.values().filter(|&&d| d > hub_threshold).count(),
        peripherals: degrees.values().filter(|&&d| d <= 1).count(),
        orphans: degrees.values().filter(|&&d| d == 0).count(),
    };
    debug!(nodes = n, edges = edge_count, density = metrics.global_density, "graph metrics");
    metrics
}

/// Average of `2T / (k(k-1))` over nodes with at least two distinct neighbours.
fn clustering_coefficient(snapshot: &GraphSnapshot) -> f64 {
    let n = snapshot.node_count();
    let mut neighbours: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for edge in snapshot.edges() {
        if let (Some(a), Some(b)) = (snapshot.slot(&edge.from), snapshot.slot(&edge.to)) {
            if a != b {
                neighbours[a].insert(b);
                neighbours[b].insert(a);
            }
        }
    }

    let mut total = 0.0;
    let mut counted = 0usize;
    for adjacent in &neighbours {
        let k = adjacent.len();
        if k < 2 {
            continue;
        }
        let list: Vec<usize> = adjacent.iter().copied().collect();
        let mut triangles = 0usize;
        for (i, &u) in list.iter().enumerate() {
            for &v in &list[i + 1..] {
                if neighbours[u].contains(&v) {
                    triangles += 1;
                }
            }
        }
        total += (2 * triangles) as f64 / (k * (k - 1)) as f64;
        counted += 1;
    }

    if counted == 0 { 0.0 } else { total / counted as f64 }
}
