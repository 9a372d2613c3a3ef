//! Hierarchy level assignment.
//!
//! Levels are numbered from the roots (nodes nothing points to) downward.
//! Two policies exist:
//!
//! - [`LevelPolicy::FirstDiscovery`]: breadth-first over a FIFO queue seeded
//!   with every root. The first time a node is popped fixes its level; a
//!   shorter path found later through another root does NOT lower it. Levels
//!   therefore reflect discovery order across the multi-root frontier.
//! - [`LevelPolicy::LongestPath`]: topological relaxation, each node sits one
//!   below its deepest parent.
//!
//! A graph with no root (every node has an incoming edge) has no hierarchy.
//! The result still maps every node to 0 but sets
//! [`HierarchyLevels::degenerate`] so the renderer can say so.

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::model::{GraphSnapshot, NodeId};

/// How levels are derived from the root frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelPolicy {
    #[default]
    FirstDiscovery,
    LongestPath,
}

/// Level of every node in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyLevels {
    pub policy: LevelPolicy,
    /// Total over the snapshot's nodes.
    pub levels: HashMap<NodeId, u32>,
    /// Roots in snapshot order.
    pub roots: Vec<NodeId>,
    /// The parent each non-root node was levelled from.
    pub parents: HashMap<NodeId, NodeId>,
    /// `true` when no root exists and the flat levels carry no meaning.
    pub degenerate: bool,
}

impl HierarchyLevels {
    pub fn level(&self, id: &NodeId) -> Option<u32> {
        self.levels.get(id).copied()
    }

    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.parents.get(id)
    }

    pub fn has_hierarchy(&self) -> bool {
        !self.degenerate
    }

    pub fn depth(&self) -> u32 {
        self.levels.values().copied().max().unwrap_or(0)
    }

    /// Node ids grouped by level, each group in id order.
    pub fn layers(&self) -> Vec<Vec<NodeId>> {
        let mut layers: Vec<Vec<NodeId>> = Vec::new();
        for (id, &level) in &self.levels {
            let level = level as usize;
            if layers.len() <= level {
                layers.resize_with(level + 1, Vec::new);
            }
            layers[level].push(id.clone());
        }
        for layer in &mut layers {
            layer.sort();
        }
        layers
    }
}

/// Assign a level to every node of `snapshot` under `policy`.
pub fn assign_levels(snapshot: &GraphSnapshot, policy: LevelPolicy) -> HierarchyLevels {
    let adjacency = snapshot.out_adjacency();
    let mut indegree = vec![0usize; snapshot.node_count()];
    for edge in snapshot.edges() {
        if let Some(i) = snapshot.slot(&edge.to) {
            indegree[i] += 1;
        }
    }

    let roots: Vec<usize> = (0..snapshot.node_count()).filter(|&i| indegree[i] == 0).collect();
    let degenerate = roots.is_empty() && !snapshot.is_empty();
    if degenerate {
        warn!(nodes = snapshot.node_count(), "no root node, hierarchy cannot be established");
    }

    let walk = match policy {
        _ if degenerate => Walk::new(snapshot.node_count()),
        LevelPolicy::FirstDiscovery => first_discovery(&adjacency, &roots),
        LevelPolicy::LongestPath => longest_path(&adjacency, indegree, &roots),
    };

    let nodes = snapshot.nodes();
    let levels: HashMap<NodeId, u32> = nodes
        .iter()
        .zip(&walk.levels)
        .map(|(n, level)| (n.id.clone(), level.unwrap_or(0)))
        .collect();
    let parents: HashMap<NodeId, NodeId> = walk
        .parents
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|p| (nodes[i].id.clone(), nodes[p].id.clone())))
        .collect();

    let result = HierarchyLevels {
        policy,
        roots: roots.iter().map(|&i| nodes[i].id.clone()).collect(),
        levels,
        parents,
        degenerate,
    };
    debug!(?policy, roots = result.roots.len(), depth = result.depth(), "hierarchy levels assigned");
    result
}

/// Per-slot output of a level walk.
struct Walk {
    levels: Vec<Option<u32>>,
    parents: Vec<Option<usize>>,
}

impl Walk {
    fn new(n: usize) -> Self {
        Self { levels: vec![None; n], parents: vec![None; n] }
    }
}

/// FIFO breadth-first walk; first visit wins.
fn first_discovery(adjacency: &[SmallVec<[usize; 4]>], roots: &[usize]) -> Walk {
    let mut walk = Walk::new(adjacency.len());
    let mut queue: VecDeque<(usize, u32, Option<usize>)> =
        roots.iter().map(|&r| (r, 0, None)).collect();

    while let Some((node, level, parent)) = queue.pop_front() {
        if walk.levels[node].is_some() {
            continue;
        }
        walk.levels[node] = Some(level);
        walk.parents[node] = parent;

        for &next in &adjacency[node] {
            if walk.levels[next].is_none() {
                queue.push_back((next, level + 1, Some(node)));
            }
        }
    }

    walk
}

/// Kahn-order relaxation to the deepest parent.
///
/// Nodes on a cycle never reach in-degree zero. They are settled afterwards
/// in snapshot order, one below their deepest settled parent (or 0).
fn longest_path(adjacency: &[SmallVec<[usize; 4]>], mut indegree: Vec<usize>, roots: &[usize]) -> Walk {
    let n = adjacency.len();
    let mut walk = Walk::new(n);
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    for &r in roots {
        walk.levels[r] = Some(0);
    }

    let mut settled = vec![false; n];
    while let Some(node) = queue.pop_front() {
        settled[node] = true;
        let candidate = walk.levels[node].unwrap_or(0) + 1;
        for &next in &adjacency[node] {
            if walk.levels[next].is_none_or(|l| l < candidate) {
                walk.levels[next] = Some(candidate);
                walk.parents[next] = Some(node);
            }
            if indegree[next] > 0 {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if settled.iter().all(|s| *s) {
        return walk;
    }

    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, targets) in adjacency.iter().enumerate() {
        for &to in targets {
            incoming[to].push(from);
        }
    }
    for node in 0..n {
        if settled[node] {
            continue;
        }
        let deepest = incoming[node]
            .iter()
            .filter(|&&p| settled[p])
            .filter_map(|&p| walk.levels[p].map(|l| (l, p)))
            .max_by_key(|&(l, _)| l);
        walk.levels[node] = Some(deepest.map_or(0, |(l, _)| l + 1));
        walk.parents[node] = deepest.map(|(_, p)| p);
        settled[node] = true;
    }

    walk
}
