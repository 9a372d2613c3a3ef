//! Property tests for the structural analyses over arbitrary snapshots.
//!
//! Generated graphs may contain self-loops, parallel edges, cycles and
//! edges whose endpoints are not in the snapshot.

use graph_density::{AnalysisConfig, Analyzer, Edge, GraphSnapshot, LevelPolicy, Node};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

/// Slots at or past `n` name nodes that are not in the snapshot.
fn name(slot: usize, n: usize) -> String {
    if slot < n { format!("n{slot}") } else { format!("ghost{slot}") }
}

fn build(n: usize, pairs: &[(usize, usize)]) -> GraphSnapshot {
    let nodes = (0..n).map(|i| Node::new(name(i, n))).collect();
    let edges = pairs.iter().map(|&(a, b)| Edge::new(name(a, n), name(b, n))).collect();
    GraphSnapshot::new(nodes, edges).unwrap()
}

fn arb_snapshot() -> impl Strategy<Value = GraphSnapshot> {
    (0usize..12).prop_flat_map(|n| {
        let slots = n + 2;
        prop::collection::vec((0..slots, 0..slots), 0..30)
            .prop_map(move |pairs| build(n, &pairs))
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_sources_are_exactly_nodes_without_incoming(snapshot in arb_snapshot()) {
        let sources = Analyzer::new(&snapshot).sources();
        for node in snapshot.nodes() {
            let has_incoming = snapshot.edges().iter().any(|e| e.to == node.id);
            prop_assert_eq!(sources.contains(&node.id), !has_incoming);
        }
    }

    #[test]
    fn prop_sinks_are_exactly_nodes_without_outgoing(snapshot in arb_snapshot()) {
        let sinks = Analyzer::new(&snapshot).sinks();
        for node in snapshot.nodes() {
            let has_outgoing = snapshot.edges().iter().any(|e| e.from == node.id);
            prop_assert_eq!(sinks.contains(&node.id), !has_outgoing);
        }
    }

    #[test]
    fn prop_degree_counts_existing_endpoints_only(snapshot in arb_snapshot()) {
        let degrees = Analyzer::new(&snapshot).degrees();
        prop_assert!(degrees.keys().all(|id| snapshot.contains(id)));

        let expected: usize = snapshot
            .edges()
            .iter()
            .map(|e| usize::from(snapshot.contains(&e.from)) + usize::from(snapshot.contains(&e.to)))
            .sum();
        prop_assert_eq!(degrees.values().sum::<usize>(), expected);
    }

    #[test]
    fn prop_hubs_follow_threshold(snapshot in arb_snapshot(), threshold in 0usize..5) {
        let config = AnalysisConfig::default().with_hub_threshold(threshold);
        let analyzer = Analyzer::with_config(&snapshot, config).unwrap();
        let degrees = analyzer.degrees();
        let hubs = analyzer.hubs();
        for node in snapshot.nodes() {
            let degree = degrees.get(&node.id).copied().unwrap_or(0);
            prop_assert_eq!(hubs.contains(&node.id), degree > threshold);
        }
    }

    #[test]
    fn prop_levels_total_and_roots_at_zero(snapshot in arb_snapshot(), longest in any::<bool>()) {
        let policy = if longest { LevelPolicy::LongestPath } else { LevelPolicy::FirstDiscovery };
        let config = AnalysisConfig::default().with_level_policy(policy);
        let h = Analyzer::with_config(&snapshot, config).unwrap().levels();

        prop_assert_eq!(h.levels.len(), snapshot.node_count());
        prop_assert!(snapshot.nodes().iter().all(|n| h.level(&n.id).is_some()));
        for root in &h.roots {
            prop_assert_eq!(h.level(root), Some(0));
            prop_assert!(h.parent(root).is_none());
        }
        prop_assert_eq!(h.degenerate, h.roots.is_empty() && !snapshot.is_empty());
    }

    #[test]
    fn prop_first_discovery_parent_is_one_level_up(snapshot in arb_snapshot()) {
        let h = Analyzer::new(&snapshot).levels();
        for (child, parent) in &h.parents {
            prop_assert_eq!(h.level(child), h.level(parent).map(|l| l + 1));
            let linked = snapshot.edges().iter().any(|e| &e.from == parent && &e.to == child);
            prop_assert!(linked);
        }
    }

    #[test]
    fn prop_analyses_never_mutate_snapshot(snapshot in arb_snapshot()) {
        let before = snapshot.clone();
        let analyzer = Analyzer::new(&snapshot);
        let _ = (analyzer.hubs(), analyzer.sources(), analyzer.sinks(), analyzer.levels(), analyzer.metrics());
        prop_assert_eq!(&snapshot, &before);
    }
}
