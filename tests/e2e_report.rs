//! End-to-end test for the plain-text density report.

use chrono::{TimeZone, Utc};
use graph_density::{Analyzer, Classification, Edge, GraphSnapshot, Node, Territory, TerritoryMap};
use pretty_assertions::assert_eq;

fn render(snapshot: &GraphSnapshot, territories: &TerritoryMap) -> String {
    let stamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
    let mut out = Vec::new();
    Analyzer::new(snapshot).write_report(&mut out, territories, stamp).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_report_layout() {
    let snapshot = GraphSnapshot::new(
        vec![Node::new("motive"), Node::new("alibi"), Node::new("receipt"), Node::new("stray")],
        vec![Edge::new("motive", "alibi"), Edge::new("alibi", "receipt")],
    )
    .unwrap();
    let territories = TerritoryMap::from_territories([
        Territory::new(Classification::Explored, ["motive", "alibi"])
            .with_central_node("motive")
            .with_density(0.75)
            .with_description("core story"),
        Territory::new(Classification::Unexplored, ["stray"]),
    ]);

    let report = render(&snapshot, &territories);
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines[0], "// graph-density report");
    assert_eq!(lines[1], "// Generated: 2024-03-09 14:30:00 UTC");
    assert_eq!(lines[2], "// Nodes: 4");
    assert_eq!(lines[3], "// Edges: 2");
    assert!(report.contains("  hubs: 0 | peripherals: 3 | orphans: 1\n"));
    assert!(report.contains("Explored territories (1)\n- motive: core story\n  density 75% | size 2 nodes\n"));
    assert!(report.contains("Frontier zones (0)\n"));
    // Anchor falls back to the first member.
    assert!(report.contains("Unexplored territories (1)\n- stray\n  size 1 nodes\n"));
}

#[test]
fn test_report_on_empty_snapshot() {
    let report = render(&GraphSnapshot::empty(), &TerritoryMap::default());
    assert!(report.contains("// Nodes: 0"));
    assert!(report.contains("  density: 0%"));
    assert!(report.ends_with("Unexplored territories (0)\n"));
}
