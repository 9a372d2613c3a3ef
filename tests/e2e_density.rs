//! End-to-end tests for the density overlays: heatmap, territories, grid.
//!
//! Positions come either from the snapshot's own nodes or from a separate
//! layout map; pixel conversion always goes through a `Projection`.

use graph_density::{
    AnalysisConfig, Analyzer, Classification, ConnectionSuggestion, DensityBand, DensityModel,
    DensitySample, Edge, EmptyZone, Error, GraphSnapshot, GridParams, Identity, Node, NodeId,
    Point, Raster, TerritoryMap, ViewTransform,
};
use hashbrown::HashMap;

// ============================================================================
// Helpers
// ============================================================================

fn placed_graph() -> GraphSnapshot {
    GraphSnapshot::new(
        vec![
            Node::new("a").at(0.0, 0.0),
            Node::new("b").at(60.0, 0.0),
            Node::new("c").at(400.0, 300.0),
            Node::new("d"),
        ],
        vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "d")],
    )
    .unwrap()
}

fn scores() -> DensityModel {
    DensityModel::from_json(
        r#"[
        {"nodeId": "a", "intensity": 0.71},
        {"nodeId": "b", "intensity": 0.70},
        {"nodeId": "d", "intensity": 0.1}
    ]"#,
    )
    .unwrap()
}

// ============================================================================
// 1. Heatmap
// ============================================================================

#[test]
fn test_heatmap_bands_and_omissions() {
    let snapshot = placed_graph();
    let analyzer = Analyzer::new(&snapshot);
    let spots = analyzer.heatmap(&snapshot, &scores(), &Identity).unwrap();

    // c is unscored, d has no position.
    assert_eq!(spots.len(), 2);
    assert_eq!(spots[0].band, DensityBand::High);
    assert_eq!(spots[1].band, DensityBand::Medium);
    assert!(spots.iter().all(|s| s.radius == 100.0));
    assert!(spots.iter().all(|s| s.node_id != NodeId::from("c")));
}

#[test]
fn test_heatmap_raster_through_camera() {
    let snapshot = placed_graph();
    let analyzer = Analyzer::new(&snapshot);
    let camera = ViewTransform::centered(Point::new(0.0, 0.0), 1.0, 200.0, 200.0);
    let spots = analyzer.heatmap(&snapshot, &scores(), &camera).unwrap();
    assert_eq!(spots[0].center, Point::new(100.0, 100.0));

    let raster = Raster::render(200, 200, &spots).unwrap();
    let hot = raster.pixel(100, 100).unwrap();
    assert!(hot[3] > 128);
    // Far corner is outside both spots.
    assert_eq!(raster.pixel(0, 199).unwrap()[3], 0);
}

#[test]
fn test_unscored_node_leaves_raster_untouched() {
    let snapshot = GraphSnapshot::new(vec![Node::new("lonely").at(10.0, 10.0)], vec![]).unwrap();
    let spots = Analyzer::new(&snapshot).heatmap(&snapshot, &DensityModel::default(), &Identity).unwrap();
    assert!(spots.is_empty());
    let raster = Raster::render(20, 20, &spots).unwrap();
    assert!(raster.to_rgba8().iter().all(|&b| b == 0));
}

#[test]
fn test_node_styles_distinguish_no_data() {
    let snapshot = placed_graph();
    let styles = Analyzer::new(&snapshot).node_styles(&scores());
    let bands: Vec<DensityBand> = styles.iter().map(|s| s.band).collect();
    assert_eq!(bands, vec![DensityBand::High, DensityBand::Medium, DensityBand::NoData, DensityBand::Low]);
}

// ============================================================================
// 2. Territories
// ============================================================================

#[test]
fn test_territories_from_backend_json() {
    let snapshot = placed_graph();
    let territories = TerritoryMap::from_json(
        r#"{
        "explored": [{"nodes": ["a", "b"], "centralNode": "a", "size": 2, "density": 0.9}],
        "frontier": [{"nodes": ["c"], "size": 1}],
        "unexplored": [{"nodes": ["d"], "size": 1}]
    }"#,
    )
    .unwrap();

    let analyzer = Analyzer::new(&snapshot);
    let shapes = analyzer.territories(&territories, &snapshot, &Identity).unwrap();
    // d has no position: the unexplored territory cannot be drawn.
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].classification, Classification::Explored);
    assert_eq!(shapes[0].center, Point::new(30.0, 0.0));
    // Spread 30 is below the 50 floor.
    assert_eq!(shapes[0].radius, 50.0);
    assert_eq!(shapes[0].label.text, "explored: 2 nodes");
    assert_eq!(shapes[1].label.text, "frontier: 1 nodes");

    let badges = analyzer.badges(&territories, &snapshot, &Identity);
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0].text, "E: 2");
    assert_eq!(badges[1].text, "F: 1");
}

#[test]
fn test_single_member_territory_at_ten_ten() {
    let snapshot = GraphSnapshot::new(vec![Node::new("x").at(10.0, 10.0)], vec![]).unwrap();
    let territories = TerritoryMap::from_json(r#"{"explored": [{"nodes": ["x"]}]}"#).unwrap();
    let shapes = Analyzer::new(&snapshot).territories(&territories, &snapshot, &Identity).unwrap();
    assert_eq!(shapes[0].radius, 50.0);
}

#[test]
fn test_territory_layout_separate_from_snapshot() {
    let snapshot = placed_graph();
    let layout: HashMap<NodeId, Point> = [(NodeId::from("d"), Point::new(5.0, 5.0))].into_iter().collect();
    let territories = TerritoryMap::from_json(r#"{"unexplored": [{"nodes": ["d"]}]}"#).unwrap();
    let shapes = Analyzer::new(&snapshot).territories(&territories, &layout, &Identity).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].center, Point::new(5.0, 5.0));
}

// ============================================================================
// 3. Grid
// ============================================================================

#[test]
fn test_grid_over_no_positions_is_empty() {
    let snapshot = GraphSnapshot::new(vec![Node::new("a"), Node::new("b")], vec![]).unwrap();
    let cells = Analyzer::new(&snapshot).grid(&snapshot, &scores(), &Identity).unwrap();
    assert!(cells.is_empty());
}

#[test]
fn test_grid_single_scored_node() {
    let snapshot = GraphSnapshot::new(vec![Node::new("a").at(250.0, -40.0)], vec![]).unwrap();
    let model = DensityModel::new([DensitySample::new("a", 0.37)]);
    let cells = Analyzer::new(&snapshot).grid(&snapshot, &model, &Identity).unwrap();
    assert!(!cells.is_empty());
    assert!(cells.iter().any(|c| c.local_intensity == 0.37));
    assert!(cells.iter().all(|c| c.size == 150.0));
}

#[test]
fn test_grid_mixes_neighbouring_scores() {
    let snapshot = placed_graph();
    let cells = Analyzer::new(&snapshot).grid(&snapshot, &scores(), &Identity).unwrap();
    // Near the a/b pair the mean sits between the two scores.
    assert!(cells.iter().any(|c| (c.local_intensity - 0.705).abs() < 1e-9));
    assert!(cells.iter().all(|c| c.band != DensityBand::NoData));
}

#[test]
fn test_grid_survives_astronomical_spread() {
    let snapshot = GraphSnapshot::new(vec![Node::new("a").at(0.0, 0.0), Node::new("b").at(1.0e300, 0.0)], vec![]).unwrap();
    let model = DensityModel::new([DensitySample::new("a", 0.8), DensitySample::new("b", 0.2)]);
    let cells = Analyzer::new(&snapshot).grid(&snapshot, &model, &Identity).unwrap();
    assert!(!cells.is_empty());
    assert!(cells.len() <= GridParams::default().max_cells);
}

#[test]
fn test_zero_cell_size_rejected_at_boundary() {
    let snapshot = placed_graph();
    let config = AnalysisConfig::default().with_grid(GridParams { cell_size: 0.0, ..GridParams::default() });
    let err = Analyzer::with_config(&snapshot, config).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "cell_size", .. }));
}

#[test]
fn test_negative_radius_rejected_at_boundary() {
    let snapshot = placed_graph();
    let config = AnalysisConfig::default().with_heatmap_radius(-10.0);
    assert!(Analyzer::with_config(&snapshot, config).is_err());
}

// ============================================================================
// 4. Guidance overlays
// ============================================================================

#[test]
fn test_empty_zones_from_backend_json() {
    let snapshot = placed_graph();
    let zones: Vec<EmptyZone> =
        serde_json::from_str(r#"[{"x": 0, "y": 0, "radius": 0}, {"x": 200, "y": 50, "radius": 120}]"#).unwrap();
    let camera = ViewTransform { x: 10.0, y: 10.0, k: 1.0 };
    let markers = Analyzer::new(&snapshot).empty_zones(&zones, &camera);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].center, Point::new(10.0, 10.0));
    assert_eq!(markers[0].radius, 50.0);
    assert_eq!(markers[1].radius, 120.0);
}

#[test]
fn test_suggested_links_skip_unplaced_nodes() {
    let snapshot = placed_graph();
    let suggestions = [
        ConnectionSuggestion::new("a", "c"),
        // d has no position.
        ConnectionSuggestion::new("b", "d"),
    ];
    let links = Analyzer::new(&snapshot).suggested_links(&suggestions, &snapshot, &Identity);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].start, Point::new(0.0, 0.0));
    assert_eq!(links[0].end, Point::new(400.0, 300.0));
}
