//! # graph-density: Structural Classification & Spatial Density Engine
//!
//! Pure computations over a knowledge-graph snapshot that feed an
//! interactive graph view: hubs, sources and sinks, hierarchy levels, and a
//! spatial density model (heatmap raster, territory circles, sampled grid).
//!
//! ## Design Principles
//!
//! 1. **Positions are inputs**: the layout engine owns them; [`Layout`] and
//!    [`Projection`] are the only way in.
//! 2. **Snapshots are values**: every call recomputes from scratch; the core
//!    holds no cache and never mutates the snapshot.
//! 3. **Missing data degrades, it never fails**: unknown positions and
//!    unscored nodes shrink the output. Only parameter misuse is an error.
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_density::{Analyzer, DensityModel, DensitySample, Edge, GraphSnapshot, Identity, Node};
//!
//! # fn example() -> graph_density::Result<()> {
//! let snapshot = GraphSnapshot::new(
//!     vec![Node::new("motive").at(0.0, 0.0), Node::new("alibi").at(120.0, 40.0)],
//!     vec![Edge::new("motive", "alibi")],
//! )?;
//! let analyzer = Analyzer::new(&snapshot);
//!
//! let levels = analyzer.levels();
//! assert!(levels.has_hierarchy());
//!
//! let model = DensityModel::new([DensitySample::new("motive", 0.9)]);
//! let spots = analyzer.heatmap(&snapshot, &model, &Identity)?;
//! assert_eq!(spots.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod structure;
pub mod density;
pub mod export;

use std::io::Write;

use chrono::{DateTime, Utc};
use hashbrown::{HashMap, HashSet};

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    GraphSnapshot, Node, NodeId, Edge, EdgeId, EdgeKind,
    Point, BoundingBox, Projection, Identity, ViewTransform, Layout,
    DensitySample, Territory, TerritoryMap, Classification,
    EmptyZone, ConnectionSuggestion,
};

// ============================================================================
// Re-exports: Analyses
// ============================================================================

pub use config::{AnalysisConfig, GridParams};
pub use structure::{HierarchyLevels, LevelPolicy, GraphMetrics};
pub use density::{
    DensityBand, DensityModel, NodeStyle, Rgba,
    HeatmapSpot, Raster, TerritoryShape, TerritoryBadge, GridCell,
    ZoneMarker, SuggestedLink,
};

// ============================================================================
// Analyzer
// ============================================================================

/// The primary entry point. An `Analyzer` binds one snapshot to one
/// validated configuration and runs any analysis over them.
///
/// Creating one is cheap; build a new one per render cycle.
#[derive(Debug, Clone)]
pub struct Analyzer<'s> {
    snapshot: &'s GraphSnapshot,
    config: AnalysisConfig,
}

impl<'s> Analyzer<'s> {
    /// Analyzer with the default configuration.
    pub fn new(snapshot: &'s GraphSnapshot) -> Self {
        Self { snapshot, config: AnalysisConfig::default() }
    }

    /// Analyzer with a custom configuration, validated up front.
    pub fn with_config(snapshot: &'s GraphSnapshot, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { snapshot, config })
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        self.snapshot
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ========================================================================
    // Structure
    // ========================================================================

    pub fn degrees(&self) -> HashMap<NodeId, usize> {
        structure::degrees(self.snapshot)
    }

    /// Nodes whose degree exceeds the configured hub threshold.
    pub fn hubs(&self) -> HashSet<NodeId> {
        structure::hubs(self.snapshot, self.config.hub_threshold)
    }

    pub fn sources(&self) -> HashSet<NodeId> {
        structure::sources(self.snapshot)
    }

    pub fn sinks(&self) -> HashSet<NodeId> {
        structure::sinks(self.snapshot)
    }

    pub fn orphans(&self) -> HashSet<NodeId> {
        structure::orphans(self.snapshot)
    }

    pub fn peripherals(&self) -> HashSet<NodeId> {
        structure::peripherals(self.snapshot)
    }

    /// Hierarchy levels under the configured policy.
    pub fn levels(&self) -> HierarchyLevels {
        structure::assign_levels(self.snapshot, self.config.level_policy)
    }

    pub fn metrics(&self) -> GraphMetrics {
        structure::graph_metrics(self.snapshot, self.config.hub_threshold)
    }

    // ========================================================================
    // Density
    // ========================================================================

    /// Per-node recolouring by density band.
    pub fn node_styles(&self, model: &DensityModel) -> Vec<NodeStyle> {
        density::node_styles(self.snapshot, model)
    }

    pub fn heatmap<L, P>(&self, layout: &L, model: &DensityModel, projection: &P) -> Result<Vec<HeatmapSpot>>
    where
        L: Layout + ?Sized,
        P: Projection + ?Sized,
    {
        density::heatmap_spots(layout, model, projection, self.config.heatmap_radius)
    }

    pub fn territories<L, P>(&self, territories: &TerritoryMap, layout: &L, projection: &P) -> Result<Vec<TerritoryShape>>
    where
        L: Layout + ?Sized,
        P: Projection + ?Sized,
    {
        density::territory_shapes(territories.iter(), layout, projection, self.config.territory_min_radius)
    }

    pub fn badges<L, P>(&self, territories: &TerritoryMap, layout: &L, projection: &P) -> Vec<TerritoryBadge>
    where
        L: Layout + ?Sized,
        P: Projection + ?Sized,
    {
        density::territory_badges(territories.iter(), layout, projection)
    }

    pub fn grid<L, P>(&self, layout: &L, model: &DensityModel, projection: &P) -> Result<Vec<GridCell>>
    where
        L: Layout + ?Sized,
        P: Projection + ?Sized,
    {
        density::sample_grid(self.snapshot, layout, model, projection, &self.config.grid)
    }

    /// Dashed markers for the backend's empty zones.
    pub fn empty_zones<P>(&self, zones: &[EmptyZone], projection: &P) -> Vec<ZoneMarker>
    where
        P: Projection + ?Sized,
    {
        density::empty_zone_markers(zones, projection)
    }

    /// Dashed lines for suggested connections between placed nodes.
    pub fn suggested_links<L, P>(&self, suggestions: &[ConnectionSuggestion], layout: &L, projection: &P) -> Vec<SuggestedLink>
    where
        L: Layout + ?Sized,
        P: Projection + ?Sized,
    {
        density::suggested_links(suggestions, layout, projection)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Write the plain-text density report.
    pub fn write_report(
        &self,
        writer: &mut dyn Write,
        territories: &TerritoryMap,
        generated_at: DateTime<Utc>,
    ) -> Result<()> {
        export::write_density_report(writer, self.snapshot, &self.metrics(), territories, generated_at)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter { name, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
