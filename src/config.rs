//! Analysis configuration.
//!
//! Every tunable the analyses use lives here so callers can test boundary
//! values instead of relying on constants baked into the algorithms.

use serde::{Deserialize, Serialize};
use crate::structure::hierarchy::LevelPolicy;
use crate::{Error, Result};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_HUB_THRESHOLD: usize = 2;
pub const DEFAULT_HEATMAP_RADIUS: f64 = 100.0;
pub const DEFAULT_TERRITORY_MIN_RADIUS: f64 = 50.0;
pub const DEFAULT_GRID_MARGIN: f64 = 100.0;
pub const DEFAULT_GRID_CELL_SIZE: f64 = 150.0;
pub const DEFAULT_GRID_INFLUENCE: f64 = 1.5;
pub const DEFAULT_GRID_MAX_CELLS: usize = 10_000;

// ============================================================================
// AnalysisConfig
// ============================================================================

/// Parameters for every analysis the [`Analyzer`](crate::Analyzer) runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// A node is a hub when its degree is strictly greater than this.
    pub hub_threshold: usize,
    pub level_policy: LevelPolicy,
    /// Pixel radius at which a heatmap spot fades to zero.
    pub heatmap_radius: f64,
    /// Smallest radius a territory circle is drawn with.
    pub territory_min_radius: f64,
    pub grid: GridParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hub_threshold: DEFAULT_HUB_THRESHOLD,
            level_policy: LevelPolicy::default(),
            heatmap_radius: DEFAULT_HEATMAP_RADIUS,
            territory_min_radius: DEFAULT_TERRITORY_MIN_RADIUS,
            grid: GridParams::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_hub_threshold(mut self, threshold: usize) -> Self {
        self.hub_threshold = threshold;
        self
    }

    pub fn with_level_policy(mut self, policy: LevelPolicy) -> Self {
        self.level_policy = policy;
        self
    }

    pub fn with_heatmap_radius(mut self, radius: f64) -> Self {
        self.heatmap_radius = radius;
        self
    }

    pub fn with_territory_min_radius(mut self, radius: f64) -> Self {
        self.territory_min_radius = radius;
        self
    }

    pub fn with_grid(mut self, grid: GridParams) -> Self {
        self.grid = grid;
        self
    }

    /// Reject parameter misuse before any computation starts.
    pub fn validate(&self) -> Result<()> {
        check_radius("heatmap_radius", self.heatmap_radius)?;
        check_radius("territory_min_radius", self.territory_min_radius)?;
        self.grid.validate()
    }
}

// ============================================================================
// GridParams
// ============================================================================

/// Spatial grid sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridParams {
    /// Added on every side of the node bounding box.
    pub margin: f64,
    /// Step between candidate cell centres, and the emitted cell size.
    pub cell_size: f64,
    /// Nodes within `influence * cell_size` of a centre count toward it.
    pub influence: f64,
    /// Upper bound on candidate centres; the step widens past it.
    pub max_cells: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_GRID_MARGIN,
            cell_size: DEFAULT_GRID_CELL_SIZE,
            influence: DEFAULT_GRID_INFLUENCE,
            max_cells: DEFAULT_GRID_MAX_CELLS,
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::invalid("cell_size", format!("must be a positive number, got {}", self.cell_size)));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Error::invalid("margin", format!("must be non-negative, got {}", self.margin)));
        }
        if !self.influence.is_finite() || self.influence <= 0.0 {
            return Err(Error::invalid("influence", format!("must be a positive number, got {}", self.influence)));
        }
        if self.max_cells == 0 {
            return Err(Error::invalid("max_cells", "must be at least 1"));
        }
        Ok(())
    }
}

pub(crate) fn check_radius(name: &'static str, radius: f64) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::invalid(name, format!("must be a non-negative number, got {radius}")));
    }
    Ok(())
}
