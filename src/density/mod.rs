//! # Spatial Density Model
//!
//! Per-node intensity lookup and the severity bands every density overlay
//! shares:
//!
//! | Band | Intensity | Accent |
//! |------|-----------|--------|
//! | `High` | > 0.7 | red |
//! | `Medium` | > 0.3 and ≤ 0.7 | orange |
//! | `Low` | ≤ 0.3 | blue |
//! | `NoData` | unscored | grey |
//!
//! `NoData` is never folded into `Low`: a node nobody scored is not a node
//! scored as sparse.

pub mod heatmap;
pub mod territory;
pub mod grid;
pub mod overlay;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{DensitySample, GraphSnapshot, NodeId};

pub use heatmap::{heatmap_spots, HeatmapSpot, GradientStop, Raster};
pub use territory::{territory_badges, territory_shapes, TerritoryBadge, TerritoryShape};
pub use grid::{sample_grid, GridCell};
pub use overlay::{empty_zone_markers, suggested_links, SuggestedLink, ZoneMarker};

pub const HIGH_THRESHOLD: f64 = 0.7;
pub const MEDIUM_THRESHOLD: f64 = 0.3;

// ============================================================================
// Colour
// ============================================================================

/// 8-bit RGB with a fractional alpha, the way canvas styles are written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Bands
// ============================================================================

/// Severity band of a node or a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DensityBand {
    NoData,
    Low,
    Medium,
    High,
}

impl DensityBand {
    /// Band of a scored intensity.
    pub fn of(intensity: f64) -> Self {
        if intensity > HIGH_THRESHOLD {
            DensityBand::High
        } else if intensity > MEDIUM_THRESHOLD {
            DensityBand::Medium
        } else {
            DensityBand::Low
        }
    }

    /// Band of an optional intensity; `None` is [`DensityBand::NoData`].
    pub fn of_optional(intensity: Option<f64>) -> Self {
        intensity.map_or(DensityBand::NoData, DensityBand::of)
    }

    /// Accent colour used for borders, grid cells and badges.
    pub fn accent(&self) -> Rgba {
        match self {
            DensityBand::High => Rgba::rgb(239, 68, 68),
            DensityBand::Medium => Rgba::rgb(245, 158, 11),
            DensityBand::Low => Rgba::rgb(59, 130, 246),
            DensityBand::NoData => Rgba::rgb(107, 114, 128),
        }
    }

    /// Light fill paired with [`accent`](Self::accent).
    pub fn fill(&self) -> Rgba {
        match self {
            DensityBand::High => Rgba::rgb(254, 202, 202),
            DensityBand::Medium => Rgba::rgb(254, 215, 170),
            DensityBand::Low => Rgba::rgb(219, 234, 254),
            DensityBand::NoData => Rgba::rgb(243, 244, 246),
        }
    }

    pub fn is_scored(&self) -> bool {
        !matches!(self, DensityBand::NoData)
    }
}

impl std::fmt::Display for DensityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DensityBand::High => write!(f, "high"),
            DensityBand::Medium => write!(f, "medium"),
            DensityBand::Low => write!(f, "low"),
            DensityBand::NoData => write!(f, "no data"),
        }
    }
}

// ============================================================================
// DensityModel
// ============================================================================

/// Intensity samples indexed by node id.
///
/// Samples keep their arrival order, which is also heatmap draw order.
/// A repeated node id overwrites the earlier value in place. Non-finite
/// intensities are dropped; finite ones are clamped to `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityModel {
    samples: Vec<DensitySample>,
    index: HashMap<NodeId, usize>,
}

impl DensityModel {
    pub fn new(samples: impl IntoIterator<Item = DensitySample>) -> Self {
        let mut model = DensityModel::default();
        let mut dropped = 0usize;
        for mut sample in samples {
            if !sample.intensity.is_finite() {
                dropped += 1;
                continue;
            }
            sample.intensity = sample.intensity.clamp(0.0, 1.0);
            match model.index.get(&sample.node_id) {
                Some(&i) => model.samples[i].intensity = sample.intensity,
                None => {
                    model.index.insert(sample.node_id.clone(), model.samples.len());
                    model.samples.push(sample);
                }
            }
        }
        if dropped > 0 {
            warn!(dropped, "discarded non-finite density samples");
        }
        debug!(scored = model.samples.len(), "density model built");
        model
    }

    /// Parse the backend's `heatmapData` array.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let samples: Vec<DensitySample> = serde_json::from_str(json)?;
        Ok(Self::new(samples))
    }

    pub fn intensity(&self, id: &NodeId) -> Option<f64> {
        self.index.get(id).map(|&i| self.samples[i].intensity)
    }

    pub fn band_of(&self, id: &NodeId) -> DensityBand {
        DensityBand::of_optional(self.intensity(id))
    }

    pub fn is_scored(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Samples in draw order.
    pub fn samples(&self) -> &[DensitySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Count of snapshot nodes per band, unscored nodes included.
    pub fn band_counts(&self, snapshot: &GraphSnapshot) -> HashMap<DensityBand, usize> {
        let mut counts = HashMap::new();
        for node in snapshot.nodes() {
            *counts.entry(self.band_of(&node.id)).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Node styles
// ============================================================================

/// Per-node recolouring applied by the renderer when density is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub id: NodeId,
    pub band: DensityBand,
    pub background: Rgba,
    pub border: Rgba,
    pub border_width: u32,
    /// Halo colour; unscored nodes get none.
    pub shadow: Option<Rgba>,
}

impl NodeStyle {
    pub fn for_band(id: NodeId, band: DensityBand) -> Self {
        let border_width = match band {
            DensityBand::High => 5,
            DensityBand::Medium => 4,
            DensityBand::Low => 3,
            DensityBand::NoData => 2,
        };
        Self {
            id,
            band,
            background: band.fill(),
            border: band.accent(),
            border_width,
            shadow: band.is_scored().then(|| band.accent()),
        }
    }
}

/// One style per snapshot node, in snapshot order.
pub fn node_styles(snapshot: &GraphSnapshot, model: &DensityModel) -> Vec<NodeStyle> {
    snapshot
        .nodes()
        .iter()
        .map(|n| NodeStyle::for_band(n.id.clone(), model.band_of(&n.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(DensityBand::of(0.71), DensityBand::High);
        assert_eq!(DensityBand::of(0.70), DensityBand::Medium);
        assert_eq!(DensityBand::of(0.31), DensityBand::Medium);
        assert_eq!(DensityBand::of(0.30), DensityBand::Low);
        assert_eq!(DensityBand::of(0.0), DensityBand::Low);
        assert_eq!(DensityBand::of_optional(None), DensityBand::NoData);
    }

    #[test]
    fn test_unscored_is_not_low() {
        let model = DensityModel::new([DensitySample::new("a", 0.1)]);
        assert_eq!(model.band_of(&"a".into()), DensityBand::Low);
        assert_eq!(model.band_of(&"b".into()), DensityBand::NoData);
        assert_eq!(model.intensity(&"b".into()), None);
    }

    #[test]
    fn test_samples_sanitised() {
        let model = DensityModel::new([
            DensitySample::new("a", 1.7),
            DensitySample::new("b", f64::NAN),
            DensitySample::new("c", -0.2),
            DensitySample::new("a", 0.5),
        ]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.intensity(&"a".into()), Some(0.5));
        assert_eq!(model.intensity(&"c".into()), Some(0.0));
        assert!(!model.is_scored(&"b".into()));
        assert_eq!(model.samples()[0].node_id, NodeId::from("a"));
    }

    #[test]
    fn test_from_json() {
        let model = DensityModel::from_json(r#"[{"nodeId": "x", "intensity": 0.9, "x": 1, "y": 2}]"#).unwrap();
        assert_eq!(model.band_of(&"x".into()), DensityBand::High);
    }

    #[test]
    fn test_node_styles() {
        let s = GraphSnapshot::new(vec![Node::new("hot"), Node::new("cold"), Node::new("none")], vec![]).unwrap();
        let model = DensityModel::new([DensitySample::new("hot", 0.8), DensitySample::new("cold", 0.2)]);
        let styles = node_styles(&s, &model);
        assert_eq!(styles[0].border_width, 5);
        assert_eq!(styles[0].border.to_hex(), "#ef4444");
        assert_eq!(styles[1].background.to_hex(), "#dbeafe");
        assert_eq!(styles[2].band, DensityBand::NoData);
        assert_eq!(styles[2].shadow, None);
        assert_eq!(styles[2].border_width, 2);

        let counts = model.band_counts(&s);
        assert_eq!(counts[&DensityBand::NoData], 1);
        assert_eq!(counts[&DensityBand::High], 1);
    }

    #[test]
    fn test_css() {
        assert_eq!(Rgba::rgb(255, 0, 0).with_alpha(0.4).to_css(), "rgba(255, 0, 0, 0.4)");
    }
}
