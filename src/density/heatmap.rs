//! Heatmap rasterization.
//!
//! Every scored node with a known position becomes one radial-gradient spot
//! centred on its projected pixel. Spots are drawn in sample order with
//! tiny-skia's source-over compositing. There is no incremental mode: any
//! parameter change re-renders the whole raster.

use serde::{Deserialize, Serialize};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, RadialGradient, SpreadMode, Transform};
use tracing::{debug, trace};

use super::{DensityBand, DensityModel, Rgba};
use crate::config::check_radius;
use crate::model::{Layout, NodeId, Point, Projection};
use crate::{Error, Result};

/// Opacity at a fraction of the spot radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// 0 at the centre, 1 at the rim.
    pub offset: f64,
    pub alpha: f64,
}

const fn stop(offset: f64, alpha: f64) -> GradientStop {
    GradientStop { offset, alpha }
}

const HOT_STOPS: [GradientStop; 3] = [stop(0.0, 0.8), stop(0.5, 0.4), stop(1.0, 0.0)];
const COLD_STOPS: [GradientStop; 3] = [stop(0.0, 0.1), stop(0.5, 0.2), stop(1.0, 0.0)];

/// Heat colour and gradient for a scored band. `None` for unscored.
fn heat(band: DensityBand) -> Option<(Rgba, [GradientStop; 3])> {
    match band {
        DensityBand::High => Some((Rgba::rgb(255, 0, 0), HOT_STOPS)),
        DensityBand::Medium => Some((Rgba::rgb(255, 165, 0), HOT_STOPS)),
        DensityBand::Low => Some((Rgba::rgb(0, 100, 255), COLD_STOPS)),
        DensityBand::NoData => None,
    }
}

/// One radial falloff primitive, in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSpot {
    pub node_id: NodeId,
    pub center: Point,
    pub radius: f64,
    pub band: DensityBand,
    pub intensity: f64,
    /// Opaque base colour; opacity comes from `stops`.
    pub color: Rgba,
    pub stops: [GradientStop; 3],
}

impl HeatmapSpot {
    /// Peak opacity, at the centre.
    pub fn peak_alpha(&self) -> f64 {
        self.stops.iter().map(|s| s.alpha).fold(0.0, f64::max)
    }
}

/// Build the heatmap spots for every scored, positioned node.
///
/// Unscored nodes and nodes without a position contribute nothing.
/// A negative or non-finite `radius` is rejected.
pub fn heatmap_spots<L, P>(
    layout: &L,
    model: &DensityModel,
    projection: &P,
    radius: f64,
) -> Result<Vec<HeatmapSpot>>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    check_radius("radius", radius)?;

    let mut spots = Vec::with_capacity(model.len());
    for sample in model.samples() {
        let Some(position) = layout.position(&sample.node_id) else {
            continue;
        };
        let center = projection.project(position);
        if !center.is_finite() {
            continue;
        }
        let band = DensityBand::of(sample.intensity);
        let Some((color, stops)) = heat(band) else {
            continue;
        };
        spots.push(HeatmapSpot {
            node_id: sample.node_id.clone(),
            center,
            radius,
            band,
            intensity: sample.intensity,
            color,
            stops,
        });
    }

    debug!(samples = model.len(), spots = spots.len(), radius, "heatmap spots built");
    Ok(spots)
}

// ============================================================================
// Raster
// ============================================================================

/// RGBA heatmap canvas backed by a tiny-skia [`Pixmap`].
///
/// Each spot is filled as a circle with a radial gradient shader and the
/// default source-over blend, so overlapping spots layer in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Raster {
    /// Fully transparent raster. Zero-sized canvases are rejected.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::invalid("size", format!("cannot allocate a {width}x{height} raster")))?;
        Ok(Self { pixmap })
    }

    /// Rasterize `spots` in order onto a fresh canvas.
    pub fn render(width: u32, height: u32, spots: &[HeatmapSpot]) -> Result<Self> {
        let mut raster = Raster::new(width, height)?;
        for spot in spots {
            raster.draw(spot);
        }
        Ok(raster)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Composite one spot over the current contents.
    ///
    /// Spots with a zero radius draw nothing.
    pub fn draw(&mut self, spot: &HeatmapSpot) {
        if spot.radius <= 0.0 {
            return;
        }
        let (cx, cy, r) = (spot.center.x as f32, spot.center.y as f32, spot.radius as f32);
        let stops = spot
            .stops
            .iter()
            .map(|s| {
                let alpha = (s.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
                tiny_skia::GradientStop::new(
                    s.offset as f32,
                    Color::from_rgba8(spot.color.r, spot.color.g, spot.color.b, alpha),
                )
            })
            .collect();
        let center = tiny_skia::Point::from_xy(cx, cy);
        let Some(shader) = RadialGradient::new(center, center, r, stops, SpreadMode::Pad, Transform::identity()) else {
            trace!(node = %spot.node_id, radius = spot.radius, "spot has no drawable gradient");
            return;
        };
        let Some(circle) = PathBuilder::from_circle(cx, cy, r) else {
            return;
        };

        let paint = Paint { shader, anti_alias: true, ..Paint::default() };
        self.pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Straight RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// PNG encoding of the canvas, ready to overlay on the graph view.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(|e| Error::Render(e.to_string()))
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}
