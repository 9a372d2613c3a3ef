//! Spatial grid sampling for sparse and over-dense zone discovery.
//!
//! The node bounding box, grown by a margin, is walked in fixed steps. Each
//! step point is a candidate cell centre whose local intensity is the plain
//! mean of the scored nodes within `influence * step` of it. Distance
//! only decides membership; it does not weight the mean. Candidates with no
//! scored node nearby are dropped, so the output is sparse.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DensityBand, DensityModel, Rgba};
use crate::config::GridParams;
use crate::model::{BoundingBox, GraphSnapshot, Layout, Point, Projection};
use crate::Result;

/// One emitted cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Projected (pixel) centre.
    pub center: Point,
    /// Canvas-space centre the cell was sampled at.
    pub canvas_center: Point,
    /// Edge length; equals the step actually walked. When the step is widened
    /// to respect `max_cells`, the influence radius (`influence * size`)
    /// widens with it.
    pub size: f64,
    pub local_intensity: f64,
    pub band: DensityBand,
    /// Scored nodes that fell inside the influence radius.
    pub samples: usize,
}

impl GridCell {
    /// Centre opacity of the cell's radial fill.
    pub fn fill_alpha(&self) -> f64 {
        0.3 * self.local_intensity
    }

    /// Colour at the cell centre.
    pub fn inner_color(&self) -> Rgba {
        self.band.accent().with_alpha(self.fill_alpha())
    }

    /// Colour at the cell rim.
    pub fn outer_color(&self) -> Rgba {
        self.band.accent().with_alpha(0.1)
    }
}

/// Number of step points along an axis of length `extent`, bounds inclusive.
///
/// Kept in `f64`: a huge but finite extent yields a huge count, never an
/// integer overflow.
fn steps(extent: f64, step: f64) -> f64 {
    (extent / step).floor() + 1.0
}

fn candidates(bounds: &BoundingBox, step: f64) -> f64 {
    steps(bounds.width(), step) * steps(bounds.height(), step)
}

/// Smallest step that keeps the walk within `max_cells` candidates.
///
/// The longer axis gets `floor(sqrt(max_cells))` points, so both axes fit
/// inside that square budget.
fn widened_step(bounds: &BoundingBox, max_cells: usize) -> f64 {
    let per_axis = (max_cells as f64).sqrt().floor().max(1.0);
    let longest = bounds.width().max(bounds.height());
    if per_axis > 1.0 { longest / (per_axis - 1.0) } else { longest * 2.0 }
}

/// Sample the density grid over the positioned nodes of `snapshot`.
///
/// No positioned node means nothing to sample: the result is empty, not an
/// error. Invalid [`GridParams`] are rejected.
pub fn sample_grid<L, P>(
    snapshot: &GraphSnapshot,
    layout: &L,
    model: &DensityModel,
    projection: &P,
    params: &GridParams,
) -> Result<Vec<GridCell>>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    params.validate()?;

    let positioned: Vec<(Point, Option<f64>)> = snapshot
        .nodes()
        .iter()
        .filter_map(|n| layout.position(&n.id).map(|p| (p, model.intensity(&n.id))))
        .filter(|(p, _)| p.is_finite())
        .collect();

    let Some(bounds) = BoundingBox::of(positioned.iter().map(|(p, _)| *p)) else {
        debug!("no positioned nodes, grid is empty");
        return Ok(Vec::new());
    };
    let bounds = bounds.expand(params.margin);

    let scored: Vec<(Point, f64)> = positioned
        .iter()
        .filter_map(|&(p, intensity)| intensity.map(|i| (p, i)))
        .collect();
    if scored.is_empty() {
        return Ok(Vec::new());
    }

    if !bounds.width().is_finite() || !bounds.height().is_finite() {
        warn!("node bounds overflow f64, grid is empty");
        return Ok(Vec::new());
    }

    let mut step = params.cell_size;
    let requested = candidates(&bounds, step);
    if requested > params.max_cells as f64 {
        step = widened_step(&bounds, params.max_cells);
        warn!(requested, max = params.max_cells, step, "grid too fine for bounds, step widened");
    }

    // Membership radius follows the step actually walked.
    let reach = params.influence * step;
    let (nx, ny) = (steps(bounds.width(), step) as usize, steps(bounds.height(), step) as usize);
    let mut cells = Vec::new();

    for ix in 0..nx {
        let x = bounds.min.x + ix as f64 * step;
        for iy in 0..ny {
            let y = bounds.min.y + iy as f64 * step;
            let at = Point::new(x, y);

            let (sum, count) = scored
                .iter()
                .filter(|(p, _)| p.distance(at) < reach)
                .fold((0.0, 0usize), |(s, c), (_, i)| (s + i, c + 1));
            if count == 0 {
                continue;
            }

            let local_intensity = sum / count as f64;
            cells.push(GridCell {
                center: projection.project(at),
                canvas_center: at,
                size: step,
                local_intensity,
                band: DensityBand::of(local_intensity),
                samples: count,
            });
        }
    }

    debug!(candidates = nx * ny, cells = cells.len(), step, "density grid sampled");
    Ok(cells)
}
