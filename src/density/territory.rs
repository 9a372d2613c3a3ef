//! Territory circles and badges.
//!
//! A territory is drawn as a circle around the centroid of its positioned
//! members, in pixel space. Badges are the light variant: a small tag pinned
//! to the territory's central node (or first member).
//!
//! Members without a known position are skipped. A territory with no
//! positioned member at all cannot be drawn and is left out.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Rgba;
use crate::config::check_radius;
use crate::model::{Classification, Layout, NodeId, Point, Projection, Territory};
use crate::Result;

/// Opacity of the territory disc fill.
pub const TERRITORY_FILL_ALPHA: f64 = 0.2;

/// Colour a classification is drawn in.
pub fn classification_color(classification: Classification) -> Rgba {
    match classification {
        Classification::Explored => Rgba::rgb(239, 68, 68),
        Classification::Frontier => Rgba::rgb(245, 158, 11),
        Classification::Unexplored => Rgba::rgb(59, 130, 246),
    }
}

/// Text anchored at a pixel position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
}

/// Circle plus caption for one territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryShape {
    pub classification: Classification,
    pub center: Point,
    pub radius: f64,
    /// Translucent disc fill.
    pub fill: Rgba,
    /// Opaque colour for the caption.
    pub color: Rgba,
    pub label: Label,
    /// Members that had a position and shaped the circle.
    pub positioned: usize,
}

/// Small tag pinned to a territory's anchor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryBadge {
    pub classification: Classification,
    pub anchor_node: NodeId,
    pub position: Point,
    pub color: Rgba,
    pub size: usize,
    /// `"E: 5"`, `"F: 2"`, ...
    pub text: String,
}

/// Circles for every drawable territory, in input order.
///
/// `min_radius` floors the circle so single-member or colocated territories
/// stay visible. Negative or non-finite values are rejected.
pub fn territory_shapes<'t, L, P>(
    territories: impl IntoIterator<Item = &'t Territory>,
    layout: &L,
    projection: &P,
    min_radius: f64,
) -> Result<Vec<TerritoryShape>>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    check_radius("min_radius", min_radius)?;

    let mut shapes = Vec::new();
    let mut skipped = 0usize;
    for territory in territories {
        match shape(territory, layout, projection, min_radius) {
            Some(s) => shapes.push(s),
            None => {
                trace!(classification = %territory.classification, members = territory.nodes.len(), "territory has no positioned member");
                skipped += 1;
            }
        }
    }
    debug!(shapes = shapes.len(), skipped, "territory shapes built");
    Ok(shapes)
}

fn shape<L, P>(territory: &Territory, layout: &L, projection: &P, min_radius: f64) -> Option<TerritoryShape>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    let points: Vec<Point> = territory
        .nodes
        .iter()
        .filter_map(|id| layout.position(id))
        .map(|p| projection.project(p))
        .filter(Point::is_finite)
        .collect();

    let center = Point::centroid(&points)?;
    let spread = points.iter().map(|p| p.distance(center)).fold(0.0, f64::max);
    let radius = spread.max(min_radius);

    let size = if territory.size == 0 { points.len() } else { territory.size };
    let color = classification_color(territory.classification);

    Some(TerritoryShape {
        classification: territory.classification,
        center,
        radius,
        fill: color.with_alpha(TERRITORY_FILL_ALPHA),
        color,
        label: Label {
            text: format!("{}: {} nodes", territory.classification, size),
            anchor: center,
        },
        positioned: points.len(),
    })
}

/// Badges for every non-empty territory whose anchor node has a position.
pub fn territory_badges<'t, L, P>(
    territories: impl IntoIterator<Item = &'t Territory>,
    layout: &L,
    projection: &P,
) -> Vec<TerritoryBadge>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    let badges: Vec<TerritoryBadge> = territories
        .into_iter()
        .filter_map(|t| {
            if t.nodes.is_empty() {
                return None;
            }
            let anchor = t.anchor()?;
            let position = projection.project(layout.position(anchor)?);
            if !position.is_finite() {
                return None;
            }
            Some(TerritoryBadge {
                classification: t.classification,
                anchor_node: anchor.clone(),
                position,
                color: classification_color(t.classification),
                size: t.size,
                text: format!("{}: {}", t.classification.code(), t.size),
            })
        })
        .collect();
    debug!(badges = badges.len(), "territory badges built");
    badges
}
