//! Guidance overlays: empty-zone markers and suggested connections.
//!
//! Both are drawn as dashed outlines on top of the graph. Empty zones come
//! with their own canvas coordinates; suggested connections are anchored on
//! node positions and vanish when either end is not placed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Rgba;
use crate::model::{ConnectionSuggestion, EmptyZone, Layout, NodeId, Point, Projection};

/// Marker radius used when a zone does not carry one.
pub const DEFAULT_EMPTY_ZONE_RADIUS: f64 = 50.0;

/// Dash pattern shared by both overlays, in pixels.
pub const DASH: [f64; 2] = [5.0, 5.0];

/// Dashed circle marking an empty zone, in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMarker {
    pub center: Point,
    /// Pixel radius; not scaled by the projection.
    pub radius: f64,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub dash: [f64; 2],
    pub opacity: f64,
    pub suggested_concepts: Vec<String>,
}

/// Dashed line between two nodes the backend suggests linking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedLink {
    pub from: NodeId,
    pub to: NodeId,
    pub start: Point,
    pub end: Point,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub dash: [f64; 2],
    pub opacity: f64,
    pub reason: String,
}

/// One marker per zone with finite coordinates.
///
/// A missing, zero or non-finite radius falls back to
/// [`DEFAULT_EMPTY_ZONE_RADIUS`].
pub fn empty_zone_markers<'z, P>(zones: impl IntoIterator<Item = &'z EmptyZone>, projection: &P) -> Vec<ZoneMarker>
where
    P: Projection + ?Sized,
{
    let markers: Vec<ZoneMarker> = zones
        .into_iter()
        .filter_map(|zone| {
            let center = projection.project(zone.center());
            if !center.is_finite() {
                return None;
            }
            let radius = if zone.radius.is_finite() && zone.radius != 0.0 {
                zone.radius.abs()
            } else {
                DEFAULT_EMPTY_ZONE_RADIUS
            };
            Some(ZoneMarker {
                center,
                radius,
                stroke: Rgba::rgb(156, 163, 175),
                stroke_width: 2.0,
                dash: DASH,
                opacity: 0.5,
                suggested_concepts: zone.suggested_concepts.clone(),
            })
        })
        .collect();
    debug!(markers = markers.len(), "empty zone markers built");
    markers
}

/// One line per suggestion whose endpoints both have a position.
pub fn suggested_links<'c, L, P>(
    suggestions: impl IntoIterator<Item = &'c ConnectionSuggestion>,
    layout: &L,
    projection: &P,
) -> Vec<SuggestedLink>
where
    L: Layout + ?Sized,
    P: Projection + ?Sized,
{
    let links: Vec<SuggestedLink> = suggestions
        .into_iter()
        .filter_map(|s| {
            let start = projection.project(layout.position(&s.from)?);
            let end = projection.project(layout.position(&s.to)?);
            if !start.is_finite() || !end.is_finite() {
                return None;
            }
            Some(SuggestedLink {
                from: s.from.clone(),
                to: s.to.clone(),
                start,
                end,
                stroke: Rgba::rgb(16, 185, 129),
                stroke_width: 2.0,
                dash: DASH,
                opacity: 0.6,
                reason: s.reason.clone(),
            })
        })
        .collect();
    debug!(links = links.len(), "suggested links built");
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Identity, ViewTransform};
    use hashbrown::HashMap;

    #[test]
    fn test_zone_radius_defaults() {
        let zones = [
            EmptyZone::new(0.0, 0.0),
            EmptyZone::new(10.0, 10.0).with_radius(80.0),
            EmptyZone::new(20.0, 20.0).with_radius(f64::NAN),
        ];
        let markers = empty_zone_markers(&zones, &Identity);
        let radii: Vec<f64> = markers.iter().map(|m| m.radius).collect();
        assert_eq!(radii, vec![50.0, 80.0, 50.0]);
        assert_eq!(markers[0].dash, [5.0, 5.0]);
    }

    #[test]
    fn test_zone_projected_but_radius_kept() {
        let view = ViewTransform { x: 100.0, y: 0.0, k: 2.0 };
        let markers = empty_zone_markers(&[EmptyZone::new(5.0, 5.0)], &view);
        assert_eq!(markers[0].center, Point::new(110.0, 10.0));
        assert_eq!(markers[0].radius, DEFAULT_EMPTY_ZONE_RADIUS);
    }

    #[test]
    fn test_zone_with_bad_coordinates_skipped() {
        let markers = empty_zone_markers(&[EmptyZone::new(f64::INFINITY, 0.0)], &Identity);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_link_needs_both_positions() {
        let layout: HashMap<NodeId, Point> =
            [(NodeId::from("a"), Point::new(0.0, 0.0)), (NodeId::from("b"), Point::new(30.0, 40.0))]
                .into_iter()
                .collect();
        let suggestions = [
            ConnectionSuggestion::new("a", "b"),
            ConnectionSuggestion::new("a", "unplaced"),
            ConnectionSuggestion::new("ghost", "b"),
        ];
        let links = suggested_links(&suggestions, &layout, &Identity);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].start.distance(links[0].end), 50.0);
        assert_eq!(links[0].stroke.to_hex(), "#10b981");
    }
}
