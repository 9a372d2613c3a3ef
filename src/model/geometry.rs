//! Points, the caller-supplied projection, and the layout contract.
//!
//! The core never owns positions. A [`Layout`] answers "where is this node?"
//! in canvas space; a [`Projection`] turns canvas space into the pixel space
//! the renderer draws in.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use super::NodeId;

/// A 2D point, in canvas or pixel space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of a set of points. `None` when empty.
    pub fn centroid(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Canvas → pixel conversion supplied by the rendering layer.
pub trait Projection {
    fn project(&self, point: Point) -> Point;
}

/// Pixel space equals canvas space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn project(&self, point: Point) -> Point {
        point
    }
}

/// Pan/zoom camera: `pixel = canvas * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 1.0 }
    }
}

impl ViewTransform {
    /// Camera centred on `view_center` (canvas space) inside a viewport of
    /// the given pixel size.
    pub fn centered(view_center: Point, scale: f64, width: f64, height: f64) -> Self {
        Self {
            x: width / 2.0 - view_center.x * scale,
            y: height / 2.0 - view_center.y * scale,
            k: scale,
        }
    }
}

impl Projection for ViewTransform {
    fn project(&self, point: Point) -> Point {
        Point::new(point.x * self.k + self.x, point.y * self.k + self.y)
    }
}

impl<F> Projection for F
where
    F: Fn(Point) -> Point,
{
    fn project(&self, point: Point) -> Point {
        self(point)
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Canvas-space node positions supplied by the layout engine.
pub trait Layout {
    fn position(&self, id: &NodeId) -> Option<Point>;
}

impl Layout for HashMap<NodeId, Point> {
    fn position(&self, id: &NodeId) -> Option<Point> {
        self.get(id).copied()
    }
}

impl Layout for std::collections::HashMap<NodeId, Point> {
    fn position(&self, id: &NodeId) -> Option<Point> {
        self.get(id).copied()
    }
}

impl<L: Layout + ?Sized> Layout for &L {
    fn position(&self, id: &NodeId) -> Option<Point> {
        (**self).position(id)
    }
}

// ============================================================================
// Bounding box
// ============================================================================

/// Axis-aligned bounds in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Bounds of the finite points in `points`. `None` when there are none.
    pub fn of(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut bounds: Option<BoundingBox> = None;
        for p in points.into_iter().filter(Point::is_finite) {
            bounds = Some(match bounds {
                None => BoundingBox { min: p, max: p },
                Some(b) => BoundingBox {
                    min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                    max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
                },
            });
        }
        bounds
    }

    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
