//! # Graph Model
//!
//! Value objects that cross every boundary: provider ↔ analysis ↔ renderer.
//!
//! Design rule: NO DOM handles, NO layout engine types here.
//! This module is pure data without I/O or state.

pub mod node;
pub mod edge;
pub mod geometry;
pub mod snapshot;
pub mod sample;

pub use node::{Node, NodeId};
pub use edge::{Edge, EdgeId, EdgeKind};
pub use geometry::{BoundingBox, Identity, Layout, Point, Projection, ViewTransform};
pub use snapshot::GraphSnapshot;
pub use sample::{Classification, ConnectionSuggestion, DensitySample, EmptyZone, Territory, TerritoryMap};
