#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the geometry module.
pub mod error;

/// vertex and bounding box primitives.
pub mod bbox;

/// segment intersection utilities.
pub mod line;

/// closed polygon rings.
pub mod ring;

/// polygons made of outer rings and holes.
pub mod mpoly;

/// classification of the relation between two rings.
pub mod relation;

pub use crate::bbox::{Bbox, Vertex};
pub use crate::error::GeometryError;
pub use crate::line::{
    classify_segments, line_intersects_line, line_line_intersection, SegmentIntersection,
};
pub use crate::mpoly::Mpoly;
pub use crate::relation::{ring_ring_relation, RingRelation};
pub use crate::ring::Ring;
