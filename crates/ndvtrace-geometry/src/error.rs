/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// Error when a ring has too few points to enclose an area.
    #[error("Ring with {0} points is degenerate, at least 3 are needed")]
    DegenerateRing(usize),

    /// Error when two segments lie on the same line and overlap.
    #[error("Segments are coincident")]
    CoincidentSegments,

    /// Error when a ring index is out of range.
    #[error("Ring index ({0}) is out of range for {1} rings")]
    InvalidRingIndex(usize, usize),

    /// Error when an operation expects an outer ring but gets a hole.
    #[error("Ring {0} is a hole, expected an outer ring")]
    NotAnOuterRing(usize),

    /// Error when a hole references a ring that is not a valid outer ring.
    #[error("Hole {hole} references invalid parent {parent:?}")]
    InvalidParent {
        /// index of the offending hole.
        hole: usize,
        /// the parent index stored in the hole.
        parent: Option<usize>,
    },

    /// Error when a hole is not contained by any outer ring.
    #[error("Hole {0} is not contained by any outer ring")]
    OrphanHole(usize),
}
