use crate::{
    bbox::Vertex,
    line::{classify_segments, SegmentIntersection},
    ring::Ring,
};

/// Relation between two rings, as returned by [`ring_ring_relation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingRelation {
    /// The first ring encloses the second one.
    Contains,
    /// The first ring is enclosed by the second one.
    ContainedBy,
    /// The boundaries of the rings cross each other.
    Crosses,
    /// The rings do not overlap.
    Disjoint,
}

/// Where the samples of one ring fall with respect to another ring.
#[derive(Debug, Default)]
struct SampleTally {
    inside: bool,
    outside: bool,
}

impl SampleTally {
    /// Classify the vertices and edge midpoints of `ring` against `other`.
    ///
    /// Samples lying on the boundary of `other` carry no information and are skipped.
    fn of(ring: &Ring, other: &Ring) -> Self {
        let mut tally = SampleTally::default();
        let samples = ring
            .edges()
            .flat_map(|(a, b)| [a, a.midpoint(&b)]);

        for p in samples {
            if other.on_boundary(p) {
                continue;
            }
            if other.contains(p) {
                tally.inside = true;
            } else {
                tally.outside = true;
            }
            if tally.inside && tally.outside {
                break;
            }
        }
        tally
    }

    fn is_mixed(&self) -> bool {
        self.inside && self.outside
    }

    fn is_undecided(&self) -> bool {
        !self.inside && !self.outside
    }
}

fn has_proper_crossing(r1: &Ring, r2: &Ring) -> bool {
    r1.edges().any(|(p1, p2)| {
        r2.edges()
            .any(|(p3, p4)| classify_segments(p1, p2, p3, p4) == SegmentIntersection::Proper)
    })
}

/// Classify how ring `r1` relates to ring `r2`.
///
/// The classification is total and deterministic:
///
/// 1. Rings whose bounding boxes are disjoint are [`RingRelation::Disjoint`].
/// 2. Any pair of edges crossing at a point interior to both edges gives
///    [`RingRelation::Crosses`]. Edges that only touch at an endpoint or run
///    along each other do not count as crossing.
/// 3. Otherwise the vertices and edge midpoints of each ring are tested
///    against the other ring, ignoring samples that lie on its boundary.
///    Samples both inside and outside on either side mean the rings overlap
///    partially, which is also [`RingRelation::Crosses`]. Samples of `r1`
///    inside `r2` give [`RingRelation::ContainedBy`], samples of `r2` inside
///    `r1` give [`RingRelation::Contains`].
/// 4. When every sample of both rings lies on the other boundary, as for a
///    ring compared with itself, the larger ring contains the smaller one and
///    a ring contains an equal-area ring.
///
/// Rings with fewer than 3 points are disjoint from everything.
///
/// # Examples
///
/// ```
/// use ndvtrace_geometry::{ring_ring_relation, Ring, RingRelation, Vertex};
///
/// let square = |x0: f64, y0: f64, size: f64| {
///     Ring::new(vec![
///         Vertex::new(x0, y0),
///         Vertex::new(x0 + size, y0),
///         Vertex::new(x0 + size, y0 + size),
///         Vertex::new(x0, y0 + size),
///     ])
/// };
///
/// let outer = square(0.0, 0.0, 10.0);
/// let inner = square(2.0, 2.0, 3.0);
///
/// assert_eq!(ring_ring_relation(&outer, &inner), RingRelation::Contains);
/// assert_eq!(ring_ring_relation(&inner, &outer), RingRelation::ContainedBy);
/// ```
pub fn ring_ring_relation(r1: &Ring, r2: &Ring) -> RingRelation {
    if r1.len() < 3 || r2.len() < 3 {
        return RingRelation::Disjoint;
    }

    if r1.bbox().is_disjoint(&r2.bbox()) {
        return RingRelation::Disjoint;
    }

    if has_proper_crossing(r1, r2) {
        return RingRelation::Crosses;
    }

    let r1_vs_r2 = SampleTally::of(r1, r2);
    let r2_vs_r1 = SampleTally::of(r2, r1);

    if r1_vs_r2.is_mixed() || r2_vs_r1.is_mixed() {
        return RingRelation::Crosses;
    }

    if r1_vs_r2.inside {
        return RingRelation::ContainedBy;
    }

    if r2_vs_r1.inside {
        return RingRelation::Contains;
    }

    if r1_vs_r2.is_undecided() && r2_vs_r1.is_undecided() {
        // identical boundaries, compare by area
        let a1 = r1.area().unwrap_or(0.0);
        let a2 = r2.area().unwrap_or(0.0);
        return if a1 >= a2 {
            RingRelation::Contains
        } else {
            RingRelation::ContainedBy
        };
    }

    RingRelation::Disjoint
}
