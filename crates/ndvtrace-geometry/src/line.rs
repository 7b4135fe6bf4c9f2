use crate::{bbox::Vertex, error::GeometryError};

/// How two line segments meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentIntersection {
    /// The segments share no point.
    None,
    /// The segments cross at a single point interior to both of them.
    Proper,
    /// The segments share a single point which is an endpoint of at least one of them.
    Touching,
    /// The segments lie on the same line and overlap along a stretch of it.
    Collinear,
}

/// Parameters of the intersection of the lines through `p1 p2` and `p3 p4`.
///
/// Returns `(numer_a, numer_b, denom)` such that the intersection point is at
/// `p1 + (p2 - p1) * numer_a / denom` and `p3 + (p4 - p3) * numer_b / denom`.
fn intersection_params(p1: Vertex, p2: Vertex, p3: Vertex, p4: Vertex) -> (f64, f64, f64) {
    let numer_a = (p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x);
    let numer_b = (p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x);
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    (numer_a, numer_b, denom)
}

/// Overlap of two segments known to lie on the same line.
fn collinear_overlap(p1: Vertex, p2: Vertex, p3: Vertex, p4: Vertex) -> SegmentIntersection {
    if p1 == p2 && p3 == p4 {
        return if p1 == p3 {
            SegmentIntersection::Touching
        } else {
            SegmentIntersection::None
        };
    }

    // project on the axis along which the segments extend the most
    let extent_x = (p2.x - p1.x).abs() + (p4.x - p3.x).abs();
    let extent_y = (p2.y - p1.y).abs() + (p4.y - p3.y).abs();
    let (a1, a2, b1, b2) = if extent_x >= extent_y {
        (p1.x, p2.x, p3.x, p4.x)
    } else {
        (p1.y, p2.y, p3.y, p4.y)
    };

    let lo = a1.min(a2).max(b1.min(b2));
    let hi = a1.max(a2).min(b1.max(b2));

    if lo > hi {
        SegmentIntersection::None
    } else if lo == hi {
        SegmentIntersection::Touching
    } else {
        SegmentIntersection::Collinear
    }
}

/// Classify how the segment `p1 p2` meets the segment `p3 p4`.
///
/// The computation is exact for inputs on a pixel lattice: shared endpoints
/// give parameters of exactly 0 or 1 and are reported as
/// [`SegmentIntersection::Touching`].
///
/// # Examples
///
/// ```
/// use ndvtrace_geometry::{classify_segments, SegmentIntersection, Vertex};
///
/// let kind = classify_segments(
///     Vertex::new(0.0, 0.0),
///     Vertex::new(2.0, 2.0),
///     Vertex::new(0.0, 2.0),
///     Vertex::new(2.0, 0.0),
/// );
/// assert_eq!(kind, SegmentIntersection::Proper);
/// ```
pub fn classify_segments(
    p1: Vertex,
    p2: Vertex,
    p3: Vertex,
    p4: Vertex,
) -> SegmentIntersection {
    let (numer_a, numer_b, denom) = intersection_params(p1, p2, p3, p4);

    if denom == 0.0 {
        if numer_a == 0.0 && numer_b == 0.0 {
            return collinear_overlap(p1, p2, p3, p4);
        }
        // parallel
        return SegmentIntersection::None;
    }

    let ua = numer_a / denom;
    let ub = numer_b / denom;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return SegmentIntersection::None;
    }

    if ua > 0.0 && ua < 1.0 && ub > 0.0 && ub < 1.0 {
        SegmentIntersection::Proper
    } else {
        SegmentIntersection::Touching
    }
}

/// Check whether the segment `p1 p2` intersects the segment `p3 p4`.
///
/// Segments touching at an endpoint intersect. Collinear overlapping
/// segments have no single intersection point: they are reported as
/// [`GeometryError::CoincidentSegments`] when `fail_on_coincident` is set and
/// as not intersecting otherwise.
///
/// # Arguments
///
/// * `p1`, `p2` - The endpoints of the first segment.
/// * `p3`, `p4` - The endpoints of the second segment.
/// * `fail_on_coincident` - Whether overlapping collinear segments are an error.
pub fn line_intersects_line(
    p1: Vertex,
    p2: Vertex,
    p3: Vertex,
    p4: Vertex,
    fail_on_coincident: bool,
) -> Result<bool, GeometryError> {
    match classify_segments(p1, p2, p3, p4) {
        SegmentIntersection::None => Ok(false),
        SegmentIntersection::Proper | SegmentIntersection::Touching => Ok(true),
        SegmentIntersection::Collinear if fail_on_coincident => {
            Err(GeometryError::CoincidentSegments)
        }
        SegmentIntersection::Collinear => Ok(false),
    }
}

/// Intersection point of the infinite lines through `p1 p2` and `p3 p4`.
///
/// Returns `None` when the lines are parallel or coincident.
pub fn line_line_intersection(p1: Vertex, p2: Vertex, p3: Vertex, p4: Vertex) -> Option<Vertex> {
    let (numer_a, _, denom) = intersection_params(p1, p2, p3, p4);
    if denom == 0.0 {
        return None;
    }
    let ua = numer_a / denom;
    Some(Vertex::new(
        p1.x + ua * (p2.x - p1.x),
        p1.y + ua * (p2.y - p1.y),
    ))
}
