use serde::{Deserialize, Serialize};

/// A point in 2D space with double precision coordinates.
///
/// # Examples
///
/// ```
/// use ndvtrace_geometry::Vertex;
///
/// let v = Vertex::new(1.0, 2.0);
///
/// assert_eq!(v.x, 1.0);
/// assert_eq!(v.y, 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
}

impl Vertex {
    /// Create a new vertex.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between this vertex and another one.
    pub fn midpoint(&self, other: &Vertex) -> Vertex {
        Vertex::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl std::fmt::Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vertex {
    fn from((x, y): (f64, f64)) -> Self {
        Vertex { x, y }
    }
}

/// Axis aligned bounding box accumulator.
///
/// A freshly created box is empty. The first call to [`Bbox::expand`] sets the
/// extent to the given point and later calls grow it.
///
/// # Examples
///
/// ```
/// use ndvtrace_geometry::{Bbox, Vertex};
///
/// let mut bbox = Bbox::default();
/// assert!(bbox.empty);
///
/// bbox.expand(&Vertex::new(1.0, 2.0));
/// bbox.expand(&Vertex::new(-1.0, 5.0));
///
/// assert!(!bbox.empty);
/// assert_eq!((bbox.min_x, bbox.max_x), (-1.0, 1.0));
/// assert_eq!((bbox.min_y, bbox.max_y), (2.0, 5.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// minimum x coordinate.
    pub min_x: f64,
    /// maximum x coordinate.
    pub max_x: f64,
    /// minimum y coordinate.
    pub min_y: f64,
    /// maximum y coordinate.
    pub max_y: f64,
    /// true until the first point is added.
    pub empty: bool,
}

impl Default for Bbox {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
            empty: true,
        }
    }
}

impl Bbox {
    /// Grow the box so that it contains the given vertex.
    pub fn expand(&mut self, v: &Vertex) {
        if self.empty {
            self.empty = false;
            self.min_x = v.x;
            self.max_x = v.x;
            self.min_y = v.y;
            self.max_y = v.y;
        } else {
            self.min_x = self.min_x.min(v.x);
            self.min_y = self.min_y.min(v.y);
            self.max_x = self.max_x.max(v.x);
            self.max_y = self.max_y.max(v.y);
        }
    }

    /// Grow the box so that it contains another box. Empty boxes are ignored.
    pub fn expand_bbox(&mut self, other: &Bbox) {
        if other.empty {
            return;
        }
        self.expand(&Vertex::new(other.min_x, other.min_y));
        self.expand(&Vertex::new(other.max_x, other.max_y));
    }

    /// Smallest box containing both inputs.
    pub fn union(a: &Bbox, b: &Bbox) -> Bbox {
        let mut out = *a;
        out.expand_bbox(b);
        out
    }

    /// Whether the two boxes cannot share any point.
    ///
    /// Empty boxes are disjoint from everything. Boxes that only touch along
    /// an edge or a corner are not disjoint.
    pub fn is_disjoint(&self, other: &Bbox) -> bool {
        self.empty
            || other.empty
            || self.min_x > other.max_x
            || self.min_y > other.max_y
            || other.min_x > self.max_x
            || other.min_y > self.max_y
    }
}

impl FromIterator<Vertex> for Bbox {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        iter.into_iter().fold(Bbox::default(), |mut bbox, v| {
            bbox.expand(&v);
            bbox
        })
    }
}
