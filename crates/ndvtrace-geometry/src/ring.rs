use serde::{Deserialize, Serialize};

use crate::{
    bbox::{Bbox, Vertex},
    error::GeometryError,
};

/// A closed polygon boundary.
///
/// The last point connects back to the first one, so the closing vertex is not
/// repeated. A hole records the index of its outer ring in the owning
/// [`Mpoly`](crate::Mpoly) through `parent_id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// vertices of the ring.
    pub pts: Vec<Vertex>,
    /// whether the ring bounds a hole of its parent.
    pub is_hole: bool,
    /// index of the outer ring owning this hole, only meaningful for holes.
    pub parent_id: Option<usize>,
}

impl Ring {
    /// Create an outer ring from its vertices.
    pub fn new(pts: Vec<Vertex>) -> Self {
        Self {
            pts,
            is_hole: false,
            parent_id: None,
        }
    }

    /// Create a hole owned by the outer ring at `parent_id`.
    pub fn new_hole(pts: Vec<Vertex>, parent_id: usize) -> Self {
        Self {
            pts,
            is_hole: true,
            parent_id: Some(parent_id),
        }
    }

    /// Copy everything except for the points.
    pub fn copy_metadata(&self) -> Ring {
        Ring {
            pts: Vec::new(),
            is_hole: self.is_hole,
            parent_id: self.parent_id,
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Iterate over the edges of the closed ring as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| (self.pts[i], self.pts[(i + 1) % n]))
    }

    /// Bounding box of the ring vertices.
    pub fn bbox(&self) -> Bbox {
        self.pts.iter().copied().collect()
    }

    /// Signed area of the ring, positive for counter-clockwise winding.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateRing`] for rings with fewer than 3 points.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndvtrace_geometry::{Ring, Vertex};
    ///
    /// let mut ring = Ring::new(vec![
    ///     Vertex::new(0.0, 0.0),
    ///     Vertex::new(1.0, 0.0),
    ///     Vertex::new(1.0, 1.0),
    ///     Vertex::new(0.0, 1.0),
    /// ]);
    /// assert_eq!(ring.oriented_area().unwrap(), 1.0);
    ///
    /// ring.reverse();
    /// assert_eq!(ring.oriented_area().unwrap(), -1.0);
    /// ```
    pub fn oriented_area(&self) -> Result<f64, GeometryError> {
        if self.pts.len() < 3 {
            return Err(GeometryError::DegenerateRing(self.pts.len()));
        }

        let twice_area = self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>();

        Ok(twice_area / 2.0)
    }

    /// Unsigned area of the ring.
    pub fn area(&self) -> Result<f64, GeometryError> {
        Ok(self.oriented_area()?.abs())
    }

    /// Whether the ring winds counter-clockwise.
    pub fn is_ccw(&self) -> Result<bool, GeometryError> {
        Ok(self.oriented_area()? > 0.0)
    }

    /// Flip the vertex order, negating the oriented area.
    pub fn reverse(&mut self) {
        self.pts.reverse();
    }

    /// Point in polygon test by counting crossings of a horizontal ray.
    ///
    /// Points on the boundary may be reported either way; use
    /// [`Ring::on_boundary`] when that matters. Rings with fewer than 3 points
    /// contain nothing.
    pub fn contains(&self, p: Vertex) -> bool {
        if self.pts.len() < 3 {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Whether the point lies exactly on one of the ring edges.
    pub fn on_boundary(&self, p: Vertex) -> bool {
        self.edges().any(|(a, b)| {
            let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            cross == 0.0
                && p.x >= a.x.min(b.x)
                && p.x <= a.x.max(b.x)
                && p.y >= a.y.min(b.y)
                && p.y <= a.y.max(b.y)
        })
    }
}
