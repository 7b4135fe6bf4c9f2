use serde::{Deserialize, Serialize};

use crate::{
    bbox::{Bbox, Vertex},
    error::GeometryError,
    relation::{ring_ring_relation, RingRelation},
    ring::Ring,
};

/// A polygon made of one or more outer rings and their holes.
///
/// Holes reference their outer ring by position in `rings`, so the order of
/// the rings is significant. Use [`Mpoly::delete_ring`] to remove rings, it
/// keeps every `parent_id` pointing at the same outer ring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mpoly {
    /// outer rings and holes.
    pub rings: Vec<Ring>,
}

impl Mpoly {
    /// Create a polygon from its rings.
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Bounding box of all the rings.
    pub fn bbox(&self) -> Bbox {
        self.rings.iter().fold(Bbox::default(), |mut bbox, ring| {
            bbox.expand_bbox(&ring.bbox());
            bbox
        })
    }

    /// Bounding box of each ring, in ring order.
    pub fn ring_bboxes(&self) -> Vec<Bbox> {
        self.rings.iter().map(Ring::bbox).collect()
    }

    /// Indices of the holes owned by the outer ring at `outer_id`.
    pub fn holes_of(&self, outer_id: usize) -> impl Iterator<Item = usize> + '_ {
        self.rings
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.is_hole && r.parent_id == Some(outer_id))
            .map(|(i, _)| i)
    }

    fn outer_ring(&self, outer_id: usize) -> Result<&Ring, GeometryError> {
        let ring = self
            .rings
            .get(outer_id)
            .ok_or(GeometryError::InvalidRingIndex(outer_id, self.rings.len()))?;
        if ring.is_hole {
            return Err(GeometryError::NotAnOuterRing(outer_id));
        }
        Ok(ring)
    }

    /// Whether the point is inside the outer ring at `outer_id` but outside
    /// all of the holes owned by that ring.
    ///
    /// # Errors
    ///
    /// Returns an error if `outer_id` is out of range or refers to a hole.
    pub fn component_contains(&self, p: Vertex, outer_id: usize) -> Result<bool, GeometryError> {
        let outer = self.outer_ring(outer_id)?;
        if !outer.contains(p) {
            return Ok(false);
        }
        Ok(!self.holes_of(outer_id).any(|h| self.rings[h].contains(p)))
    }

    /// Whether the point is inside some outer ring and outside its holes.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndvtrace_geometry::{Mpoly, Ring, Vertex};
    ///
    /// let rect = |x0: f64, y0: f64, x1: f64, y1: f64| {
    ///     vec![
    ///         Vertex::new(x0, y0),
    ///         Vertex::new(x1, y0),
    ///         Vertex::new(x1, y1),
    ///         Vertex::new(x0, y1),
    ///     ]
    /// };
    ///
    /// let mpoly = Mpoly::new(vec![
    ///     Ring::new(rect(0.0, 0.0, 10.0, 10.0)),
    ///     Ring::new_hole(rect(4.0, 4.0, 6.0, 6.0), 0),
    /// ]);
    ///
    /// assert!(mpoly.contains(Vertex::new(1.0, 1.0)));
    /// assert!(!mpoly.contains(Vertex::new(5.0, 5.0)));
    /// assert!(!mpoly.contains(Vertex::new(11.0, 5.0)));
    /// ```
    pub fn contains(&self, p: Vertex) -> bool {
        (0..self.rings.len())
            .filter(|&i| !self.rings[i].is_hole)
            .any(|i| matches!(self.component_contains(p, i), Ok(true)))
    }

    /// Check that every hole references a valid outer ring.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (i, ring) in self.rings.iter().enumerate() {
            if !ring.is_hole {
                continue;
            }
            let valid = ring
                .parent_id
                .and_then(|p| self.rings.get(p))
                .is_some_and(|parent| !parent.is_hole);
            if !valid {
                return Err(GeometryError::InvalidParent {
                    hole: i,
                    parent: ring.parent_id,
                });
            }
        }
        Ok(())
    }

    /// Remove the ring at `idx` and re-index the holes.
    ///
    /// Removing an outer ring also removes the holes it owns, so no hole is
    /// left pointing at a missing parent. Every remaining `parent_id` is
    /// rewritten through an old to new index table: removing a single ring
    /// decrements by one the `parent_id` of each hole whose parent came after
    /// it.
    ///
    /// # Returns
    ///
    /// The removed rings, in their former order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidRingIndex`] when `idx` is out of range.
    pub fn delete_ring(&mut self, idx: usize) -> Result<Vec<Ring>, GeometryError> {
        let num_rings = self.rings.len();
        if idx >= num_rings {
            return Err(GeometryError::InvalidRingIndex(idx, num_rings));
        }

        let mut remove = vec![false; num_rings];
        remove[idx] = true;
        if !self.rings[idx].is_hole {
            for h in self.holes_of(idx) {
                remove[h] = true;
            }
        }

        let mut new_index = vec![None; num_rings];
        let mut next = 0;
        for (old, slot) in new_index.iter_mut().enumerate() {
            if !remove[old] {
                *slot = Some(next);
                next += 1;
            }
        }

        let mut removed = Vec::new();
        let old_rings = std::mem::take(&mut self.rings);
        for (old, ring) in old_rings.into_iter().enumerate() {
            if remove[old] {
                removed.push(ring);
            } else {
                self.rings.push(ring);
            }
        }

        for ring in self.rings.iter_mut().filter(|r| r.is_hole) {
            ring.parent_id = ring
                .parent_id
                .and_then(|p| new_index.get(p).copied().flatten());
        }

        log::debug!(
            "deleted ring {} ({} rings removed, {} remaining)",
            idx,
            removed.len(),
            self.rings.len()
        );

        Ok(removed)
    }

    /// Set the `parent_id` of every hole to the smallest outer ring containing it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OrphanHole`] for a hole that no outer ring contains.
    pub fn assign_hole_parents(&mut self) -> Result<(), GeometryError> {
        for h in 0..self.rings.len() {
            if !self.rings[h].is_hole {
                continue;
            }

            let hole = &self.rings[h];
            let mut best: Option<(usize, f64)> = None;
            for (i, outer) in self.rings.iter().enumerate() {
                if outer.is_hole || ring_ring_relation(outer, hole) != RingRelation::Contains {
                    continue;
                }
                let area = outer.area()?;
                if best.map_or(true, |(_, best_area)| area < best_area) {
                    best = Some((i, area));
                }
            }

            let (parent, _) = best.ok_or(GeometryError::OrphanHole(h))?;
            log::debug!("hole {} assigned to outer ring {}", h, parent);
            self.rings[h].parent_id = Some(parent);
        }
        Ok(())
    }

    /// Split into one polygon per outer ring.
    ///
    /// Each output holds the outer ring at index 0 followed by its holes.
    pub fn split_into_polygons(&self) -> Vec<Mpoly> {
        self.rings
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_hole)
            .map(|(outer_id, outer)| {
                let mut rings = vec![outer.clone()];
                rings.extend(self.holes_of(outer_id).map(|h| {
                    let mut hole = self.rings[h].clone();
                    hole.parent_id = Some(0);
                    hole
                }));
                Mpoly { rings }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vertex> {
        vec![
            Vertex::new(x0, y0),
            Vertex::new(x1, y0),
            Vertex::new(x1, y1),
            Vertex::new(x0, y1),
        ]
    }

    // two islands, each with holes
    fn two_islands() -> Mpoly {
        Mpoly::new(vec![
            Ring::new(rect(0.0, 0.0, 10.0, 10.0)),
            Ring::new_hole(rect(1.0, 1.0, 2.0, 2.0), 0),
            Ring::new(rect(20.0, 0.0, 30.0, 10.0)),
            Ring::new_hole(rect(21.0, 1.0, 22.0, 2.0), 2),
            Ring::new_hole(rect(5.0, 5.0, 6.0, 6.0), 0),
            Ring::new(rect(40.0, 0.0, 50.0, 10.0)),
            Ring::new_hole(rect(41.0, 1.0, 42.0, 2.0), 5),
        ])
    }

    fn parents(mpoly: &Mpoly) -> Vec<Option<usize>> {
        mpoly.rings.iter().map(|r| r.parent_id).collect()
    }

    #[test]
    fn delete_hole_reindexes() -> Result<(), GeometryError> {
        let mut mpoly = two_islands();
        let removed = mpoly.delete_ring(1)?;
        assert_eq!(removed.len(), 1);
        assert_eq!(mpoly.rings.len(), 6);
        assert_eq!(
            parents(&mpoly),
            vec![None, None, Some(1), Some(0), None, Some(4)]
        );
        mpoly.validate()
    }

    #[test]
    fn delete_outer_without_holes() -> Result<(), GeometryError> {
        let mut mpoly = two_islands();
        mpoly.rings.push(Ring::new(rect(60.0, 0.0, 70.0, 10.0)));
        mpoly.rings.push(Ring::new_hole(rect(61.0, 1.0, 62.0, 2.0), 5));

        mpoly.delete_ring(7)?;
        assert_eq!(
            parents(&mpoly),
            vec![None, Some(0), None, Some(2), Some(0), None, Some(5), Some(5)]
        );
        mpoly.validate()
    }

    #[test]
    fn delete_outer_cascades_to_holes() -> Result<(), GeometryError> {
        let mut mpoly = two_islands();
        let removed = mpoly.delete_ring(0)?;
        assert_eq!(removed.len(), 3);
        assert!(removed.iter().skip(1).all(|r| r.is_hole));

        assert_eq!(mpoly.rings.len(), 4);
        assert_eq!(parents(&mpoly), vec![None, Some(0), None, Some(2)]);
        assert!(!mpoly.contains(Vertex::new(3.0, 3.0)));
        assert!(mpoly.contains(Vertex::new(25.0, 5.0)));
        mpoly.validate()
    }

    #[test]
    fn delete_out_of_range() {
        let mut mpoly = two_islands();
        assert_eq!(
            mpoly.delete_ring(7),
            Err(GeometryError::InvalidRingIndex(7, 7))
        );
    }

    #[test]
    fn contains_respects_hole_ownership() -> Result<(), GeometryError> {
        let mpoly = two_islands();
        assert!(mpoly.contains(Vertex::new(3.0, 3.0)));
        assert!(!mpoly.contains(Vertex::new(1.5, 1.5)));
        assert!(!mpoly.contains(Vertex::new(5.5, 5.5)));
        assert!(!mpoly.contains(Vertex::new(15.0, 5.0)));
        assert!(mpoly.contains(Vertex::new(45.0, 5.0)));

        assert!(!mpoly.component_contains(Vertex::new(21.5, 1.5), 2)?);
        assert!(mpoly.component_contains(Vertex::new(25.0, 5.0), 2)?);
        assert!(!mpoly.component_contains(Vertex::new(25.0, 5.0), 0)?);
        assert_eq!(
            mpoly.component_contains(Vertex::new(1.5, 1.5), 1),
            Err(GeometryError::NotAnOuterRing(1))
        );
        assert_eq!(
            mpoly.component_contains(Vertex::new(1.5, 1.5), 9),
            Err(GeometryError::InvalidRingIndex(9, 7))
        );
        Ok(())
    }

    #[test]
    fn hole_of_other_component_does_not_subtract() {
        // a hole assigned to ring 1 does not punch through ring 0
        let mpoly = Mpoly::new(vec![
            Ring::new(rect(0.0, 0.0, 10.0, 10.0)),
            Ring::new(rect(0.0, 0.0, 20.0, 20.0)),
            Ring::new_hole(rect(4.0, 4.0, 6.0, 6.0), 1),
        ]);
        assert_eq!(mpoly.component_contains(Vertex::new(5.0, 5.0), 0), Ok(true));
        assert_eq!(mpoly.component_contains(Vertex::new(5.0, 5.0), 1), Ok(false));
        assert!(mpoly.contains(Vertex::new(5.0, 5.0)));
    }

    #[test]
    fn validate_detects_bad_parent() {
        let mut mpoly = two_islands();
        mpoly.rings[3].parent_id = Some(1);
        assert_eq!(
            mpoly.validate(),
            Err(GeometryError::InvalidParent {
                hole: 3,
                parent: Some(1)
            })
        );
    }

    #[test]
    fn assign_parents() -> Result<(), GeometryError> {
        let mut mpoly = Mpoly::new(vec![
            Ring::new(rect(0.0, 0.0, 100.0, 100.0)),
            Ring::new(rect(10.0, 10.0, 50.0, 50.0)),
            Ring {
                pts: rect(20.0, 20.0, 30.0, 30.0),
                is_hole: true,
                parent_id: None,
            },
            Ring {
                pts: rect(60.0, 60.0, 70.0, 70.0),
                is_hole: true,
                parent_id: None,
            },
        ]);
        mpoly.assign_hole_parents()?;
        assert_eq!(parents(&mpoly), vec![None, None, Some(1), Some(0)]);

        mpoly.rings.push(Ring {
            pts: rect(200.0, 200.0, 210.0, 210.0),
            is_hole: true,
            parent_id: None,
        });
        assert_eq!(mpoly.assign_hole_parents(), Err(GeometryError::OrphanHole(4)));
        Ok(())
    }

    #[test]
    fn split() {
        let polys = two_islands().split_into_polygons();
        assert_eq!(polys.len(), 3);
        assert_eq!(polys[0].rings.len(), 3);
        assert_eq!(polys[1].rings.len(), 2);
        assert_eq!(polys[2].rings.len(), 2);
        for poly in &polys {
            assert!(!poly.rings[0].is_hole);
            assert!(poly.rings[1..].iter().all(|r| r.parent_id == Some(0)));
            assert!(poly.validate().is_ok());
        }
        assert_eq!(polys[1].rings[1].pts[0], Vertex::new(21.0, 1.0));
    }

    #[test]
    fn bboxes() {
        let mpoly = two_islands();
        let bbox = mpoly.bbox();
        assert_eq!(
            (bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y),
            (0.0, 50.0, 0.0, 10.0)
        );
        let ring_bboxes = mpoly.ring_bboxes();
        assert_eq!(ring_bboxes.len(), 7);
        assert_eq!(ring_bboxes[3].min_x, 21.0);
        assert!(Mpoly::default().bbox().empty);
    }
}
