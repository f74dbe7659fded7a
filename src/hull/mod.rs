//! Incremental convex hull in `D` dimensions.
//!
//! The builder starts from two back-to-back facets over `D` extreme points and
//! repeatedly absorbs the farthest outside point of some facet: every facet
//! that point can see is discarded, the horizon ridges around them are
//! connected to the point, and the orphaned outside points are handed to the
//! new facets. With `D = 4` and paraboloid-lifted input the lower hull is the
//! Delaunay tetrahedralization of the original 3D points.

pub mod facet;
pub mod point;

use crate::error::HullError;
use facet::{Facet, NO_FACET};
use point::LiftedPoint;
use std::collections::HashMap;

/// A convex hull over lifted points, stored as an arena of facets.
///
/// The arena still contains discarded facets; use [`ConvexHull::live_facets`]
/// to walk the final surface.
#[derive(Clone, Debug)]
pub struct ConvexHull<const D: usize> {
    points: Vec<LiftedPoint<D>>,
    facets: Vec<Facet<D>>,
    interior: [f64; D],
    stamp: u32,
}

impl<const D: usize> ConvexHull<D> {
    /// Builds the hull of `points`, which must contain at least `D + 1` points in general position.
    pub fn build(points: Vec<LiftedPoint<D>>) -> Result<Self, HullError> {
        if points.len() < D + 1 {
            return Err(HullError::TooFewPoints {
                dimension: D,
                required: D + 1,
                found: points.len(),
            });
        }

        let mut hull = ConvexHull {
            points,
            facets: Vec::new(),
            interior: [0.0; D],
            stamp: 0,
        };

        let seed = hull.select_seed()?;
        let mut pending = hull.seed(seed)?;

        let mut worklist: Vec<usize> = (0..hull.facets.len()).collect();
        while let Some(f) = worklist.pop() {
            if hull.facets[f].discarded || hull.facets[f].outside.is_empty() {
                continue;
            }
            let created = hull.absorb(f, &mut pending);
            worklist.extend(created.into_iter().filter(|&n| !hull.facets[n].outside.is_empty()));
        }

        log::debug!(
            "Convex hull in {}D: {} points, {} facets ({} live)",
            D,
            hull.points.len(),
            hull.facets.len(),
            hull.live_facets().count()
        );
        Ok(hull)
    }

    pub fn points(&self) -> &[LiftedPoint<D>] {
        &self.points
    }

    /// Every facet ever created, including discarded ones.
    pub fn facets(&self) -> &[Facet<D>] {
        &self.facets
    }

    /// Facets on the final hull surface with their arena index.
    pub fn live_facets(&self) -> impl Iterator<Item = (usize, &Facet<D>)> {
        self.facets.iter().enumerate().filter(|(_, f)| !f.discarded)
    }

    /// A point strictly inside the hull, used to orient new facets.
    pub fn interior_point(&self) -> [f64; D] {
        self.interior
    }

    /// Sorted ids of the points that are corners of a live facet.
    pub fn vertex_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .live_facets()
            .flat_map(|(_, f)| f.corners.iter().map(|&c| self.points[c].id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Picks `D` distinct extreme points, alternating min/max along the leading axes.
    fn select_seed(&self) -> Result<[usize; D], HullError> {
        let mut seed = [usize::MAX; D];
        for k in 0..D {
            let axis = (k / 2) % D;
            // min x, max x, max y, min y, min z, max z, ...
            let want_max = matches!(k % 4, 1 | 2);
            let mut best: Option<usize> = None;
            for (i, p) in self.points.iter().enumerate() {
                if seed[..k].contains(&i) {
                    continue;
                }
                best = match best {
                    None => Some(i),
                    Some(b) => {
                        let better = if want_max {
                            p.coords[axis] > self.points[b].coords[axis]
                        } else {
                            p.coords[axis] < self.points[b].coords[axis]
                        };
                        if better { Some(i) } else { Some(b) }
                    }
                };
            }
            // At least D + 1 points exist, so a candidate is always left.
            seed[k] = best.unwrap_or(0);
        }

        if !Facet::new(seed, &self.points, None).is_degenerate() {
            return Ok(seed);
        }

        // Extreme points alone may be affinely dependent; swap the last seed
        // corner for the first point that restores a proper simplex.
        for candidate in 0..self.points.len() {
            if seed[..D - 1].contains(&candidate) {
                continue;
            }
            let mut trial = seed;
            trial[D - 1] = candidate;
            let probe = Facet::new(trial, &self.points, None);
            if !probe.is_degenerate() {
                log::debug!("Replaced degenerate hull seed corner with point {}", candidate);
                return Ok(trial);
            }
        }

        Err(HullError::DegenerateSeed {
            corners: seed.iter().map(|&c| self.points[c].id).collect(),
        })
    }

    /// Creates the two back-to-back seed facets and partitions the remaining points.
    ///
    /// Returns the points lying exactly on the seed hyperplane; they are
    /// redistributed once the hull has volume.
    fn seed(&mut self, seed: [usize; D]) -> Result<Vec<usize>, HullError> {
        let front = Facet::new(seed, &self.points, None);
        let mut back = front.clone();
        back.flip();

        let mut on_plane = Vec::new();
        let mut front_outside = Vec::new();
        let mut back_outside = Vec::new();
        for i in 0..self.points.len() {
            if seed.contains(&i) {
                continue;
            }
            let d = front.signed_distance(&self.points[i].coords);
            if d > 0.0 {
                front_outside.push(i);
                self.points[i].assigned = Some(0);
            } else if d < 0.0 {
                back_outside.push(i);
                self.points[i].assigned = Some(1);
            } else {
                on_plane.push(i);
            }
        }

        if front_outside.is_empty() && back_outside.is_empty() {
            return Err(HullError::Flat);
        }

        let mut front = front;
        front.neighbors = [1; D];
        front.outside = front_outside;
        back.neighbors = [0; D];
        back.outside = back_outside;
        self.facets.push(front);
        self.facets.push(back);
        Ok(on_plane)
    }

    /// Absorbs the farthest outside point of facet `start` and returns the new facets.
    fn absorb(&mut self, start: usize, pending: &mut Vec<usize>) -> Vec<usize> {
        let eye = self.extreme_point(start);
        self.points[eye].assigned = None;
        let eye_coords = self.points[eye].coords;

        if self.stamp == 0 {
            // First expansion: seed corners plus the eye span a full simplex
            // whose centroid stays inside every later hull.
            let mut centroid = eye_coords;
            for &c in &self.facets[start].corners {
                for k in 0..D {
                    centroid[k] += self.points[c].coords[k];
                }
            }
            for v in centroid.iter_mut() {
                *v /= (D + 1) as f64;
            }
            self.interior = centroid;
        }

        self.stamp += 1;
        let stamp = self.stamp;

        // Explicit worklist instead of recursion: collect the visible region
        // and the horizon ridges (visible facet, slot, hidden neighbour).
        let mut visible = Vec::new();
        let mut horizon: Vec<(usize, usize, usize)> = Vec::new();
        let mut stack = vec![start];
        self.facets[start].visit = stamp;
        while let Some(v) = stack.pop() {
            visible.push(v);
            for slot in 0..D {
                let n = self.facets[v].neighbors[slot];
                if n == NO_FACET {
                    log::warn!("Hull facet {} has an unstitched neighbour slot {}", v, slot);
                    continue;
                }
                if self.facets[n].is_outside(&eye_coords) {
                    if self.facets[n].visit != stamp {
                        self.facets[n].visit = stamp;
                        stack.push(n);
                    }
                } else {
                    horizon.push((v, slot, n));
                }
            }
        }

        let mut pool = std::mem::take(pending);
        for &v in &visible {
            let facet = &mut self.facets[v];
            facet.discarded = true;
            pool.append(&mut facet.outside);
        }

        let interior = self.interior;
        let mut created = Vec::with_capacity(horizon.len());
        for &(v, slot, h) in &horizon {
            let mut corners = self.facets[v].corners;
            corners[slot] = eye;
            let mut facet = Facet::new(corners, &self.points, Some(&interior));
            facet.neighbors[slot] = h;
            facet.visit = stamp;

            let index = self.facets.len();
            let ridge_owner = self.facets[v].corners;
            match self.facets[h].slot_of_ridge(&ridge_owner, slot) {
                Some(j) => self.facets[h].neighbors[j] = index,
                None => log::warn!("Horizon facet {} does not share the ridge of facet {}", h, v),
            }
            self.facets.push(facet);
            created.push(index);
        }

        // Stitch the new facets to each other through their ridges containing the eye.
        let mut open: HashMap<[usize; D], (usize, usize)> = HashMap::with_capacity(created.len() * D);
        for &f in &created {
            for slot in 0..D {
                if self.facets[f].corners[slot] == eye {
                    continue;
                }
                let key = self.facets[f].ridge_key(slot);
                match open.remove(&key) {
                    Some((g, g_slot)) => {
                        self.facets[f].neighbors[slot] = g;
                        self.facets[g].neighbors[g_slot] = f;
                    }
                    None => {
                        open.insert(key, (f, slot));
                    }
                }
            }
        }
        if !open.is_empty() {
            log::warn!("{} ridges around point {} were left unstitched", open.len(), self.points[eye].id);
        }

        for p in pool {
            if p == eye {
                continue;
            }
            let coords = self.points[p].coords;
            let owner = created.iter().copied().find(|&f| self.facets[f].is_outside(&coords));
            self.points[p].assigned = owner;
            if let Some(f) = owner {
                self.facets[f].outside.push(p);
            }
        }

        created
    }

    fn extreme_point(&mut self, facet: usize) -> usize {
        let f = &mut self.facets[facet];
        let mut best = 0;
        let mut best_distance = f64::NEG_INFINITY;
        for (k, &p) in f.outside.iter().enumerate() {
            let d = f.signed_distance(&self.points[p].coords);
            if d > best_distance {
                best_distance = d;
                best = k;
            }
        }
        f.outside.swap_remove(best)
    }
}
