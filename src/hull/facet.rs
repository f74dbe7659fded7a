use super::point::LiftedPoint;
use crate::geometry::hyperplane_normal;

/// Neighbour slot value for a facet link that has not been stitched yet.
pub const NO_FACET: usize = usize::MAX;

/// An oriented simplex face of a `D`-dimensional convex hull.
///
/// `neighbors[i]` is the facet sharing the ridge opposite `corners[i]`.
/// Facets are never removed from the arena; once subsumed they are flagged
/// `discarded` and keep their last links.
#[derive(Clone, Debug)]
pub struct Facet<const D: usize> {
    pub corners: [usize; D],
    pub normal: [f64; D],
    pub offset: f64,
    pub neighbors: [usize; D],
    pub discarded: bool,
    pub(crate) visit: u32,
    pub(crate) outside: Vec<usize>,
}

impl<const D: usize> Facet<D> {
    /// Builds the facet through `corners` with a unit outward normal.
    ///
    /// When `inside` is given, the normal is oriented so that point lies on
    /// the negative side. A degenerate simplex yields a zero normal and a
    /// facet that nothing is ever outside of.
    pub fn new(corners: [usize; D], points: &[LiftedPoint<D>], inside: Option<&[f64; D]>) -> Self {
        let origin = points[corners[0]].coords;
        let mut edges = [[0.0; D]; D];
        for k in 1..D {
            let p = points[corners[k]].coords;
            for c in 0..D {
                edges[k - 1][c] = p[c] - origin[c];
            }
        }
        let mut normal = hyperplane_normal::<D>(&edges[..D - 1]);
        let length = normal.iter().map(|v| v * v).sum::<f64>().sqrt();

        let mut facet = Facet {
            corners,
            normal: [0.0; D],
            offset: 0.0,
            neighbors: [NO_FACET; D],
            discarded: false,
            visit: 0,
            outside: Vec::new(),
        };

        if length == 0.0 || !length.is_finite() {
            let ids: Vec<usize> = corners.iter().map(|&c| points[c].id).collect();
            log::warn!("Degenerate hull facet over points {:?}: zero-length normal", ids);
            return facet;
        }

        for v in normal.iter_mut() {
            *v /= length;
        }
        facet.normal = normal;
        facet.offset = dot(&normal, &origin);

        if let Some(p) = inside {
            if facet.signed_distance(p) > 0.0 {
                facet.flip();
            }
        }
        facet
    }

    /// Signed distance of `point` from the facet hyperplane, positive on the outer side.
    #[inline]
    pub fn signed_distance(&self, point: &[f64; D]) -> f64 {
        dot(&self.normal, point) - self.offset
    }

    /// Whether `point` lies strictly beyond the facet.
    ///
    /// This is the only orientation predicate of the hull, shared by every
    /// dimension the builder is instantiated with.
    #[inline]
    pub fn is_outside(&self, point: &[f64; D]) -> bool {
        self.signed_distance(point) > 0.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal.iter().all(|&v| v == 0.0)
    }

    /// Reverses the orientation of the facet.
    pub fn flip(&mut self) {
        for v in self.normal.iter_mut() {
            *v = -*v;
        }
        self.offset = -self.offset;
    }

    /// Points of the outside set, by index into the hull's point array.
    pub fn outside(&self) -> &[usize] {
        &self.outside
    }

    pub fn has_corner(&self, point: usize) -> bool {
        self.corners.contains(&point)
    }

    /// Slot whose opposite ridge consists of exactly the corners of `ridge_owner` without `skip`.
    pub(crate) fn slot_of_ridge(&self, ridge_owner: &[usize; D], skip: usize) -> Option<usize> {
        (0..D).find(|&j| {
            let c = self.corners[j];
            !(0..D).any(|k| k != skip && ridge_owner[k] == c)
        })
    }

    /// Order-independent key of the ridge opposite `slot`.
    pub(crate) fn ridge_key(&self, slot: usize) -> [usize; D] {
        let mut key = self.corners;
        key[slot] = usize::MAX;
        key.sort_unstable();
        key
    }
}

#[inline]
fn dot<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
