use crate::sphere::Sphere;

/// A point handed to the hull builder.
///
/// `id` is the index of the source sphere and stays stable through the whole
/// pipeline. `assigned` records which facet's outside set currently holds the
/// point; it is only meaningful while the hull is being built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiftedPoint<const D: usize> {
    pub id: usize,
    pub coords: [f64; D],
    pub(crate) assigned: Option<usize>,
}

impl<const D: usize> LiftedPoint<D> {
    pub fn new(id: usize, coords: [f64; D]) -> Self {
        Self { id, coords, assigned: None }
    }

    /// Facet whose outside set currently holds this point.
    pub fn assigned(&self) -> Option<usize> {
        self.assigned
    }
}

impl LiftedPoint<4> {
    /// Lifts a 3D point onto the paraboloid `w = x² + y² + z²`.
    ///
    /// The radius term of a power lifting is omitted, which is only valid when
    /// every sphere shares the same radius.
    pub fn lift(id: usize, point: &[f64; 3]) -> Self {
        let w = point[0] * point[0] + point[1] * point[1] + point[2] * point[2];
        Self::new(id, [point[0], point[1], point[2], w])
    }

    /// The appended paraboloid coordinate.
    pub fn lifted(&self) -> f64 {
        self.coords[3]
    }
}

/// Lifts the sphere centers after moving them so `origin` sits at zero.
///
/// Delaunay tetrahedra are invariant under translation, and centering the
/// cloud keeps the squared-norm coordinate small for molecular coordinates.
pub fn lift_spheres(spheres: &[Sphere], origin: &[f64; 3]) -> Vec<LiftedPoint<4>> {
    spheres
        .iter()
        .enumerate()
        .map(|(id, s)| {
            let p = [
                s.center[0] - origin[0],
                s.center[1] - origin[1],
                s.center[2] - origin[2],
            ];
            LiftedPoint::lift(id, &p)
        })
        .collect()
}
