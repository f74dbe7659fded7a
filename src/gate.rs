use crate::error::GeometryError;
use crate::sphere::Sphere;
use crate::tangent::tangent_sphere_of_three;
use crate::tetrahedron::Tetrahedron;

/// The triangular face shared by two adjacent tetrahedra.
///
/// The tangent sphere of the three face spheres is the largest probe that can
/// squeeze through the face in its own plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gate {
    pub tetrahedra: (usize, usize),
    /// Sphere ids of the shared face.
    pub spheres: [usize; 3],
    pub tangent: Result<Sphere, GeometryError>,
}

impl Gate {
    /// Builds the gate between `a` and `b`, or `None` when they do not share a face.
    pub fn new(a: &Tetrahedron, b: &Tetrahedron, spheres: &[Sphere]) -> Option<Self> {
        let shared = a.shared_vertices(b);
        if shared.len() != 3 {
            if shared.len() > 3 {
                log::warn!("Tetrahedra {} and {} share {} spheres", a.id(), b.id(), shared.len());
            }
            return None;
        }
        let face = [shared[0], shared[1], shared[2]];
        let tangent = tangent_sphere_of_three(&spheres[face[0]], &spheres[face[1]], &spheres[face[2]]);
        if let Err(e) = tangent {
            log::debug!("Gate between tetrahedra {} and {} has no tangent sphere: {}", a.id(), b.id(), e);
        }
        Some(Self {
            tetrahedra: (a.id(), b.id()),
            spheres: face,
            tangent,
        })
    }

    /// The tetrahedron on the other side of the gate from `from`.
    pub fn other(&self, from: usize) -> Option<usize> {
        match self.tetrahedra {
            (a, b) if a == from => Some(b),
            (a, b) if b == from => Some(a),
            _ => None,
        }
    }

    /// Whether a probe of `probe_radius` fits through the face.
    pub fn is_open(&self, probe_radius: f64) -> bool {
        matches!(self.tangent, Ok(s) if s.radius >= probe_radius)
    }
}
