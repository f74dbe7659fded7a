use crate::error::GeometryError;
use crate::geometry::{self, det3};
use crate::sphere::Sphere;
use crate::tangent::tangent_sphere;
use std::cell::OnceCell;
use std::hash::{Hash, Hasher};

/// A Delaunay tetrahedron over four input spheres.
///
/// Derived geometry is computed on first use and cached. Two tetrahedra are
/// equal when they are built over the same set of spheres, regardless of order.
#[derive(Clone, Debug)]
pub struct Tetrahedron<'a> {
    id: usize,
    corners: [usize; 4],
    spheres: &'a [Sphere],
    tangent: OnceCell<Result<Sphere, GeometryError>>,
    gravity: OnceCell<[f64; 3]>,
}

impl<'a> Tetrahedron<'a> {
    /// `corners` index into `spheres`.
    pub fn new(id: usize, corners: [usize; 4], spheres: &'a [Sphere]) -> Self {
        debug_assert!(corners.iter().all(|&c| c < spheres.len()));
        Self {
            id,
            corners,
            spheres,
            tangent: OnceCell::new(),
            gravity: OnceCell::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn corners(&self) -> [usize; 4] {
        self.corners
    }

    pub fn sphere(&self, slot: usize) -> &'a Sphere {
        &self.spheres[self.corners[slot]]
    }

    fn positions(&self) -> [[f64; 3]; 4] {
        self.corners.map(|c| self.spheres[c].center)
    }

    /// Sphere tangent to the four corner spheres, the Voronoi vertex of this tetrahedron.
    pub fn tangent_sphere(&self) -> Result<Sphere, GeometryError> {
        *self
            .tangent
            .get_or_init(|| tangent_sphere(&self.positions(), self.sphere(0).radius))
    }

    /// Mean of the four corner centers.
    pub fn gravity_center(&self) -> [f64; 3] {
        *self.gravity.get_or_init(|| {
            let mut c = [0.0; 3];
            for p in self.positions() {
                c = geometry::add(&c, &p);
            }
            geometry::scale(&c, 0.25)
        })
    }

    /// Sorted sphere ids.
    pub fn vertex_set(&self) -> [usize; 4] {
        let mut set = self.corners;
        set.sort_unstable();
        set
    }

    pub fn has_vertex(&self, sphere: usize) -> bool {
        self.corners.contains(&sphere)
    }

    /// Sphere ids of the face opposite corner `slot`.
    pub fn face(&self, slot: usize) -> [usize; 3] {
        let mut face = [0; 3];
        let mut k = 0;
        for (i, &c) in self.corners.iter().enumerate() {
            if i != slot {
                face[k] = c;
                k += 1;
            }
        }
        face
    }

    pub fn faces(&self) -> [[usize; 3]; 4] {
        [self.face(0), self.face(1), self.face(2), self.face(3)]
    }

    /// Sphere ids present in both tetrahedra, in the order of `self`.
    pub fn shared_vertices(&self, other: &Tetrahedron) -> Vec<usize> {
        self.corners
            .iter()
            .copied()
            .filter(|&c| other.has_vertex(c))
            .collect()
    }

    pub fn shares_face(&self, other: &Tetrahedron) -> bool {
        self.shared_vertices(other).len() == 3
    }

    /// Signed volume, positive when the corners are positively oriented.
    pub fn signed_volume(&self) -> f64 {
        let [a, b, c, d] = self.positions();
        det3(&[
            geometry::sub(&b, &a),
            geometry::sub(&c, &a),
            geometry::sub(&d, &a),
        ]) / 6.0
    }

    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Whether `point` lies inside or on the boundary of the tetrahedron.
    pub fn contains_point(&self, point: &[f64; 3]) -> bool {
        let p = self.positions();
        let orientation = self.signed_volume();
        if orientation == 0.0 {
            return false;
        }
        // Replacing each corner by `point` must keep the orientation sign.
        (0..4).all(|slot| {
            let mut q = p;
            q[slot] = *point;
            let v = det3(&[
                geometry::sub(&q[1], &q[0]),
                geometry::sub(&q[2], &q[0]),
                geometry::sub(&q[3], &q[0]),
            ]);
            v * orientation >= 0.0
        })
    }
}

impl PartialEq for Tetrahedron<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.vertex_set() == other.vertex_set()
    }
}

impl Eq for Tetrahedron<'_> {}

impl Hash for Tetrahedron<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertex_set().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_corner() -> Vec<Sphere> {
        vec![
            Sphere::new([0.0, 0.0, 0.0], 0.1),
            Sphere::new([1.0, 0.0, 0.0], 0.1),
            Sphere::new([0.0, 1.0, 0.0], 0.1),
            Sphere::new([0.0, 0.0, 1.0], 0.1),
            Sphere::new([5.0, 5.0, 5.0], 0.1),
        ]
    }

    #[test]
    fn test_equality_ignores_order() {
        let spheres = unit_corner();
        let a = Tetrahedron::new(0, [0, 1, 2, 3], &spheres);
        let b = Tetrahedron::new(7, [3, 1, 0, 2], &spheres);
        let c = Tetrahedron::new(1, [4, 1, 0, 2], &spheres);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.shares_face(&c));
        assert_eq!(a.shared_vertices(&c), vec![0, 1, 2]);
    }

    #[test]
    fn test_tangent_and_gravity_are_cached() {
        let spheres = unit_corner();
        let t = Tetrahedron::new(0, [0, 1, 2, 3], &spheres);
        let s = t.tangent_sphere().unwrap();
        assert!((s.radius - (0.75f64.sqrt() - 0.1)).abs() < 1e-12);
        assert_eq!(t.tangent_sphere().unwrap(), s);
        assert_eq!(t.gravity_center(), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_contains_point() {
        let spheres = unit_corner();
        let t = Tetrahedron::new(0, [0, 1, 2, 3], &spheres);
        assert!(t.contains_point(&[0.1, 0.1, 0.1]));
        assert!(t.contains_point(&t.gravity_center()));
        assert!(!t.contains_point(&[0.5, 0.5, 0.5]));
        assert!(!t.contains_point(&[-0.1, 0.2, 0.2]));
        assert!((t.volume() - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_faces_exclude_opposite_corner() {
        let spheres = unit_corner();
        let t = Tetrahedron::new(0, [0, 1, 2, 3], &spheres);
        assert_eq!(t.faces(), [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]]);
    }
}
