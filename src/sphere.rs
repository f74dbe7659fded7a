use crate::geometry;
use rand::prelude::*;
use rand::rngs::StdRng;

/// A sphere given by its center and radius.
///
/// Used for the input atoms, for Voronoi vertices (tangent spheres) and for
/// the bottleneck of a Voronoi edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: [f64; 3], radius: f64) -> Self {
        Self { center, radius }
    }

    /// Signed distance from `point` to the surface of the sphere.
    ///
    /// Negative inside the sphere.
    pub fn distance(&self, point: &[f64; 3]) -> f64 {
        geometry::distance(&self.center, point) - self.radius
    }

    /// Free space between `point` and the sphere surface, clamped to zero inside the sphere.
    pub fn clearance(&self, point: &[f64; 3]) -> f64 {
        self.distance(point).max(0.0)
    }

    /// Distance between the two surfaces, negative when the spheres overlap.
    pub fn gap(&self, other: &Sphere) -> f64 {
        geometry::distance(&self.center, &other.center) - self.radius - other.radius
    }

    pub fn contains(&self, point: &[f64; 3]) -> bool {
        self.distance(point) <= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.center.iter().all(|c| c.is_finite()) && self.radius.is_finite()
    }
}

/// A straight segment between two points, typically the two Voronoi vertices of an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: [f64; 3],
    pub end: [f64; 3],
}

impl Segment {
    pub fn new(start: [f64; 3], end: [f64; 3]) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        geometry::distance(&self.start, &self.end)
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> [f64; 3] {
        geometry::lerp(&self.start, &self.end, t)
    }

    pub fn midpoint(&self) -> [f64; 3] {
        self.point_at(0.5)
    }
}

/// Perturbs every center by a uniform offset in `[-amplitude, amplitude]` per axis.
///
/// The triangulation assumes points in general position; callers that hit
/// degenerate configurations can jitter their input and retry. Radii are left untouched.
pub fn jitter(spheres: &[Sphere], amplitude: f64, seed: u64) -> Vec<Sphere> {
    let mut rng = StdRng::seed_from_u64(seed);
    spheres
        .iter()
        .map(|s| {
            let mut center = s.center;
            for c in center.iter_mut() {
                *c += rng.gen_range(-amplitude..=amplitude);
            }
            Sphere::new(center, s.radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_convention() {
        let s = Sphere::new([1.0, 0.0, 0.0], 0.5);
        assert!((s.distance(&[3.0, 0.0, 0.0]) - 1.5).abs() < 1e-12);
        assert!((s.distance(&[1.0, 0.0, 0.0]) + 0.5).abs() < 1e-12);
        assert_eq!(s.clearance(&[1.2, 0.0, 0.0]), 0.0);
        assert!(s.contains(&[1.2, 0.0, 0.0]));
    }

    #[test]
    fn test_jitter_is_reproducible_and_bounded() {
        let input = vec![Sphere::new([0.0, 0.0, 0.0], 1.0), Sphere::new([5.0, 5.0, 5.0], 1.0)];
        let a = jitter(&input, 1e-3, 7);
        let b = jitter(&input, 1e-3, 7);
        assert_eq!(a, b);
        for (orig, moved) in input.iter().zip(&a) {
            for i in 0..3 {
                assert!((orig.center[i] - moved.center[i]).abs() <= 1e-3);
            }
            assert_eq!(orig.radius, moved.radius);
        }
    }

    #[test]
    fn test_segment_point_at() {
        let seg = Segment::new([0.0, 0.0, 0.0], [2.0, 4.0, 0.0]);
        assert_eq!(seg.midpoint(), [1.0, 2.0, 0.0]);
        assert!((seg.length() - 20.0f64.sqrt()).abs() < 1e-12);
    }
}
