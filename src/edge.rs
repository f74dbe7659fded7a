use crate::sphere::{Segment, Sphere};

/// Cost of traversing a piece of a Voronoi edge.
///
/// `clearance` is the free radius at the sample and `length` the length of
/// the piece it stands for. Implementations must stay finite for
/// `clearance >= 0`. Closures `Fn(f64, f64) -> f64` implement the trait directly.
pub trait CostFunction: Send + Sync {
    fn cost(&self, clearance: f64, length: f64) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn cost(&self, clearance: f64, length: f64) -> f64 {
        self(clearance, length)
    }
}

/// Plain Euclidean length, ignoring clearance.
#[derive(Clone, Copy, Debug, Default)]
pub struct LengthCost;

impl CostFunction for LengthCost {
    fn cost(&self, _clearance: f64, length: f64) -> f64 {
        length
    }
}

/// `length / (clearance + epsilon)^exponent`: narrow passages are expensive.
#[derive(Clone, Copy, Debug)]
pub struct InverseClearanceCost {
    pub exponent: f64,
    pub epsilon: f64,
}

impl InverseClearanceCost {
    pub fn new(exponent: f64) -> Self {
        Self { exponent, epsilon: 1e-3 }
    }
}

impl Default for InverseClearanceCost {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl CostFunction for InverseClearanceCost {
    fn cost(&self, clearance: f64, length: f64) -> f64 {
        length / (clearance + self.epsilon).powf(self.exponent)
    }
}

/// Discretization of a Voronoi edge into equal steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSampling {
    /// Target length of one step.
    pub step: f64,
    pub min_samples: usize,
    pub max_samples: usize,
}

impl Default for EdgeSampling {
    fn default() -> Self {
        Self {
            step: 0.1,
            min_samples: 8,
            max_samples: 1000,
        }
    }
}

impl EdgeSampling {
    /// Number of steps for a segment of the given length, at least one.
    ///
    /// Swapped bounds are read in order instead of rejected.
    pub fn samples(&self, length: f64) -> usize {
        let wanted = (length / self.step).ceil();
        let wanted = if wanted.is_finite() && wanted > 0.0 { wanted as usize } else { 0 };
        let lo = self.min_samples.min(self.max_samples);
        let hi = self.min_samples.max(self.max_samples);
        wanted.clamp(lo, hi).max(1)
    }
}

/// An edge of the Voronoi graph between the Voronoi vertices of two adjacent tetrahedra.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiEdge {
    pub from: [f64; 3],
    pub to: [f64; 3],
    /// The atom that limits the free space along the edge.
    pub limiting: Sphere,
    /// Accumulated traversal cost, `+inf` for a blocked edge.
    pub weight: f64,
    /// Position and radius of minimum clearance, radius `-inf` for a blocked edge.
    pub bottleneck: Sphere,
}

impl VoronoiEdge {
    /// Evaluates the edge, or returns the blocked sentinel when the probe does
    /// not fit at either endpoint.
    pub fn evaluate<C: CostFunction + ?Sized>(
        from: [f64; 3],
        to: [f64; 3],
        limiting: Sphere,
        cost: &C,
        sampling: &EdgeSampling,
        probe_radius: f64,
    ) -> Self {
        if limiting.clearance(&from) < probe_radius || limiting.clearance(&to) < probe_radius {
            return Self::blocked(from, to, limiting);
        }
        let samples = sampling.samples(Segment::new(from, to).length());
        Self::with_samples(from, to, limiting, cost, samples)
    }

    /// Samples the segment in `steps` equal pieces without any probe check.
    ///
    /// The bottleneck is the smallest clearance over the `steps + 1` sample
    /// points; each piece contributes the cost of its mean clearance.
    pub fn with_samples<C: CostFunction + ?Sized>(
        from: [f64; 3],
        to: [f64; 3],
        limiting: Sphere,
        cost: &C,
        steps: usize,
    ) -> Self {
        let steps = steps.max(1);
        let segment = Segment::new(from, to);
        let step_length = segment.length() / steps as f64;

        let mut weight = 0.0;
        let mut previous = limiting.clearance(&from);
        let mut bottleneck = Sphere::new(from, previous);
        for i in 1..=steps {
            let point = segment.point_at(i as f64 / steps as f64);
            let clearance = limiting.clearance(&point);
            weight += cost.cost(0.5 * (previous + clearance), step_length);
            if clearance < bottleneck.radius {
                bottleneck = Sphere::new(point, clearance);
            }
            previous = clearance;
        }

        Self {
            from,
            to,
            limiting,
            weight,
            bottleneck,
        }
    }

    /// The impassable sentinel edge.
    pub fn blocked(from: [f64; 3], to: [f64; 3], limiting: Sphere) -> Self {
        Self {
            from,
            to,
            limiting,
            weight: f64::INFINITY,
            bottleneck: Sphere::new(Segment::new(from, to).midpoint(), f64::NEG_INFINITY),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.weight == f64::INFINITY && self.bottleneck.radius == f64::NEG_INFINITY
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.from, self.to)
    }

    /// The same edge traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..*self
        }
    }
}

/// Picks the limiting sphere of a gate among the spheres shared by two tetrahedra.
///
/// The largest radius wins, ties go to the smallest id. A pair of adjacent
/// tetrahedra normally shares exactly three spheres; other counts point at a
/// degenerate triangulation and are logged.
pub fn limiting_sphere(spheres: &[Sphere], shared: &[usize]) -> Option<usize> {
    if shared.len() != 3 {
        log::warn!(
            "Adjacent tetrahedra share {} spheres {:?} instead of 3",
            shared.len(),
            shared
        );
    }
    shared.iter().copied().fold(None, |best, id| match best {
        None => Some(id),
        Some(b) => {
            let (rb, ri) = (spheres[b].radius, spheres[id].radius);
            if ri > rb || (ri == rb && id < b) { Some(id) } else { Some(b) }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_is_clamped() {
        let s = EdgeSampling::default();
        assert_eq!(s.samples(0.0), 8);
        assert_eq!(s.samples(0.5), 8);
        assert_eq!(s.samples(2.05), 21);
        assert_eq!(s.samples(500.0), 1000);
    }

    #[test]
    fn test_swapped_sample_bounds() {
        let s = EdgeSampling { step: 0.1, min_samples: 64, max_samples: 16 };
        assert_eq!(s.samples(0.5), 16);
        assert_eq!(s.samples(3.0), 30);
        assert_eq!(s.samples(100.0), 64);

        let limiting = Sphere::new([0.0, 3.0, 0.0], 1.0);
        let edge = VoronoiEdge::evaluate([-2.0, 0.0, 0.0], [2.0, 0.0, 0.0], limiting, &LengthCost, &s, 0.0);
        assert!((edge.weight - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sample_bounds_still_take_one_step() {
        let s = EdgeSampling { step: 0.1, min_samples: 0, max_samples: 0 };
        assert_eq!(s.samples(2.0), 1);
    }

    #[test]
    fn test_straight_edge_bottleneck_and_length_weight() {
        // Segment along x passing 3 units from the center of a unit sphere.
        let limiting = Sphere::new([0.0, 3.0, 0.0], 1.0);
        let edge = VoronoiEdge::with_samples([-2.0, 0.0, 0.0], [2.0, 0.0, 0.0], limiting, &LengthCost, 40);
        assert!((edge.weight - 4.0).abs() < 1e-9);
        assert!((edge.bottleneck.radius - 2.0).abs() < 1e-9);
        assert!(edge.bottleneck.center[0].abs() < 1e-9);
    }

    #[test]
    fn test_bottleneck_converges_with_sample_count() {
        // Closest approach at x = 0.37, where the clearance is 0.5.
        let limiting = Sphere::new([0.37, 1.5, 0.0], 1.0);
        let from = [-3.0, 0.0, 0.0];
        let to = [4.0, 0.0, 0.0];
        let mut last = f64::INFINITY;
        for steps in [8, 16, 64, 256, 1024] {
            let edge = VoronoiEdge::with_samples(from, to, limiting, &LengthCost, steps);
            let step = 7.0 / steps as f64;
            assert!(edge.bottleneck.radius >= 0.5 - 1e-12);
            assert!(edge.bottleneck.radius - 0.5 <= step, "steps {}: {}", steps, edge.bottleneck.radius);
            assert!(edge.bottleneck.radius <= last + 1e-12);
            last = edge.bottleneck.radius;
        }
    }

    #[test]
    fn test_blocked_sentinel_regardless_of_cost() {
        let limiting = Sphere::new([0.0, 1.0, 0.0], 0.8);
        let costs: [&dyn CostFunction; 3] = [&LengthCost, &InverseClearanceCost::default(), &|_c: f64, _l: f64| 0.0];
        for cost in costs {
            let edge = VoronoiEdge::evaluate(
                [0.0, 0.0, 0.0],
                [5.0, 0.0, 0.0],
                limiting,
                cost,
                &EdgeSampling::default(),
                0.5,
            );
            assert!(edge.is_blocked());
            assert_eq!(edge.weight, f64::INFINITY);
            assert_eq!(edge.bottleneck.radius, f64::NEG_INFINITY);
        }
    }

    #[test]
    fn test_open_edge_is_not_blocked() {
        let limiting = Sphere::new([0.0, 3.0, 0.0], 1.0);
        let edge = VoronoiEdge::evaluate(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            limiting,
            &InverseClearanceCost::default(),
            &EdgeSampling::default(),
            1.4,
        );
        assert!(!edge.is_blocked());
        assert!(edge.weight.is_finite() && edge.weight > 0.0);
    }

    #[test]
    fn test_limiting_sphere_prefers_largest_then_smallest_id() {
        let spheres = vec![
            Sphere::new([0.0; 3], 1.0),
            Sphere::new([1.0; 3], 1.5),
            Sphere::new([2.0; 3], 1.5),
            Sphere::new([3.0; 3], 1.0),
        ];
        assert_eq!(limiting_sphere(&spheres, &[0, 2, 1]), Some(1));
        assert_eq!(limiting_sphere(&spheres, &[3, 0, 0]), Some(0));
        assert_eq!(limiting_sphere(&spheres, &[]), None);
    }

    #[test]
    fn test_limiting_sphere_with_four_shared() {
        // A degenerate pair sharing all four spheres is logged, not rejected.
        let spheres = vec![
            Sphere::new([0.0; 3], 1.0),
            Sphere::new([1.0; 3], 1.0),
            Sphere::new([2.0; 3], 1.2),
            Sphere::new([3.0; 3], 1.2),
        ];
        assert_eq!(limiting_sphere(&spheres, &[3, 1, 2, 0]), Some(2));
    }
}
