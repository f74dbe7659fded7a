use crate::delaunay::lower_facets;
use crate::edge::{limiting_sphere, CostFunction, EdgeSampling, VoronoiEdge};
use crate::error::TriangulationError;
use crate::gate::Gate;
use crate::graph::VoronoiGraph;
use crate::hull::point::lift_spheres;
use crate::hull::ConvexHull;
use crate::sphere::Sphere;
use crate::tetrahedron::Tetrahedron;
use rayon::prelude::*;

/// Settings of the Voronoi graph construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangulationConfig {
    /// Radius of the probe; edges it cannot enter at either end are blocked.
    pub probe_radius: f64,
    pub sampling: EdgeSampling,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            probe_radius: 0.0,
            sampling: EdgeSampling::default(),
        }
    }
}

impl TriangulationConfig {
    pub fn with_probe_radius(mut self, probe_radius: f64) -> Self {
        self.probe_radius = probe_radius;
        self
    }

    pub fn with_sampling(mut self, sampling: EdgeSampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Delaunay tetrahedralization of a set of equal-radius spheres.
///
/// Tetrahedron `i` becomes node `i` of the Voronoi graph; `adjacency[i][k]`
/// is the tetrahedron across the face opposite corner `k`.
pub struct Triangulation<'a> {
    spheres: &'a [Sphere],
    tetrahedra: Vec<Tetrahedron<'a>>,
    adjacency: Vec<[Option<usize>; 4]>,
}

impl<'a> Triangulation<'a> {
    /// Lifts the sphere centers, builds their 4D hull and keeps the lower facets.
    pub fn new(spheres: &'a [Sphere]) -> Result<Self, TriangulationError> {
        validate(spheres)?;

        let mut origin = [0.0; 3];
        for s in spheres {
            for k in 0..3 {
                origin[k] += s.center[k];
            }
        }
        for v in origin.iter_mut() {
            *v /= spheres.len() as f64;
        }

        let hull = ConvexHull::build(lift_spheres(spheres, &origin))?;
        let lower = lower_facets(&hull);

        let tetrahedra = lower
            .iter()
            .map(|f| Tetrahedron::new(f.index, f.corners, spheres))
            .collect();
        let adjacency = lower.iter().map(|f| f.neighbors).collect();

        Ok(Self {
            spheres,
            tetrahedra,
            adjacency,
        })
    }

    pub fn spheres(&self) -> &'a [Sphere] {
        self.spheres
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron<'a>] {
        &self.tetrahedra
    }

    pub fn len(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tetrahedra.is_empty()
    }

    /// Neighbouring tetrahedra, `None` for faces on the boundary of the point cloud.
    pub fn adjacency(&self, tetrahedron: usize) -> [Option<usize>; 4] {
        self.adjacency[tetrahedron]
    }

    /// First tetrahedron containing `point`.
    pub fn tetrahedron_containing(&self, point: &[f64; 3]) -> Option<usize> {
        self.tetrahedra.iter().position(|t| t.contains_point(point))
    }

    /// Gates of every pair of adjacent tetrahedra, each pair once.
    pub fn gates(&self) -> Vec<Gate> {
        let mut gates = Vec::new();
        for (i, links) in self.adjacency.iter().enumerate() {
            for &j in links.iter().flatten() {
                if i < j {
                    if let Some(gate) = Gate::new(&self.tetrahedra[i], &self.tetrahedra[j], self.spheres) {
                        gates.push(gate);
                    }
                }
            }
        }
        gates
    }

    /// Builds the weighted Voronoi graph of the tetrahedralization.
    ///
    /// Tetrahedra without a usable tangent sphere are kept as disabled nodes
    /// without edges. Only faces on the boundary of the point cloud mark a
    /// node as outer; a face towards an unusable tetrahedron leaves its slot
    /// empty without doing so.
    pub fn voronoi_graph<C: CostFunction + ?Sized>(&self, config: &TriangulationConfig, cost: &C) -> VoronoiGraph {
        let n = self.tetrahedra.len();
        let mut graph = VoronoiGraph::new(n);
        let usable = build_nodes(&self.tetrahedra, &mut graph);

        for i in 0..n {
            let links = self.adjacency[i];
            if links.iter().any(|l| l.is_none()) {
                graph.set_outer(i, true);
            }
            for &j in links.iter().flatten() {
                if j <= i || !usable[i] || !usable[j] {
                    continue;
                }
                let shared = self.tetrahedra[i].shared_vertices(&self.tetrahedra[j]);
                let Some(limiting) = limiting_sphere(self.spheres, &shared) else {
                    log::warn!("Tetrahedra {} and {} are linked but share no sphere", i, j);
                    continue;
                };
                let edge = VoronoiEdge::evaluate(
                    graph.sphere(i).center,
                    graph.sphere(j).center,
                    self.spheres[limiting],
                    cost,
                    &config.sampling,
                    config.probe_radius,
                );
                graph.connect(i, j, edge);
                graph.connect(j, i, edge.reversed());
            }
        }

        log::debug!(
            "Voronoi graph: {} nodes, {} edges from {} spheres",
            graph.size(),
            graph.edge_count(),
            self.spheres.len()
        );
        graph
    }
}

/// Writes one node per tetrahedron and returns which nodes may carry edges.
///
/// Tetrahedra without a Voronoi vertex get a zero sphere at their gravity
/// center and are disabled; a negative tangent radius only disables the node.
fn build_nodes(tetrahedra: &[Tetrahedron], graph: &mut VoronoiGraph) -> Vec<bool> {
    let mut usable = vec![true; tetrahedra.len()];
    for (i, t) in tetrahedra.iter().enumerate() {
        match t.tangent_sphere() {
            Ok(sphere) => {
                graph.set_sphere(i, sphere);
                if sphere.radius < 0.0 {
                    log::warn!(
                        "Tetrahedron {} over spheres {:?} has negative tangent radius {}",
                        i,
                        t.corners(),
                        sphere.radius
                    );
                    graph.disable(i);
                }
            }
            Err(e) => {
                log::warn!("Tetrahedron {} over spheres {:?} has no Voronoi vertex: {}", i, t.corners(), e);
                graph.set_sphere(i, Sphere::new(t.gravity_center(), 0.0));
                graph.disable(i);
                usable[i] = false;
            }
        }
    }
    usable
}

/// Runs the whole pipeline: lift, hull, Delaunay filter, nodes and edges.
pub fn triangulate<C: CostFunction + ?Sized>(
    spheres: &[Sphere],
    config: &TriangulationConfig,
    cost: &C,
) -> Result<VoronoiGraph, TriangulationError> {
    Ok(Triangulation::new(spheres)?.voronoi_graph(config, cost))
}

/// Triangulates independent snapshots, e.g. trajectory frames, on the rayon pool.
pub fn triangulate_snapshots<C: CostFunction + ?Sized>(
    snapshots: &[Vec<Sphere>],
    config: &TriangulationConfig,
    cost: &C,
) -> Vec<Result<VoronoiGraph, TriangulationError>> {
    snapshots
        .par_iter()
        .map(|spheres| triangulate(spheres, config, cost))
        .collect()
}

/// Rejects non-finite input and flags violated preconditions.
///
/// Equal radii and distinct centers are the caller's responsibility; they
/// are asserted in debug builds and only logged otherwise.
fn validate(spheres: &[Sphere]) -> Result<(), TriangulationError> {
    if let Some(i) = spheres.iter().position(|s| !s.is_finite()) {
        return Err(TriangulationError::invalid_input(format!(
            "sphere {} has non-finite center or radius",
            i
        )));
    }

    if let Some(first) = spheres.first() {
        if let Some(i) = spheres.iter().position(|s| s.radius != first.radius) {
            log::warn!(
                "Sphere {} has radius {} but sphere 0 has {}; the lifting assumes one common radius",
                i,
                spheres[i].radius,
                first.radius
            );
            debug_assert!(false, "spheres must share one radius");
        }
    }

    if cfg!(debug_assertions) {
        let mut centers: Vec<[f64; 3]> = spheres.iter().map(|s| s.center).collect();
        centers.sort_unstable_by(|a, b| {
            a[0].total_cmp(&b[0])
                .then(a[1].total_cmp(&b[1]))
                .then(a[2].total_cmp(&b[2]))
        });
        if let Some(pair) = centers.windows(2).find(|w| w[0] == w[1]) {
            log::warn!("Duplicate sphere center {:?}", pair[0]);
            debug_assert!(false, "sphere centers must be distinct");
        }
    }
    Ok(())
}
