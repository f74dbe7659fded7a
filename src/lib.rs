//! # tunnelgraph
//!
//! `tunnelgraph` is a Rust library that turns a set of equal-radius spheres, typically the
//! atoms of a molecule, into a weighted Voronoi graph for tunnel and cavity search. It can be
//! used in Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Delaunay via convex hull**: Sphere centers are lifted onto a 4D paraboloid and the lower
//!   facets of their incremental convex hull become the Delaunay tetrahedra.
//! - **Tangent spheres**: Every tetrahedron yields the largest empty sphere touching its four atoms.
//! - **Weighted edges**: Adjacent tetrahedra are linked by edges carrying a sampled bottleneck and
//!   a traversal cost from a pluggable [`CostFunction`].
//! - **Parallel snapshots**: Independent frames of a trajectory are processed on the rayon pool.
//! - **WASM-first**: The graph is exposed to JavaScript and TypeScript through `wasm-bindgen`.
//!
//! ## Main Interface
//!
//! The primary entry point is [`triangulate`], which returns a [`VoronoiGraph`]. Use
//! [`Triangulation`] directly to inspect the tetrahedra or the gates between them.

pub mod geometry;
mod sphere;
mod error;
pub mod hull;
mod delaunay;
mod tangent;
mod tetrahedron;
mod edge;
mod kdtree;
mod graph;
mod gate;
mod triangulation;
pub mod wasm;


pub use sphere::Sphere;
pub use sphere::Segment;
pub use sphere::jitter;
pub use error::GeometryError;
pub use error::HullError;
pub use error::TriangulationError;
pub use error::GraphError;
pub use hull::ConvexHull;
pub use hull::facet::Facet;
pub use hull::point::LiftedPoint;
pub use hull::point::lift_spheres;
pub use delaunay::DelaunayFacet;
pub use delaunay::lower_facets;
pub use tangent::circumsphere;
pub use tangent::tangent_sphere;
pub use tangent::tangent_sphere_of_three;
pub use tetrahedron::Tetrahedron;
pub use edge::CostFunction;
pub use edge::LengthCost;
pub use edge::InverseClearanceCost;
pub use edge::EdgeSampling;
pub use edge::VoronoiEdge;
pub use edge::limiting_sphere;
pub use kdtree::KdTree;
pub use graph::VoronoiGraph;
pub use graph::NODE_ID_OUT;
pub use graph::NODE_ID_NULL;
pub use graph::MAX_NEIGHBOURS;
pub use gate::Gate;
pub use triangulation::Triangulation;
pub use triangulation::TriangulationConfig;
pub use triangulation::triangulate;
pub use triangulation::triangulate_snapshots;
