//! Error types for the triangulation pipeline.
//!
//! Geometry failures are non-fatal: the orchestrator logs them and skips the
//! affected tetrahedron. Contract violations inside the graph container panic
//! instead of surfacing here.

use thiserror::Error;

/// Failures of the closed-form sphere solvers.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// The four centers lie in one plane, so no circumsphere exists.
    #[error("points are coplanar (determinant {determinant})")]
    Coplanar { determinant: f64 },

    /// The three centers lie on one line, so no tangent sphere lies in their plane.
    #[error("sphere centers are collinear")]
    Collinear,

    /// The tangency equations have no real solution with non-negative distances.
    #[error("no sphere is externally tangent to all inputs")]
    NoTangentSphere,

    /// The solver produced NaN or infinite coordinates.
    #[error("solver produced a non-finite result")]
    NonFinite,
}

/// Failures of the incremental convex hull builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HullError {
    #[error("convex hull in {dimension} dimensions needs at least {required} points, found {found}")]
    TooFewPoints {
        dimension: usize,
        required: usize,
        found: usize,
    },

    /// The extreme seed points do not span a hyperplane.
    #[error("seed points {corners:?} do not span a hyperplane")]
    DegenerateSeed { corners: Vec<usize> },

    /// Every remaining point lies on the seed hyperplane.
    #[error("all points lie in a single hyperplane")]
    Flat,
}

/// Failures of the full triangulation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriangulationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("convex hull construction failed: {0}")]
    Hull(#[from] HullError),
}

impl TriangulationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TriangulationError::InvalidInput(message.into())
    }
}

/// Inconsistencies reported by [`crate::VoronoiGraph::check`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {from} links to {to}, but {to} does not link back")]
    Asymmetric { from: usize, to: usize },

    #[error("bottleneck of edge {from} -> {to} differs from the reverse direction")]
    BottleneckMismatch { from: usize, to: usize },

    #[error("weight of edge {from} -> {to} differs from the reverse direction")]
    WeightMismatch { from: usize, to: usize },

    #[error("node {node} has a neighbour {neighbour} outside the graph")]
    DanglingNeighbour { node: usize, neighbour: i32 },
}
