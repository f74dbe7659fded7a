use crate::edge::VoronoiEdge;
use crate::error::GraphError;
use crate::kdtree::KdTree;
use crate::sphere::{Segment, Sphere};

/// Neighbour id of an empty slot: a face onto unbounded space or towards a node without edges.
/// It is negative to prevent conflicts with node ids.
pub const NODE_ID_OUT: i32 = -1;
/// Query result for "no such adjacency", and the empty predecessor.
/// It is negative to prevent conflicts with node ids.
pub const NODE_ID_NULL: i32 = -2;

/// A node has one neighbour slot per tetrahedron face.
pub const MAX_NEIGHBOURS: usize = 4;

/// Fixed-size graph of Voronoi vertices.
///
/// Node `i` corresponds to Delaunay tetrahedron `i` and stores its tangent
/// sphere. Each node has four directed neighbour slots; edges are written in
/// both directions with the same payload so the graph reads as undirected.
/// The distance/previous arrays are scratch space for path searches run on
/// top of the graph and are never touched by the construction itself.
#[derive(Clone, Debug)]
pub struct VoronoiGraph {
    spheres: Vec<Sphere>,
    neighbours: Vec<[i32; MAX_NEIGHBOURS]>,
    edges: Vec<[Option<VoronoiEdge>; MAX_NEIGHBOURS]>,
    disabled: Vec<bool>,
    outer: Vec<bool>,
    distance: Vec<f64>,
    previous: Vec<i32>,
    index: Option<(KdTree, Vec<[f64; 3]>)>,
}

impl VoronoiGraph {
    /// Creates a graph with `size` nodes, no edges and zero spheres.
    pub fn new(size: usize) -> Self {
        Self {
            spheres: vec![Sphere::new([0.0; 3], 0.0); size],
            neighbours: vec![[NODE_ID_OUT; MAX_NEIGHBOURS]; size],
            edges: vec![[None; MAX_NEIGHBOURS]; size],
            disabled: vec![false; size],
            outer: vec![false; size],
            distance: vec![f64::INFINITY; size],
            previous: vec![NODE_ID_NULL; size],
            index: None,
        }
    }

    pub fn size(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn sphere(&self, node: usize) -> &Sphere {
        &self.spheres[node]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn set_sphere(&mut self, node: usize, sphere: Sphere) {
        self.spheres[node] = sphere;
    }

    /// Writes `y` and `edge` into the first free slot of `x`.
    ///
    /// Only one direction is written; callers connect `y` to `x` as well.
    ///
    /// # Panics
    ///
    /// Panics when `x` already has four neighbours or either node is out of range.
    pub fn connect(&mut self, x: usize, y: usize, edge: VoronoiEdge) {
        assert!(y < self.size(), "cannot connect node {} to missing node {}", x, y);
        let slot = self.neighbours[x]
            .iter()
            .position(|&n| n == NODE_ID_OUT)
            .unwrap_or_else(|| {
                panic!(
                    "node {} already has {} neighbours {:?}, cannot add {}",
                    x, MAX_NEIGHBOURS, self.neighbours[x], y
                )
            });
        self.neighbours[x][slot] = y as i32;
        self.edges[x][slot] = Some(edge);
    }

    /// Neighbour in `slot`, [`NODE_ID_OUT`] for an empty slot.
    pub fn neighbour(&self, node: usize, slot: usize) -> i32 {
        self.neighbours[node][slot]
    }

    /// Ids of all connected neighbours.
    pub fn neighbours(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbours[node]
            .iter()
            .filter(|&&n| n >= 0)
            .map(|&n| n as usize)
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbours(node).count()
    }

    /// Slot of `node` holding `neighbour`.
    pub fn gate(&self, node: usize, neighbour: usize) -> Option<usize> {
        self.neighbours[node].iter().position(|&n| n == neighbour as i32)
    }

    /// Neighbour id as stored, or [`NODE_ID_NULL`] when the two nodes are not adjacent.
    pub fn neighbour_id(&self, node: usize, neighbour: usize) -> i32 {
        match self.gate(node, neighbour) {
            Some(slot) => self.neighbours[node][slot],
            None => NODE_ID_NULL,
        }
    }

    pub fn are_connected(&self, x: usize, y: usize) -> bool {
        self.gate(x, y).is_some()
    }

    pub fn edge(&self, node: usize, slot: usize) -> Option<&VoronoiEdge> {
        self.edges[node][slot].as_ref()
    }

    pub fn edge_by_nodes(&self, x: usize, y: usize) -> Option<&VoronoiEdge> {
        self.gate(x, y).and_then(|slot| self.edge(x, slot))
    }

    /// Segment between the Voronoi vertices of `x` and `y`, oriented from `x`.
    pub fn segment_by_nodes(&self, x: usize, y: usize) -> Option<Segment> {
        self.edge_by_nodes(x, y).map(|e| e.segment())
    }

    pub fn bottleneck_by_gate(&self, node: usize, slot: usize) -> Option<Sphere> {
        self.edge(node, slot).map(|e| e.bottleneck)
    }

    pub fn bottleneck_by_nodes(&self, x: usize, y: usize) -> Option<Sphere> {
        self.edge_by_nodes(x, y).map(|e| e.bottleneck)
    }

    /// Weight of the edge in `slot`, `+inf` for an empty slot.
    pub fn weight(&self, node: usize, slot: usize) -> f64 {
        self.edge(node, slot).map_or(f64::INFINITY, |e| e.weight)
    }

    pub fn weight_by_nodes(&self, x: usize, y: usize) -> Option<f64> {
        self.edge_by_nodes(x, y).map(|e| e.weight)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        (0..self.size())
            .flat_map(|x| self.neighbours(x).filter(move |&y| x < y))
            .count()
    }

    // --- Flags ---

    pub fn disable(&mut self, node: usize) {
        self.disabled[node] = true;
    }

    pub fn enable(&mut self, node: usize) {
        self.disabled[node] = false;
    }

    pub fn is_disabled(&self, node: usize) -> bool {
        self.disabled[node]
    }

    pub fn set_outer(&mut self, node: usize, outer: bool) {
        self.outer[node] = outer;
    }

    /// Whether the node was tagged as bordering unbounded space.
    ///
    /// Empty slots alone do not count; a face towards a skipped node also leaves one.
    pub fn is_outer(&self, node: usize) -> bool {
        self.outer[node]
    }

    /// Whether an active node touches open space or a disabled neighbour.
    pub fn is_on_border(&self, node: usize) -> bool {
        if self.disabled[node] {
            return false;
        }
        self.is_outer(node) || self.neighbours(node).any(|n| self.disabled[n])
    }

    // --- Search state ---

    pub fn distance(&self, node: usize) -> f64 {
        self.distance[node]
    }

    pub fn set_distance(&mut self, node: usize, distance: f64) {
        self.distance[node] = distance;
    }

    /// Predecessor on the current search path, [`NODE_ID_NULL`] when unset.
    pub fn previous(&self, node: usize) -> i32 {
        self.previous[node]
    }

    pub fn set_previous(&mut self, node: usize, previous: i32) {
        self.previous[node] = previous;
    }

    /// Resets distances to `+inf` and predecessors to [`NODE_ID_NULL`].
    pub fn reset_search(&mut self) {
        self.distance.fill(f64::INFINITY);
        self.previous.fill(NODE_ID_NULL);
    }

    // --- Spatial index ---

    /// Builds the k-d tree over the current node centers.
    pub fn build_index(&mut self) {
        let centers: Vec<[f64; 3]> = self.spheres.iter().map(|s| s.center).collect();
        let mut tree = KdTree::new();
        tree.build(&centers);
        self.index = Some((tree, centers));
    }

    pub fn drop_index(&mut self) {
        self.index = None;
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Closest enabled node to `point`.
    ///
    /// Uses the spatial index when built and scans all nodes otherwise.
    pub fn nearest_node(&self, point: [f64; 3]) -> Option<usize> {
        match &self.index {
            Some((tree, centers)) => tree
                .nearest_by(point, centers, |i| !self.disabled[i])
                .map(|(i, _)| i),
            None => (0..self.size())
                .filter(|&i| !self.disabled[i])
                .map(|i| (i, crate::geometry::distance(&self.spheres[i].center, &point)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i),
        }
    }

    /// Enabled nodes whose center lies within `radius` of `point`, sorted by id.
    pub fn nodes_within(&self, point: [f64; 3], radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        match &self.index {
            Some((tree, centers)) => {
                tree.within(point, radius, centers, &mut |i, _| {
                    if !self.disabled[i] {
                        found.push(i);
                    }
                });
            }
            None => {
                for i in 0..self.size() {
                    if !self.disabled[i] && crate::geometry::distance(&self.spheres[i].center, &point) <= radius {
                        found.push(i);
                    }
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Verifies that every edge is present in both directions with the same payload.
    pub fn check(&self) -> Result<(), GraphError> {
        for x in 0..self.size() {
            for slot in 0..MAX_NEIGHBOURS {
                let n = self.neighbours[x][slot];
                if n == NODE_ID_OUT {
                    continue;
                }
                if n < 0 || n as usize >= self.size() {
                    return Err(GraphError::DanglingNeighbour { node: x, neighbour: n });
                }
                let y = n as usize;
                let back = self.gate(y, x).ok_or(GraphError::Asymmetric { from: x, to: y })?;
                let (forward, backward) = (self.edge(x, slot), self.edge(y, back));
                if forward.map(|e| e.bottleneck) != backward.map(|e| e.bottleneck) {
                    return Err(GraphError::BottleneckMismatch { from: x, to: y });
                }
                if forward.map(|e| e.weight) != backward.map(|e| e.weight) {
                    return Err(GraphError::WeightMismatch { from: x, to: y });
                }
            }
        }
        Ok(())
    }
}
