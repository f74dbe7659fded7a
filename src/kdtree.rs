#[derive(Clone, Copy, Debug)]
struct KdNode {
    min: [f64; 3],
    max: [f64; 3],
    left: u32, // u32::MAX if leaf
    right: u32,
    // Leaf data: indices[start..end]
    start: u32,
    end: u32,
    // Internal node data
    split_val: f64,
    axis: u8,
}

/// Static k-d tree over a slice of 3D points.
///
/// The tree only stores indices; every query takes the same point slice the
/// tree was built from.
#[derive(Clone, Debug, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    indices: Vec<usize>,
}

impl KdTree {
    pub fn new() -> Self {
        KdTree {
            nodes: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn build(&mut self, points: &[[f64; 3]]) {
        let count = points.len();
        self.indices = (0..count).collect();
        self.nodes.clear();

        if count == 0 {
            return;
        }

        // A balanced tree has 2*N nodes roughly
        self.nodes.reserve(count * 2);

        self.build_recursive(0, count, points);
    }

    fn build_recursive(&mut self, start: usize, end: usize, points: &[[f64; 3]]) -> u32 {
        let count = end - start;

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for &idx in &self.indices[start..end] {
            let p = points[idx];
            for axis in 0..3 {
                if p[axis] < min[axis] { min[axis] = p[axis]; }
                if p[axis] > max[axis] { max[axis] = p[axis]; }
            }
        }

        if count <= 16 {
            let node_idx = self.nodes.len() as u32;
            self.nodes.push(KdNode {
                min,
                max,
                left: u32::MAX,
                right: u32::MAX,
                start: start as u32,
                end: end as u32,
                split_val: 0.0,
                axis: 0,
            });
            return node_idx;
        }

        // Split along the widest extent
        let axis = if (max[0] - min[0]) >= (max[1] - min[1]) && (max[0] - min[0]) >= (max[2] - min[2]) {
            0
        } else if (max[1] - min[1]) >= (max[2] - min[2]) {
            1
        } else {
            2
        };

        let mid = start + count / 2;
        self.indices[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            points[a][axis]
                .partial_cmp(&points[b][axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let split_val = points[self.indices[mid]][axis];

        let left = self.build_recursive(start, mid, points);
        let right = self.build_recursive(mid, end, points);

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            min,
            max,
            left,
            right,
            start: 0,
            end: 0,
            split_val,
            axis: axis as u8,
        });
        node_idx
    }

    /// Nearest point accepted by `accept`, with its squared distance.
    pub fn nearest_by<F>(&self, point: [f64; 3], points: &[[f64; 3]], accept: F) -> Option<(usize, f64)>
    where
        F: Fn(usize) -> bool,
    {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        // Root is the last node pushed in our recursive build
        let root_idx = (self.nodes.len() - 1) as u32;
        self.nearest_recursive(root_idx, point, points, &accept, &mut best);
        best
    }

    pub fn nearest(&self, point: [f64; 3], points: &[[f64; 3]]) -> Option<(usize, f64)> {
        self.nearest_by(point, points, |_| true)
    }

    fn nearest_recursive<F>(
        &self,
        node_idx: u32,
        point: [f64; 3],
        points: &[[f64; 3]],
        accept: &F,
        best: &mut Option<(usize, f64)>,
    ) where
        F: Fn(usize) -> bool,
    {
        let node = &self.nodes[node_idx as usize];
        let bound = best.map_or(f64::INFINITY, |(_, d2)| d2);
        if box_distance_sq(node, &point) > bound {
            return;
        }

        if node.left == u32::MAX {
            for &idx in &self.indices[node.start as usize..node.end as usize] {
                if !accept(idx) {
                    continue;
                }
                let d2 = distance_sq(&points[idx], &point);
                if best.map_or(true, |(_, b)| d2 < b) {
                    *best = Some((idx, d2));
                }
            }
            return;
        }

        // Visit nearest child first
        let diff = point[node.axis as usize] - node.split_val;
        let (first, second) = if diff <= 0.0 { (node.left, node.right) } else { (node.right, node.left) };
        self.nearest_recursive(first, point, points, accept, best);
        self.nearest_recursive(second, point, points, accept, best);
    }

    /// Calls `callback` with every point within `radius` of `point` and its squared distance.
    pub fn within<F>(&self, point: [f64; 3], radius: f64, points: &[[f64; 3]], callback: &mut F)
    where
        F: FnMut(usize, f64),
    {
        if self.nodes.is_empty() {
            return;
        }
        let root_idx = (self.nodes.len() - 1) as u32;
        self.within_recursive(root_idx, point, radius * radius, points, callback);
    }

    fn within_recursive<F>(&self, node_idx: u32, point: [f64; 3], max_dist_sq: f64, points: &[[f64; 3]], callback: &mut F)
    where
        F: FnMut(usize, f64),
    {
        let node = &self.nodes[node_idx as usize];
        if box_distance_sq(node, &point) > max_dist_sq {
            return;
        }

        if node.left == u32::MAX {
            for &idx in &self.indices[node.start as usize..node.end as usize] {
                let d2 = distance_sq(&points[idx], &point);
                if d2 <= max_dist_sq {
                    callback(idx, d2);
                }
            }
            return;
        }

        self.within_recursive(node.left, point, max_dist_sq, points, callback);
        self.within_recursive(node.right, point, max_dist_sq, points, callback);
    }
}

#[inline]
fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

#[inline]
fn box_distance_sq(node: &KdNode, point: &[f64; 3]) -> f64 {
    let mut d2 = 0.0;
    for i in 0..3 {
        let v = point[i];
        if v < node.min[i] { d2 += (node.min[i] - v).powi(2); }
        else if v > node.max[i] { d2 += (v - node.max[i]).powi(2); }
    }
    d2
}
