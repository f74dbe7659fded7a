use rand::prelude::*;
use rand::rngs::StdRng;
use tunnelgraph::{
    triangulate, triangulate_snapshots, EdgeSampling, InverseClearanceCost, LengthCost, Sphere,
    TriangulationConfig, VoronoiGraph, MAX_NEIGHBOURS, NODE_ID_OUT,
};

fn random_spheres(count: usize, size: f64, radius: f64, seed: u64) -> Vec<Sphere> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Sphere::new(
                [rng.gen_range(0.0..size), rng.gen_range(0.0..size), rng.gen_range(0.0..size)],
                radius,
            )
        })
        .collect()
}

fn assert_same_graph(a: &VoronoiGraph, b: &VoronoiGraph) {
    assert_eq!(a.size(), b.size());
    for x in 0..a.size() {
        assert_eq!(a.sphere(x), b.sphere(x));
        assert_eq!(a.is_disabled(x), b.is_disabled(x));
        for slot in 0..MAX_NEIGHBOURS {
            assert_eq!(a.neighbour(x, slot), b.neighbour(x, slot));
            assert_eq!(a.edge(x, slot), b.edge(x, slot));
        }
    }
}

#[test]
fn test_random_graph_is_symmetric() {
    let spheres = random_spheres(300, 20.0, 1.0, 1);
    let graph = triangulate(&spheres, &TriangulationConfig::default(), &InverseClearanceCost::default()).unwrap();
    graph.check().unwrap();

    for x in 0..graph.size() {
        assert!(graph.degree(x) <= MAX_NEIGHBOURS);
        for y in graph.neighbours(x) {
            assert!(graph.are_connected(y, x));
            assert_eq!(graph.bottleneck_by_nodes(x, y), graph.bottleneck_by_nodes(y, x));
            assert_eq!(graph.weight_by_nodes(x, y), graph.weight_by_nodes(y, x));
            let forward = graph.segment_by_nodes(x, y).unwrap();
            let backward = graph.segment_by_nodes(y, x).unwrap();
            assert_eq!(forward.start, backward.end);
            assert_eq!(forward.end, backward.start);
        }
        // Unused slots read as open space.
        let open = (0..MAX_NEIGHBOURS).filter(|&s| graph.neighbour(x, s) == NODE_ID_OUT).count();
        assert_eq!(open + graph.degree(x), MAX_NEIGHBOURS);
    }
}

#[test]
fn test_negative_tangent_radius_disables_node() {
    // Atoms of radius 2 on a unit spaced cloud overlap, so many tangent radii turn negative.
    let spheres = random_spheres(100, 5.0, 2.0, 23);
    let graph = triangulate(&spheres, &TriangulationConfig::default(), &LengthCost).unwrap();
    let mut negative = 0;
    for x in 0..graph.size() {
        if graph.sphere(x).radius < 0.0 {
            negative += 1;
            assert!(graph.is_disabled(x));
        }
    }
    assert!(negative > 0);
}

#[test]
fn test_triangulation_is_repeatable() {
    let spheres = random_spheres(200, 15.0, 1.0, 8);
    let config = TriangulationConfig::default();
    let a = triangulate(&spheres, &config, &LengthCost).unwrap();
    let b = triangulate(&spheres, &config, &LengthCost).unwrap();
    assert_same_graph(&a, &b);
}

#[test]
fn test_snapshots_match_sequential_runs() {
    let snapshots: Vec<Vec<Sphere>> = (0..6).map(|seed| random_spheres(80, 10.0, 0.8, seed)).collect();
    let config = TriangulationConfig::default().with_probe_radius(0.2);
    let cost = InverseClearanceCost::new(1.0);

    let parallel = triangulate_snapshots(&snapshots, &config, &cost);
    assert_eq!(parallel.len(), snapshots.len());
    for (frame, result) in snapshots.iter().zip(parallel.iter()) {
        let sequential = triangulate(frame, &config, &cost).unwrap();
        assert_same_graph(result.as_ref().unwrap(), &sequential);
    }
}

#[test]
fn test_snapshot_errors_stay_per_frame() {
    let good = random_spheres(30, 5.0, 0.5, 2);
    let too_small = random_spheres(3, 5.0, 0.5, 3);
    let results = triangulate_snapshots(&[good, too_small], &TriangulationConfig::default(), &LengthCost);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_probe_radius_blocks_narrow_edges_only() {
    let spheres = random_spheres(150, 12.0, 1.0, 31);
    let probe = 0.5;
    let open = triangulate(&spheres, &TriangulationConfig::default(), &LengthCost).unwrap();
    let probed = triangulate(&spheres, &TriangulationConfig::default().with_probe_radius(probe), &LengthCost).unwrap();

    let mut blocked = 0;
    for x in 0..open.size() {
        for y in open.neighbours(x) {
            let edge = probed.edge_by_nodes(x, y).unwrap();
            let limiting = edge.limiting;
            let narrow = limiting.clearance(&edge.from) < probe || limiting.clearance(&edge.to) < probe;
            assert_eq!(edge.is_blocked(), narrow);
            if narrow {
                blocked += 1;
            } else {
                assert_eq!(Some(edge), open.edge_by_nodes(x, y));
            }
        }
    }
    assert!(blocked > 0);
}

#[test]
fn test_finer_sampling_tightens_bottlenecks() {
    let spheres = random_spheres(100, 10.0, 0.7, 4);
    // Fixed step counts so the fine samples include every coarse one.
    let coarse = EdgeSampling { step: 1.0, min_samples: 4, max_samples: 4 };
    let fine = EdgeSampling { step: 0.01, min_samples: 4096, max_samples: 4096 };
    let a = triangulate(&spheres, &TriangulationConfig::default().with_sampling(coarse), &LengthCost).unwrap();
    let b = triangulate(&spheres, &TriangulationConfig::default().with_sampling(fine), &LengthCost).unwrap();

    for x in 0..a.size() {
        for y in a.neighbours(x) {
            let ra = a.bottleneck_by_nodes(x, y).unwrap().radius;
            let rb = b.bottleneck_by_nodes(x, y).unwrap().radius;
            assert!(rb <= ra + 1e-12, "fine bottleneck {} above coarse {}", rb, ra);
        }
    }
}
