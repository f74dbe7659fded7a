use crate::hull::ConvexHull;

/// A lower-hull facet of the lifted point cloud, i.e. one Delaunay tetrahedron.
#[derive(Clone, Debug, PartialEq)]
pub struct DelaunayFacet {
    /// Dense index among the kept facets, `0..n`.
    pub index: usize,
    /// Index of the facet in the hull arena.
    pub facet: usize,
    /// Source sphere ids of the four corners.
    pub corners: [usize; 4],
    /// Dense index of the tetrahedron across the face opposite `corners[i]`,
    /// `None` when that face lies on the boundary of the point cloud.
    pub neighbors: [Option<usize>; 4],
}

/// Whether a hull facet belongs to the lower envelope of the lifted points.
#[inline]
pub fn is_lower(normal: &[f64; 4]) -> bool {
    normal[3] <= 0.0
}

/// Keeps the live lower-hull facets and translates their links into dense indices.
///
/// Links to upper-hull facets become `None`: those faces bound the convex
/// hull of the 3D points and open onto unbounded space.
pub fn lower_facets(hull: &ConvexHull<4>) -> Vec<DelaunayFacet> {
    let facets = hull.facets();
    let points = hull.points();

    let mut dense = vec![usize::MAX; facets.len()];
    let mut kept = Vec::new();
    for (i, facet) in hull.live_facets() {
        if is_lower(&facet.normal) {
            dense[i] = kept.len();
            kept.push(i);
        }
    }

    let result: Vec<DelaunayFacet> = kept
        .iter()
        .enumerate()
        .map(|(index, &i)| {
            let facet = &facets[i];
            let mut neighbors = [None; 4];
            for (slot, &n) in facet.neighbors.iter().enumerate() {
                if n >= facets.len() {
                    continue;
                }
                if facets[n].discarded {
                    log::warn!("Lower hull facet {} links to discarded facet {}", i, n);
                    continue;
                }
                if dense[n] != usize::MAX {
                    neighbors[slot] = Some(dense[n]);
                }
            }
            DelaunayFacet {
                index,
                facet: i,
                corners: facet.corners.map(|c| points[c].id),
                neighbors,
            }
        })
        .collect();

    log::debug!(
        "Delaunay filter kept {} of {} live hull facets",
        result.len(),
        hull.live_facets().count()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::point::LiftedPoint;

    #[test]
    fn test_interior_point_splits_tetrahedron() {
        let corners = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.3, 0.3, 0.3],
        ];
        let points: Vec<LiftedPoint<4>> = corners
            .iter()
            .enumerate()
            .map(|(i, p)| LiftedPoint::lift(i, p))
            .collect();
        let hull = ConvexHull::build(points).unwrap();
        let lower = lower_facets(&hull);
        // The interior point splits the tetrahedron into four.
        assert_eq!(lower.len(), 4);
        for (i, t) in lower.iter().enumerate() {
            assert_eq!(t.index, i);
            assert!(t.corners.contains(&4));
            let inner = t.neighbors.iter().filter(|n| n.is_some()).count();
            assert_eq!(inner, 3);
        }
    }

    #[test]
    fn test_is_lower() {
        assert!(is_lower(&[0.0, 0.0, 0.0, -1.0]));
        assert!(is_lower(&[1.0, 0.0, 0.0, 0.0]));
        assert!(!is_lower(&[0.0, 0.6, 0.0, 0.8]));
    }
}
