//! Nearest neighbor search implementations

use pointbrush_core::{NearestNeighborSearch, Point3f};
use rstar::RTree;

/// A point with its index for spatial data structures
#[derive(Debug, Clone, PartialEq)]
struct IndexedPoint {
    position: Point3f,
    index: usize,
}

impl rstar::Point for IndexedPoint {
    type Scalar = f32;
    const DIMENSIONS: usize = 3;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            position: Point3f::new(generator(0), generator(1), generator(2)),
            index: usize::MAX,
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        match index {
            0 => self.position.x,
            1 => self.position.y,
            2 => self.position.z,
            _ => panic!("Invalid dimension"),
        }
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        match index {
            0 => &mut self.position.x,
            1 => &mut self.position.y,
            2 => &mut self.position.z,
            _ => panic!("Invalid dimension"),
        }
    }
}

/// R*-tree spatial index over point cloud positions.
///
/// Built once per cloud and queried read-only afterwards; a cloud with
/// different positions needs a fresh index. Query results carry the
/// index of each hit in the source positions slice, in no particular
/// order for radius queries.
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    /// Build an index over the given positions. Empty input is valid
    /// and yields an index that answers every query with no hits.
    pub fn build(positions: &[Point3f]) -> Self {
        let points: Vec<IndexedPoint> = positions
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedPoint {
                position: *p,
                index,
            })
            .collect();

        let tree = if points.is_empty() {
            RTree::new()
        } else {
            RTree::bulk_load(points)
        };

        Self { tree }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index contains no points
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl NearestNeighborSearch for RTreeIndex {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        let origin = IndexedPoint {
            position: *query,
            index: usize::MAX,
        };
        self.tree
            .nearest_neighbor_iter(&origin)
            .take(k)
            .map(|p| (p.index, (p.position - *query).magnitude()))
            .collect()
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        // squaring a negative radius would turn it into a real search
        // distance, so reject it before it reaches the tree
        if radius < 0.0 {
            return Vec::new();
        }

        let origin = IndexedPoint {
            position: *query,
            index: usize::MAX,
        };
        self.tree
            .locate_within_distance(origin, radius * radius)
            .map(|p| (p.index, (p.position - *query).magnitude()))
            .collect()
    }
}

/// Simple brute force nearest neighbor search for small datasets
pub struct BruteForceSearch {
    positions: Vec<Point3f>,
}

impl BruteForceSearch {
    pub fn new(positions: &[Point3f]) -> Self {
        Self {
            positions: positions.to_vec(),
        }
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        let mut distances: Vec<(usize, f32)> = self
            .positions
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let dx = point.x - query.x;
                let dy = point.y - query.y;
                let dz = point.z - query.z;
                let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                (idx, distance)
            })
            .collect();

        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        distances.truncate(k);
        distances
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        if radius < 0.0 {
            return Vec::new();
        }

        let radius_squared = radius * radius;
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| {
                let dx = point.x - query.x;
                let dy = point.y - query.y;
                let dz = point.z - query.z;
                let distance_squared = dx * dx + dy * dy + dz * dz;

                if distance_squared <= radius_squared {
                    Some((idx, distance_squared.sqrt()))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_positions() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
            Point3f::new(3.0, 0.0, 0.0),
        ]
    }

    fn sorted_indices(mut neighbors: Vec<(usize, f32)>) -> Vec<usize> {
        neighbors.sort_by_key(|(idx, _)| *idx);
        neighbors.into_iter().map(|(idx, _)| idx).collect()
    }

    #[test]
    fn test_build_empty() {
        let index = RTreeIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);

        let query = Point3f::new(0.0, 0.0, 0.0);
        assert!(index.find_radius_neighbors(&query, 10.0).is_empty());
        assert!(index.find_k_nearest(&query, 3).is_empty());
    }

    #[test]
    fn test_build_single_point() {
        let index = RTreeIndex::build(&[Point3f::new(1.0, 1.0, 1.0)]);
        assert_eq!(index.len(), 1);

        let neighbors = index.find_radius_neighbors(&Point3f::new(1.0, 1.0, 1.5), 1.0);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].0, 0);
        assert_relative_eq!(neighbors[0].1, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_radius_neighbors_inclusive_boundary() {
        let index = RTreeIndex::build(&line_positions());
        let query = Point3f::new(0.0, 0.0, 0.0);

        // the point at distance exactly 1.0 is part of the result
        let neighbors = index.find_radius_neighbors(&query, 1.0);
        assert_eq!(sorted_indices(neighbors), vec![0, 1]);

        let neighbors = index.find_radius_neighbors(&query, 2.5);
        assert_eq!(sorted_indices(neighbors), vec![0, 1, 2]);
    }

    #[test]
    fn test_radius_neighbors_distances() {
        let index = RTreeIndex::build(&line_positions());
        let query = Point3f::new(0.0, 0.0, 0.0);

        let mut neighbors = index.find_radius_neighbors(&query, 2.0);
        neighbors.sort_by_key(|(idx, _)| *idx);
        for (idx, distance) in neighbors {
            assert_relative_eq!(distance, idx as f32, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_zero_radius_matches_exact_points() {
        let positions = vec![
            Point3f::new(1.0, 2.0, 3.0),
            Point3f::new(1.0, 2.0, 3.0),
            Point3f::new(1.0, 2.0, 3.5),
        ];
        let index = RTreeIndex::build(&positions);

        let neighbors = index.find_radius_neighbors(&Point3f::new(1.0, 2.0, 3.0), 0.0);
        assert_eq!(sorted_indices(neighbors), vec![0, 1]);
    }

    #[test]
    fn test_negative_radius_returns_empty() {
        let index = RTreeIndex::build(&line_positions());
        let query = Point3f::new(0.0, 0.0, 0.0);

        assert!(index.find_radius_neighbors(&query, -1.0).is_empty());

        let brute = BruteForceSearch::new(&line_positions());
        assert!(brute.find_radius_neighbors(&query, -1.0).is_empty());
    }

    #[test]
    fn test_k_nearest_ordering() {
        let index = RTreeIndex::build(&line_positions());
        let query = Point3f::new(0.9, 0.0, 0.0);

        let neighbors = index.find_k_nearest(&query, 2);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, 1);
        assert_eq!(neighbors[1].0, 0);
        assert_relative_eq!(neighbors[0].1, 0.1, epsilon = 1e-6);

        // asking for more neighbors than points returns all of them
        let neighbors = index.find_k_nearest(&query, 10);
        assert_eq!(neighbors.len(), 4);
    }

    #[test]
    fn test_rtree_matches_brute_force() {
        let mut positions = Vec::new();
        for x in 0..5 {
            for y in 0..5 {
                for z in 0..5 {
                    positions.push(Point3f::new(x as f32, y as f32 * 0.7, z as f32 * 1.3));
                }
            }
        }

        let index = RTreeIndex::build(&positions);
        let brute = BruteForceSearch::new(&positions);

        for query in [
            Point3f::new(2.0, 1.4, 2.6),
            Point3f::new(0.1, 0.1, 0.1),
            Point3f::new(-1.0, 3.0, 2.0),
        ] {
            for radius in [0.0, 0.5, 1.0, 2.0, 100.0] {
                let from_tree = sorted_indices(index.find_radius_neighbors(&query, radius));
                let from_brute = sorted_indices(brute.find_radius_neighbors(&query, radius));
                assert_eq!(from_tree, from_brute, "radius {} query {:?}", radius, query);
            }
        }
    }
}
