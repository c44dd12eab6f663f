use crate::point::{distance_sq, Point3};

const NONE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    point: Point3,
    negative: u32, // NONE if empty
    positive: u32,
}

/// A static k-d tree over 3D points for exact nearest-neighbor lookups.
///
/// Nodes split on x, y, z cycling with depth. Each node holds the median of
/// its range along its axis; points below it go to the negative child and
/// points at or above it to the positive child. The tree is immutable once
/// built, so it can be queried from many threads at once.
#[derive(Clone, Debug, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    depth: usize,
}

impl KdTree {
    /// Builds a balanced tree containing every point in `points`, duplicates included.
    pub fn build(points: &[Point3]) -> Self {
        let mut tree = KdTree {
            nodes: Vec::with_capacity(points.len()),
            depth: 0,
        };
        if points.is_empty() {
            return tree;
        }

        let mut scratch = points.to_vec();
        tree.build_recursive(&mut scratch, 0);
        log::debug!("built k-d tree over {} points, depth {}", tree.nodes.len(), tree.depth);
        tree
    }

    fn build_recursive(&mut self, points: &mut [Point3], depth: usize) -> u32 {
        if points.is_empty() {
            return NONE;
        }
        self.depth = self.depth.max(depth + 1);

        let axis = depth % 3;
        // Stable, so equal coordinates keep their input order. NaN sorts after every number.
        points.sort_by(|a, b| a[axis].total_cmp(&b[axis]));

        let mid = points.len() / 2;
        let point = points[mid];
        let (below, rest) = points.split_at_mut(mid);
        let negative = self.build_recursive(below, depth + 1);
        let positive = self.build_recursive(&mut rest[1..], depth + 1);

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode { point, negative, positive });
        node_idx
    }

    /// Number of points stored in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels from the root to the deepest node; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Iterates over the stored points in no particular order.
    pub fn points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.nodes.iter().map(|node| &node.point)
    }

    /// Returns the stored point closest to `query` by squared Euclidean distance.
    ///
    /// Returns `None` only when the tree is empty. Among points at exactly the
    /// same distance the result is deterministic for a given input order.
    pub fn nearest(&self, query: &Point3) -> Option<Point3> {
        if self.nodes.is_empty() {
            return None;
        }
        // Root is the last node pushed in our recursive build
        let root_idx = (self.nodes.len() - 1) as u32;
        self.nearest_recursive(root_idx, query, 0)
    }

    fn nearest_recursive(&self, node_idx: u32, query: &Point3, depth: usize) -> Option<Point3> {
        if node_idx == NONE {
            return None;
        }
        let node = &self.nodes[node_idx as usize];
        let axis = depth % 3;

        let (near, far) = if query[axis] < node.point[axis] {
            (node.negative, node.positive)
        } else {
            (node.positive, node.negative)
        };

        let mut best = closer(query, self.nearest_recursive(near, query, depth + 1), node.point);

        // Anything across the splitting plane is at least `diff^2` away.
        let diff = query[axis] - node.point[axis];
        if distance_sq(query, &best) > diff * diff {
            best = closer(query, self.nearest_recursive(far, query, depth + 1), best);
        }
        Some(best)
    }
}

/// Picks whichever of `candidate` and `current` is closer to `query`, keeping
/// `current` on ties and when there is no candidate.
#[inline]
fn closer(query: &Point3, candidate: Option<Point3>, current: Point3) -> Point3 {
    match candidate {
        Some(c) if distance_sq(query, &c) < distance_sq(query, &current) => c,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_is_root() {
        let tree = KdTree::build(&[[3.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let root = tree.nodes.last().unwrap();
        assert_eq!(root.point, [2.0, 0.0, 0.0]);
        assert_eq!(tree.nodes[root.negative as usize].point, [1.0, 0.0, 0.0]);
        assert_eq!(tree.nodes[root.positive as usize].point, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_even_count_picks_upper_median() {
        // mid = floor(4 / 2) = 2, so the third smallest x becomes the root
        let tree = KdTree::build(&[
            [4.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
        ]);
        let root = tree.nodes.last().unwrap();
        assert_eq!(root.point, [3.0, 0.0, 0.0]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_split_invariant() {
        let points: Vec<Point3> = (0..64)
            .map(|i| {
                let v = i as f64;
                [(v * 7.0) % 13.0, (v * 5.0) % 11.0, (v * 3.0) % 17.0]
            })
            .collect();
        let tree = KdTree::build(&points);

        fn collect(tree: &KdTree, idx: u32, out: &mut Vec<Point3>) {
            if idx == NONE {
                return;
            }
            let node = &tree.nodes[idx as usize];
            out.push(node.point);
            collect(tree, node.negative, out);
            collect(tree, node.positive, out);
        }

        fn check(tree: &KdTree, idx: u32, depth: usize) {
            if idx == NONE {
                return;
            }
            let node = &tree.nodes[idx as usize];
            let axis = depth % 3;
            let mut below = Vec::new();
            collect(tree, node.negative, &mut below);
            assert!(below.iter().all(|p| p[axis] <= node.point[axis]));
            let mut above = Vec::new();
            collect(tree, node.positive, &mut above);
            assert!(above.iter().all(|p| p[axis] >= node.point[axis]));
            check(tree, node.negative, depth + 1);
            check(tree, node.positive, depth + 1);
        }

        check(&tree, (tree.nodes.len() - 1) as u32, 0);
    }

    #[test]
    fn test_closer_prefers_current_on_tie() {
        let q = [0.0, 0.0, 0.0];
        assert_eq!(closer(&q, None, [1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(closer(&q, Some([0.0, 1.0, 0.0]), [1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(closer(&q, Some([0.5, 0.0, 0.0]), [1.0, 0.0, 0.0]), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_nan_coordinates() {
        let points: Vec<Point3> = (0..200)
            .map(|i| {
                let v = i as f64;
                let x = if i % 5 == 0 { f64::NAN } else { v };
                [x, (v * 3.0) % 7.0, (v * 5.0) % 11.0]
            })
            .collect();
        let tree = KdTree::build(&points);
        assert_eq!(tree.len(), 200);
        assert_eq!(tree.points().filter(|p| p[0].is_nan()).count(), 40);
        assert!(tree.nearest(&[12.0, 1.0, 5.0]).is_some());
        assert!(tree.nearest(&[f64::NAN, 0.0, 0.0]).is_some());
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.nearest(&[0.0, 0.0, 0.0]), None);
    }
}
