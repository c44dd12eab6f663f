use crate::error::MatchError;
use crate::kdtree::KdTree;
use crate::options::MatchOptions;
use crate::point::{mirror_x, Point3};
use rayon::prelude::*;

/// The input of one match: a target group followed by reference groups.
///
/// The first group holds the points that get moved; every following group is
/// read-only reference geometry that the k-d tree is built from. A request is
/// immutable once constructed, so the same match can be re-run at any time.
#[derive(Clone, Debug)]
pub struct MatchRequest {
    groups: Vec<Vec<Point3>>,
    options: MatchOptions,
}

impl MatchRequest {
    /// Creates a request, failing with [`MatchError::MalformedGroups`] unless
    /// there is a target group and at least one reference group.
    pub fn new(groups: Vec<Vec<Point3>>, options: MatchOptions) -> Result<Self, MatchError> {
        if groups.len() < 2 {
            return Err(MatchError::MalformedGroups(groups.len()));
        }
        Ok(Self { groups, options })
    }

    /// Positions of the target points before matching.
    pub fn targets(&self) -> &[Point3] {
        &self.groups[0]
    }

    pub fn reference_groups(&self) -> &[Vec<Point3>] {
        &self.groups[1..]
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn mirror(&self) -> bool {
        self.options.mirror
    }

    /// Total number of points over all groups.
    pub fn point_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// The points the tree is built from, reflected across `x = 0` when mirroring.
    /// The target group never contributes.
    pub fn reference_points(&self) -> Vec<Point3> {
        let mirror = self.options.mirror;
        self.reference_groups()
            .iter()
            .flatten()
            .map(|p| if mirror { mirror_x(p) } else { *p })
            .collect()
    }

    /// Builds the lookup tree, failing with [`MatchError::EmptyReference`] when
    /// there is nothing to match against.
    pub fn build_tree(&self) -> Result<KdTree, MatchError> {
        let reference = self.reference_points();
        if reference.is_empty() {
            return Err(MatchError::EmptyReference);
        }
        Ok(KdTree::build(&reference))
    }

    /// Whether a target at `p` may be moved. When mirroring, only the `x < 0`
    /// half is matched; the other half is left where it is.
    pub fn is_eligible(&self, p: &Point3) -> bool {
        !(self.options.mirror && p[0] >= 0.0)
    }

    /// Runs the match, returning the original and matched target positions.
    ///
    /// Nothing is computed unless the reference collection is non-empty, so a
    /// failed request never yields a partial result.
    pub fn apply(&self) -> Result<MatchResult, MatchError> {
        let tree = self.build_tree()?;
        let original = self.targets().to_vec();

        let lookup = |p: &Point3| -> Point3 {
            if !self.is_eligible(p) {
                return *p;
            }
            tree.nearest(p).unwrap_or(*p)
        };

        // Lookups only read the tree, so results can be collected by index.
        let matched: Vec<Point3> = if self.options.parallel {
            original.par_iter().map(lookup).collect()
        } else {
            original.iter().map(lookup).collect()
        };

        let skipped = original.iter().filter(|p| !self.is_eligible(p)).count();
        let moved = original.iter().zip(&matched).filter(|(a, b)| a != b).count();

        Ok(MatchResult {
            original,
            matched,
            moved,
            skipped,
            applied: true,
        })
    }
}

/// The reversible outcome of a [`MatchRequest`].
///
/// Holds a snapshot of every target position before the match, in the same
/// order as the target group, alongside the matched positions.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    original: Vec<Point3>,
    matched: Vec<Point3>,
    moved: usize,
    skipped: usize,
    applied: bool,
}

impl MatchResult {
    pub fn original(&self) -> &[Point3] {
        &self.original
    }

    pub fn matched(&self) -> &[Point3] {
        &self.matched
    }

    /// The positions the target group should currently hold.
    pub fn positions(&self) -> &[Point3] {
        if self.applied { &self.matched } else { &self.original }
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Number of target points whose position changed.
    pub fn moved(&self) -> usize {
        self.moved
    }

    /// Number of target points left alone by the mirror-side rule.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Marks the match as undone and returns the original positions.
    pub fn revert(&mut self) -> &[Point3] {
        self.applied = false;
        &self.original
    }

    /// Re-runs `request` from scratch and returns the new matched positions.
    pub fn reapply(&mut self, request: &MatchRequest) -> Result<&[Point3], MatchError> {
        *self = request.apply()?;
        Ok(&self.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points_exclude_targets() {
        let request = MatchRequest::new(
            vec![vec![[9.0, 9.0, 9.0]], vec![[1.0, 0.0, 0.0]], vec![[2.0, 3.0, 4.0]]],
            MatchOptions::default(),
        )
        .unwrap();
        assert_eq!(request.reference_points(), vec![[1.0, 0.0, 0.0], [2.0, 3.0, 4.0]]);
        assert_eq!(request.point_count(), 3);
    }

    #[test]
    fn test_reference_points_mirrored() {
        let request = MatchRequest::new(
            vec![vec![[1.0, 1.0, 1.0]], vec![[5.0, 1.0, 2.0], [-3.0, 0.0, 0.0]]],
            MatchOptions::default().with_mirror(true),
        )
        .unwrap();
        assert_eq!(request.reference_points(), vec![[-5.0, 1.0, 2.0], [3.0, 0.0, 0.0]]);
        // the target group is never mirrored
        assert_eq!(request.targets(), &[[1.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_eligibility() {
        let plain = MatchRequest::new(vec![vec![], vec![]], MatchOptions::default()).unwrap();
        assert!(plain.is_eligible(&[1.0, 0.0, 0.0]));
        assert!(plain.is_eligible(&[-1.0, 0.0, 0.0]));

        let mirrored =
            MatchRequest::new(vec![vec![], vec![]], MatchOptions::default().with_mirror(true)).unwrap();
        assert!(!mirrored.is_eligible(&[0.0, 0.0, 0.0]));
        assert!(!mirrored.is_eligible(&[1.0, 0.0, 0.0]));
        assert!(mirrored.is_eligible(&[-0.5, 0.0, 0.0]));
    }

    #[test]
    fn test_revert_toggles_positions() {
        let request = MatchRequest::new(
            vec![vec![[1.0, 1.0, 1.0]], vec![[0.0, 0.0, 0.0]]],
            MatchOptions::default(),
        )
        .unwrap();
        let mut result = request.apply().unwrap();
        assert!(result.is_applied());
        assert_eq!(result.positions(), &[[0.0, 0.0, 0.0]]);
        assert_eq!(result.revert(), &[[1.0, 1.0, 1.0]]);
        assert!(!result.is_applied());
        assert_eq!(result.positions(), &[[1.0, 1.0, 1.0]]);
    }
}
