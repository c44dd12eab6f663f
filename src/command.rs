use crate::error::MatchError;
use crate::matching::{MatchRequest, MatchResult};
use crate::options::MatchOptions;
use crate::point::{BoundingBox, Point3};

/// Access to the point groups of a host scene.
///
/// Group 0 is the target group whose positions get overwritten; the remaining
/// groups are reference geometry and are only read.
pub trait PointGroups {
    fn group_count(&self) -> usize;

    /// Positions of every point in `group`, in a stable order.
    fn positions(&self, group: usize) -> Vec<Point3>;

    /// Number of points in `group`.
    fn group_len(&self, group: usize) -> usize {
        self.positions(group).len()
    }

    /// Overwrites the target group, point by point in the order of [`Self::positions`].
    fn set_target_positions(&mut self, positions: &[Point3]);
}

impl PointGroups for Vec<Vec<Point3>> {
    fn group_count(&self) -> usize {
        self.len()
    }

    fn positions(&self, group: usize) -> Vec<Point3> {
        self[group].clone()
    }

    fn group_len(&self, group: usize) -> usize {
        self[group].len()
    }

    fn set_target_positions(&mut self, positions: &[Point3]) {
        if let Some(target) = self.first_mut() {
            *target = positions.to_vec();
        }
    }
}

/// Counts reported by a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    pub targets: usize,
    pub moved: usize,
    pub skipped: usize,
}

impl From<&MatchResult> for MatchSummary {
    fn from(result: &MatchResult) -> Self {
        Self {
            targets: result.original().len(),
            moved: result.moved(),
            skipped: result.skipped(),
        }
    }
}

/// An undoable "match vertices" command.
///
/// `do_it` reads the groups from the host, snaps the target points and keeps
/// the request and its result around so `undo_it` and `redo_it` can be issued
/// later against the same host.
#[derive(Debug, Default)]
pub struct VertMatch {
    options: MatchOptions,
    request: Option<MatchRequest>,
    result: Option<MatchResult>,
}

impl VertMatch {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            options,
            request: None,
            result: None,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Changes the mirror flag used by the next `do_it`. A recorded match keeps
    /// its own flag, so `undo_it` and `redo_it` are unaffected.
    pub fn set_mirror(&mut self, mirror: bool) {
        self.options.mirror = mirror;
    }

    pub fn is_undoable(&self) -> bool {
        true
    }

    /// The result of the last match, if one ran.
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Runs the match against `groups`.
    ///
    /// When the total point count reaches the configured threshold, `confirm`
    /// is called with that count and a `false` answer cancels the command
    /// before anything is built or written.
    pub fn do_it<G, F>(&mut self, groups: &mut G, confirm: F) -> Result<MatchSummary, MatchError>
    where
        G: PointGroups + ?Sized,
        F: FnOnce(usize) -> bool,
    {
        let collected: Vec<Vec<Point3>> = (0..groups.group_count()).map(|g| groups.positions(g)).collect();
        let request = MatchRequest::new(collected, self.options)?;

        let count = request.point_count();
        if self.options.is_large_input(count) {
            log::warn!("matching {} points, this may take a while", count);
            if !confirm(count) {
                return Err(MatchError::Cancelled(count));
            }
        }

        let (result, summary) = Self::run(&request, groups)?;
        self.request = Some(request);
        self.result = Some(result);
        Ok(summary)
    }

    /// Restores every target point to where it was before the last match.
    pub fn undo_it<G>(&mut self, groups: &mut G) -> Result<(), MatchError>
    where
        G: PointGroups + ?Sized,
    {
        let result = self.result.as_mut().ok_or(MatchError::NothingRecorded)?;
        let found = if groups.group_count() > 0 { groups.group_len(0) } else { 0 };
        if found != result.original().len() {
            return Err(MatchError::TargetMismatch {
                expected: result.original().len(),
                found,
            });
        }
        groups.set_target_positions(result.revert());
        log::debug!("restored {} target points", found);
        Ok(())
    }

    /// Runs the last match again from the stored request.
    pub fn redo_it<G>(&mut self, groups: &mut G) -> Result<MatchSummary, MatchError>
    where
        G: PointGroups + ?Sized,
    {
        let request = self.request.as_ref().ok_or(MatchError::NothingRecorded)?;
        let (result, summary) = Self::run(request, groups)?;
        self.result = Some(result);
        Ok(summary)
    }

    fn run<G>(request: &MatchRequest, groups: &mut G) -> Result<(MatchResult, MatchSummary), MatchError>
    where
        G: PointGroups + ?Sized,
    {
        let expected = request.targets().len();
        let found = if groups.group_count() > 0 { groups.group_len(0) } else { 0 };
        if found != expected {
            return Err(MatchError::TargetMismatch { expected, found });
        }

        let clock = Stopwatch::start();
        let result = request.apply()?;
        groups.set_target_positions(result.matched());
        let summary = MatchSummary::from(&result);

        if log::log_enabled!(log::Level::Info) {
            let extent = BoundingBox::from_points(request.targets()).map(|b| b.extent());
            log::info!(
                "moved {} of {} points ({} skipped) against {} reference points, target extent {:?}{}",
                summary.moved,
                summary.targets,
                summary.skipped,
                request.point_count() - expected,
                extent,
                clock.elapsed_suffix(),
            );
        }

        Ok((result, summary))
    }
}

// `Instant` is not available on wasm32-unknown-unknown.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_suffix(&self) -> String {
        format!(" in {:.3}s", self.start.elapsed().as_secs_f64())
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_suffix(&self) -> String {
        String::new()
    }
}
