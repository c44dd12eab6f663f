/// Point count at which a host should ask before running a match.
pub const LARGE_INPUT_THRESHOLD: usize = 10_000;

/// Settings for a single match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    /// Reflect the reference points across `x = 0` and only move targets with `x < 0`.
    pub mirror: bool,
    /// Run the per-point lookups on the rayon thread pool.
    pub parallel: bool,
    /// Total point count from which [`crate::VertMatch::do_it`] asks for confirmation.
    pub large_input_threshold: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mirror: false,
            parallel: true,
            large_input_threshold: LARGE_INPUT_THRESHOLD,
        }
    }
}

impl MatchOptions {
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_large_input_threshold(mut self, threshold: usize) -> Self {
        self.large_input_threshold = threshold;
        self
    }

    /// Whether `count` points are enough to warrant a confirmation.
    pub fn is_large_input(&self, count: usize) -> bool {
        count >= self.large_input_threshold
    }
}
