use thiserror::Error;

/// Errors that can occur while matching points.
///
/// Every variant is reported before any target position is changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("expected a target group followed by at least one reference group, got {0} group(s)")]
    MalformedGroups(usize),

    #[error("reference groups contain no points to match against")]
    EmptyReference,

    #[error("matching {0} points was cancelled")]
    Cancelled(usize),

    #[error("no match has been recorded on this command")]
    NothingRecorded,

    #[error("target group has {found} points but the recorded match has {expected}")]
    TargetMismatch { expected: usize, found: usize },
}
