//! Step taxonomy.
//!
//! Every phase of an activity is identified by a [`Step`]. Sequential steps
//! are mutually exclusive with each other. Parallel steps come in start/end
//! pairs and may overlap sequential work (waiting for a review while
//! investigating something else). `Pause` suspends everything and `Total` is
//! the synthetic union-of-sessions row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Meeting,
    Other,
    Investigate,
    Implement,
    WaitForReviewStart,
    WaitForReviewEnd,
    ResolveComments,
    DoReview,
    LoadingStart,
    LoadingEnd,
    Pause,
    Total,
}

/// Category of a step. The single source of truth for classification --
/// callers match on this instead of growing their own predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Sequential,
    ParallelStart,
    ParallelEnd,
    Pause,
    Total,
}

impl Step {
    /// Steps that get a duration row, `Total` last.
    pub const TRACKED: [Step; 9] = [
        Step::Meeting,
        Step::Other,
        Step::Investigate,
        Step::Implement,
        Step::WaitForReviewStart,
        Step::ResolveComments,
        Step::DoReview,
        Step::LoadingStart,
        Step::Total,
    ];

    pub const PARALLEL_STARTS: [Step; 2] = [Step::WaitForReviewStart, Step::LoadingStart];

    pub fn kind(self) -> StepKind {
        match self {
            Step::Meeting
            | Step::Other
            | Step::Investigate
            | Step::Implement
            | Step::ResolveComments
            | Step::DoReview => StepKind::Sequential,
            Step::WaitForReviewStart | Step::LoadingStart => StepKind::ParallelStart,
            Step::WaitForReviewEnd | Step::LoadingEnd => StepKind::ParallelEnd,
            Step::Pause => StepKind::Pause,
            Step::Total => StepKind::Total,
        }
    }

    pub fn is_parallel(self) -> bool {
        matches!(self.kind(), StepKind::ParallelStart | StepKind::ParallelEnd)
    }

    /// The end counterpart of a parallel start.
    ///
    /// # Panics
    /// Calling this on anything but a parallel start is a contract
    /// violation and aborts.
    pub fn parallel_end(self) -> Step {
        match self {
            Step::WaitForReviewStart => Step::WaitForReviewEnd,
            Step::LoadingStart => Step::LoadingEnd,
            other => panic!("step {other} is not a parallel start"),
        }
    }

    /// The start counterpart of a parallel end.
    ///
    /// # Panics
    /// Calling this on anything but a parallel end is a contract violation
    /// and aborts.
    pub fn parallel_start(self) -> Step {
        match self {
            Step::WaitForReviewEnd => Step::WaitForReviewStart,
            Step::LoadingEnd => Step::LoadingStart,
            other => panic!("step {other} is not a parallel end"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Meeting => "MEETING",
            Step::Other => "OTHER",
            Step::Investigate => "INVESTIGATE",
            Step::Implement => "IMPLEMENT",
            Step::WaitForReviewStart => "WAIT_FOR_REVIEW_START",
            Step::WaitForReviewEnd => "WAIT_FOR_REVIEW_END",
            Step::ResolveComments => "RESOLVE_COMMENTS",
            Step::DoReview => "DO_REVIEW",
            Step::LoadingStart => "LOADING_START",
            Step::LoadingEnd => "LOADING_END",
            Step::Pause => "PAUSE",
            Step::Total => "TOTAL",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown step '{0}'")]
pub struct ParseStepError(String);

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MEETING" => Ok(Step::Meeting),
            "OTHER" => Ok(Step::Other),
            "INVESTIGATE" => Ok(Step::Investigate),
            "IMPLEMENT" => Ok(Step::Implement),
            "WAIT_FOR_REVIEW_START" => Ok(Step::WaitForReviewStart),
            "WAIT_FOR_REVIEW_END" => Ok(Step::WaitForReviewEnd),
            "RESOLVE_COMMENTS" => Ok(Step::ResolveComments),
            "DO_REVIEW" => Ok(Step::DoReview),
            "LOADING_START" => Ok(Step::LoadingStart),
            "LOADING_END" => Ok(Step::LoadingEnd),
            "PAUSE" => Ok(Step::Pause),
            "TOTAL" => Ok(Step::Total),
            _ => Err(ParseStepError(s.to_string())),
        }
    }
}

/// One entry of an activity's append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    pub at: DateTime<Utc>,
    pub step: Step,
}

impl TimeLog {
    pub fn new(step: Step, at: DateTime<Utc>) -> Self {
        Self { at, step }
    }
}
