use reasoning_algorithms::AlgorithmError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wraps an algorithm-level failure with the activity and operation that
/// observed it, per the `ActivityError { activity, operation, err }`
/// shape.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[error("activity {activity} failed during {operation}: {err}")]
pub struct ActivityError {
    pub activity: &'static str,
    pub operation: &'static str,
    pub err: AlgorithmError,
}

impl ActivityError {
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        self.err.is_cancellation()
    }

    /// Unwraps to the underlying algorithm error, discarding the
    /// activity/operation context.
    #[must_use]
    pub fn into_inner(self) -> AlgorithmError {
        self.err
    }
}

pub type ActivityFnResult<T> = Result<T, ActivityError>;
