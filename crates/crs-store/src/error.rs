//! Structured error type for the CRS store.
//!
//! Mirrors the agent crate's `AgentError`: one variant per failure mode,
//! carrying typed context, with `Conflict`/`Cancelled`/`DeadlineExceeded`
//! preserved as-is through wrapping layers so retry logic can pattern-match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CrsError {
    #[error("apply conflict: delta was built against generation {expected}, current is {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("composite delta nesting exceeded depth bound {limit}")]
    DepthExceeded { limit: usize },
}

impl CrsError {
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type CrsResult<T> = Result<T, CrsError>;
