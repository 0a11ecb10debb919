use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AlgorithmError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("algorithm {algorithm} failed: {reason}")]
    Failed { algorithm: String, reason: String },

    #[error("health check failed: {reason}")]
    HealthCheckFailed { reason: String },
}

impl AlgorithmError {
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

pub type AlgorithmResult<T> = Result<T, AlgorithmError>;
