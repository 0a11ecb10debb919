use crs_store::CrsError;
use reasoning_activities::ActivityError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("activity execution failed: {0}")]
    Activity(#[from] ActivityError),

    #[error("store error: {0}")]
    Store(#[from] CrsError),

    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("operation cancelled")]
    Cancelled,
}

impl BridgeError {
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retriable())
    }

    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
            || matches!(self, Self::Activity(e) if e.is_cancellation())
    }
}

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoordinatorError {
    #[error("required activity {activity} failed: {source}")]
    RequiredActivityFailed {
        activity: &'static str,
        source: BridgeError,
    },

    #[error("activity {0} is not registered")]
    UnknownActivity(&'static str),

    #[error("operation cancelled")]
    Cancelled,
}

pub type BridgeResult<T> = Result<T, BridgeError>;
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
