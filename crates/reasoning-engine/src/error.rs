use reasoning_bridge::CoordinatorError;
use reasoning_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),
}

pub type EngineResult<T> = Result<T, EngineError>;
