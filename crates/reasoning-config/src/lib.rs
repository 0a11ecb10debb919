pub mod config;
pub mod duration_millis;
pub mod error;
pub mod loader;
pub mod registry;

pub use config::{
    AlgorithmConfig, BudgetConfig, CircuitBreakerConfig, DegradationConfig, MctsFullConfig,
    ObservabilityConfig, ParallelConfig, PruningConfig, SimulationConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::load;
pub use registry::{register_activity_label, sanitize_activity_label};
