//! `MctsFullConfig`: nested record of Budget/Algorithm/Simulation/
//! CircuitBreaker/Degradation/Parallel/Pruning/Observability settings
//! (§6), loaded defaults-then-file-then-env.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_max_nodes() -> u64 {
    10_000
}
fn default_max_depth() -> u32 {
    64
}
fn default_max_expansions() -> u64 {
    1_000_000
}
fn default_time_limit() -> Duration {
    Duration::from_secs(30)
}
fn default_llm_token_limit() -> u64 {
    200_000
}
fn default_llm_call_limit() -> u32 {
    256
}
fn default_cost_limit_usd() -> f64 {
    5.0
}

/// `TreeBudget` in config form — every counter checked on each MCTS
/// iteration, exhaustion terminates search gracefully.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct BudgetConfig {
    pub max_nodes: u64,
    pub max_depth: u32,
    pub max_expansions: u64,
    #[serde(with = "crate::duration_millis")]
    pub time_limit: Duration,
    pub llm_token_limit: u64,
    pub llm_call_limit: u32,
    pub cost_limit_usd: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            max_depth: default_max_depth(),
            max_expansions: default_max_expansions(),
            time_limit: default_time_limit(),
            llm_token_limit: default_llm_token_limit(),
            llm_call_limit: default_llm_call_limit(),
            cost_limit_usd: default_cost_limit_usd(),
        }
    }
}

fn default_exploration_constant() -> f64 {
    std::f64::consts::SQRT_2
}
fn default_progress_interval_ms() -> u64 {
    100
}
fn default_algorithm_timeout() -> Duration {
    Duration::from_secs(5)
}

/// UCB1 and per-algorithm defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AlgorithmConfig {
    pub exploration_constant: f64,
    pub progress_interval_ms: u64,
    #[serde(with = "crate::duration_millis")]
    pub default_timeout: Duration,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            exploration_constant: default_exploration_constant(),
            progress_interval_ms: default_progress_interval_ms(),
            default_timeout: default_algorithm_timeout(),
        }
    }
}

fn default_rollout_depth() -> u32 {
    16
}
fn default_sample_rate() -> f64 {
    1.0
}

/// Rollout/simulation sampling.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SimulationConfig {
    pub rollout_depth: u32,
    /// Fraction of eligible simulations actually run, in `[0, 1]`.
    pub sample_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rollout_depth: default_rollout_depth(),
            sample_rate: default_sample_rate(),
        }
    }
}

fn default_error_rate_threshold() -> f64 {
    0.5
}
fn default_window_size() -> u32 {
    20
}
fn default_cooldown() -> Duration {
    Duration::from_secs(10)
}

/// Thresholds feeding `EventContext.error_rate` / the `CircuitBreaker`
/// event, mirrored here so the host process can tune them without a
/// redeploy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct CircuitBreakerConfig {
    pub error_rate_threshold: f64,
    pub window_size: u32,
    #[serde(with = "crate::duration_millis")]
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            error_rate_threshold: default_error_rate_threshold(),
            window_size: default_window_size(),
            cooldown: default_cooldown(),
        }
    }
}

fn default_degrade_after_failures() -> u32 {
    3
}

/// Controls when the engine falls back to a cheaper activity mix after
/// repeated budget exhaustion or failures (informational only; the
/// engine always returns whatever partial results exist).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DegradationConfig {
    pub enabled: bool,
    pub degrade_after_failures: u32,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            degrade_after_failures: default_degrade_after_failures(),
        }
    }
}

fn default_num_workers() -> u32 {
    4
}
fn default_virtual_loss() -> f64 {
    1.0
}
fn default_max_concurrent_activities() -> usize {
    4
}

/// Root/leaf-parallel MCTS worker pool sizing and virtual-loss weight.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ParallelConfig {
    pub num_workers: u32,
    pub virtual_loss: f64,
    pub max_concurrent_activities: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
            virtual_loss: default_virtual_loss(),
            max_concurrent_activities: default_max_concurrent_activities(),
        }
    }
}

fn default_prune_interval() -> u32 {
    100
}
fn default_keep_best_n() -> usize {
    8
}
fn default_visits_threshold() -> u64 {
    5
}
fn default_score_threshold() -> f64 {
    0.1
}
fn default_max_abandoned_age() -> Duration {
    Duration::from_secs(60)
}

/// §4.7 pruning policy: every `prune_interval` iterations, for nodes
/// with more than `keep_best_n` children, discard low-scoring children
/// beyond the top N; sweep subtrees idle longer than `max_abandoned_age`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct PruningConfig {
    pub prune_interval: u32,
    pub keep_best_n: usize,
    pub visits_threshold: u64,
    pub score_threshold: f64,
    #[serde(with = "crate::duration_millis")]
    pub max_abandoned_age: Duration,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            prune_interval: default_prune_interval(),
            keep_best_n: default_keep_best_n(),
            visits_threshold: default_visits_threshold(),
            score_threshold: default_score_threshold(),
            max_abandoned_age: default_max_abandoned_age(),
        }
    }
}

/// Telemetry toggles; the engine never requires a live backend, these
/// only gate whether instruments record at all.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
    pub tracing_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            tracing_enabled: true,
        }
    }
}

/// Top-level merged configuration: defaults ≺ file ≺ env (§6).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct MctsFullConfig {
    pub budget: BudgetConfig,
    pub algorithm: AlgorithmConfig,
    pub simulation: SimulationConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub degradation: DegradationConfig,
    pub parallel: ParallelConfig,
    pub pruning: PruningConfig,
    pub observability: ObservabilityConfig,
}

impl MctsFullConfig {
    /// Rejections enumerated in §6, exactly.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.budget.max_nodes < 1 {
            return Err(ConfigError::Invalid {
                field: "budget.max_nodes",
                reason: "must be >= 1",
            });
        }
        if self.budget.max_depth < 1 {
            return Err(ConfigError::Invalid {
                field: "budget.max_depth",
                reason: "must be >= 1",
            });
        }
        if self.budget.llm_call_limit < 1 {
            return Err(ConfigError::Invalid {
                field: "budget.llm_call_limit",
                reason: "must be >= 1",
            });
        }
        if self.budget.cost_limit_usd <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "budget.cost_limit_usd",
                reason: "must be > 0",
            });
        }
        if self.algorithm.exploration_constant <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "algorithm.exploration_constant",
                reason: "must be > 0",
            });
        }
        if !(0.0..=1.0).contains(&self.simulation.sample_rate) {
            return Err(ConfigError::Invalid {
                field: "simulation.sample_rate",
                reason: "must be in [0, 1]",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        MctsFullConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_max_nodes() {
        let mut cfg = MctsFullConfig::default();
        cfg.budget.max_nodes = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_sample_rate() {
        let mut cfg = MctsFullConfig::default();
        cfg.simulation.sample_rate = 1.5;
        assert!(cfg.validate().is_err());

        cfg.simulation.sample_rate = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_exploration_constant() {
        let mut cfg = MctsFullConfig::default();
        cfg.algorithm.exploration_constant = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn round_trips_through_yaml() {
        let cfg = MctsFullConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: MctsFullConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(cfg, parsed);
    }
}
