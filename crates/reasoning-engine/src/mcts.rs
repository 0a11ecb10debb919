//! Maps `reasoning_config::MctsFullConfig` onto `reasoning_mcts`'s
//! engine-level types, so the search algorithm itself never needs to
//! know about the config crate's load/env-override machinery.

use crs_store::plan::TreeBudget;
use reasoning_config::MctsFullConfig;
use reasoning_mcts::{EngineConfig, PruningPolicy};

#[must_use]
pub fn tree_budget(config: &MctsFullConfig) -> TreeBudget {
    TreeBudget {
        max_nodes: config.budget.max_nodes as i64,
        max_depth: config.budget.max_depth,
        max_expansions: config.budget.max_expansions as i64,
        time_limit: config.budget.time_limit,
        llm_token_limit: config.budget.llm_token_limit,
        llm_call_limit: u64::from(config.budget.llm_call_limit),
        cost_limit_usd: config.budget.cost_limit_usd,
    }
}

#[must_use]
pub fn engine_config(config: &MctsFullConfig) -> EngineConfig {
    EngineConfig {
        num_workers: config.parallel.num_workers as usize,
        max_iterations: config.budget.max_expansions,
        exploration_constant: config.algorithm.exploration_constant,
        virtual_loss: config.parallel.virtual_loss,
        use_rave: false,
        rave_equivalence: 50.0,
        use_transposition: false,
        pruning: PruningPolicy {
            prune_interval: u64::from(config.pruning.prune_interval),
            keep_best_n: config.pruning.keep_best_n,
            visits_threshold: config.pruning.visits_threshold as i64,
            score_threshold: config.pruning.score_threshold,
            max_abandoned_age: config.pruning.max_abandoned_age,
        },
    }
}
