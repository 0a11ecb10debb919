//! Root- and leaf-parallel Monte Carlo tree search over `crs_store`
//! plan trees: UCB1/RAVE selection, optional transposition sharing,
//! virtual-loss-safe concurrent workers, and periodic pruning.

mod engine;
mod expander;
mod pruning;
mod selection;
mod transposition;

pub use engine::{EngineConfig, EngineStats, ParallelMctsEngine};
pub use expander::{ChildSpec, Expander};
pub use pruning::{prune, PruningPolicy};
pub use selection::{select_child, ucb1_score, RaveTable};
pub use transposition::TranspositionTable;
