use crs_store::plan::PlanNode;
use std::sync::Arc;

/// A child the expander wants added to a leaf node, with its UCB prior.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    pub description: String,
    pub action: String,
    pub prior: f64,
}

impl ChildSpec {
    #[must_use]
    pub fn new(description: impl Into<String>, action: impl Into<String>, prior: f64) -> Self {
        Self {
            description: description.into(),
            action: action.into(),
            prior,
        }
    }
}

/// Domain-specific plugin: what children a leaf has, and the rollout
/// score for a chosen node. Kept separate from `ParallelMctsEngine` so
/// the engine itself stays domain-agnostic, per §9's "composition, not
/// inheritance" guidance.
pub trait Expander: Send + Sync {
    fn expand(&self, node: &Arc<PlanNode>) -> Vec<ChildSpec>;

    fn rollout(&self, node: &Arc<PlanNode>) -> f64;

    /// Optional transposition key; nodes with the same key share
    /// statistics when the transposition table is enabled. Returning
    /// `None` opts a node out of transposition sharing.
    fn state_hash(&self, _node: &Arc<PlanNode>) -> Option<u64> {
        None
    }
}
