//! Immutable-snapshot, generation-numbered Code Reasoning State (CRS)
//! store: the data model and the only component that may mutate
//! reasoning state (§3, §4.1).

pub mod constraint;
pub mod delta;
pub mod dependency;
pub mod error;
pub mod history;
pub mod plan;
pub mod proof;
pub mod signal;
pub mod snapshot;
pub mod store;
pub mod types;

pub use constraint::{Constraint, ConstraintIndex, ConstraintType};
pub use delta::{
    ApplyMetrics, ConstraintDelta, Delta, DependencyDelta, HistoryDelta, ProofDelta, ProofUpdate,
    MAX_COMPOSITE_DEPTH,
};
pub use dependency::{DependencyEdge, DependencyIndex};
pub use error::{CrsError, CrsResult};
pub use history::{HistoryEntry, HistoryIndex};
pub use plan::{AtomicF64, PlanNode, PlanNodeState, PlanTree, TreeBudget};
pub use proof::{ProofIndex, ProofNumber, ProofStatus};
pub use signal::Signal;
pub use snapshot::Snapshot;
pub use store::Crs;
pub use types::NodeId;
