use crate::constraint::ConstraintIndex;
use crate::dependency::DependencyIndex;
use crate::history::HistoryIndex;
use crate::proof::ProofIndex;
use crate::types::NodeId;

/// An immutable, freely-shareable view of every index at one generation.
///
/// Cloning a `Snapshot` is O(1): each index is `Arc`-backed internally, so
/// cloning only bumps reference counts. Readers never block writers and
/// vice versa (§4.1).
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    generation: u64,
    proof: ProofIndex,
    constraint: ConstraintIndex,
    dependency: DependencyIndex,
    history: HistoryIndex,
}

impl Snapshot {
    #[must_use]
    pub const fn new(
        generation: u64,
        proof: ProofIndex,
        constraint: ConstraintIndex,
        dependency: DependencyIndex,
        history: HistoryIndex,
    ) -> Self {
        Self {
            generation,
            proof,
            constraint,
            dependency,
            history,
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn proof(&self) -> &ProofIndex {
        &self.proof
    }

    #[must_use]
    pub const fn constraint(&self) -> &ConstraintIndex {
        &self.constraint
    }

    #[must_use]
    pub const fn dependency(&self) -> &DependencyIndex {
        &self.dependency
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryIndex {
        &self.history
    }

    /// True when every node id exists as a key in the proof index. Used by
    /// `Constraint.Validate` / `Dependency.Validate` (§4.1) to reject
    /// deltas that reference nonexistent nodes.
    #[must_use]
    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.proof.get(id).is_some()
    }
}
