//! The CRS store itself (§4.1): an `ArcSwap`-backed versioned root pointer.
//!
//! Readers call [`Crs::snapshot`], which is a single atomic load -- O(1),
//! no index copying. Writers publish a brand new [`Snapshot`] through a
//! single `compare_and_swap`, so the contract in §4.1 ("readers see a
//! consistent snapshot, writers commit atomically, generation strictly
//! increases") holds without a global lock on the read path.

use crate::constraint::ConstraintIndex;
use crate::delta::{ApplyMetrics, Delta};
use crate::dependency::DependencyIndex;
use crate::error::{CrsError, CrsResult};
use crate::history::HistoryIndex;
use crate::proof::ProofIndex;
use crate::snapshot::Snapshot;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide reasoning state container.
pub struct Crs {
    root: ArcSwap<Snapshot>,
    graph_cache_valid: AtomicBool,
}

impl Crs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ArcSwap::from_pointee(Snapshot::default()),
            graph_cache_valid: AtomicBool::new(true),
        }
    }

    /// O(1): an atomic load of the current root pointer.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        (**self.root.load()).clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.root.load().generation()
    }

    /// Validate `delta` against the *current* generation and, on success,
    /// publish a new snapshot at `generation + 1`. Returns `Conflict` if
    /// the generation moved since the caller's snapshot was taken --
    /// callers never pass the snapshot they validated against here, the
    /// check is against whatever is live right now, which is exactly the
    /// optimistic-concurrency contract in §4.1 item 3.
    pub fn apply(&self, base: &Snapshot, delta: &Delta) -> CrsResult<ApplyMetrics> {
        let current = self.root.load_full();
        if current.generation() != base.generation() {
            return Err(CrsError::Conflict {
                expected: base.generation(),
                actual: current.generation(),
            });
        }
        delta.validate(&current)?;

        let (next, modified) = Self::fold(&current, delta);
        let new_generation = current.generation() + 1;
        let next_snapshot = Arc::new(Snapshot::new(
            new_generation,
            next.0,
            next.1,
            next.2,
            next.3,
        ));

        let prev = self.root.compare_and_swap(&current, next_snapshot);
        if !Arc::ptr_eq(&prev, &current) {
            // Someone else published between our read and our swap.
            return Err(CrsError::Conflict {
                expected: base.generation(),
                actual: prev.generation(),
            });
        }

        Ok(ApplyMetrics {
            new_generation,
            entries_modified: modified,
        })
    }

    /// Idempotent invalidation hook for downstream, derived caches (§4.1).
    /// The store itself holds no such caches; this only flips a flag that
    /// external collaborators can poll, and calling it twice in a row is
    /// a no-op.
    pub fn invalidate_graph_cache(&self) {
        self.graph_cache_valid.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn graph_cache_valid(&self) -> bool {
        self.graph_cache_valid.load(Ordering::Acquire)
    }

    pub fn mark_graph_cache_valid(&self) {
        self.graph_cache_valid.store(true, Ordering::Release);
    }

    #[allow(clippy::type_complexity)]
    fn fold(
        snapshot: &Snapshot,
        delta: &Delta,
    ) -> (
        (
            ProofIndex,
            ConstraintIndex,
            DependencyIndex,
            HistoryIndex,
        ),
        usize,
    ) {
        let mut proof = snapshot.proof().clone();
        let mut constraint = snapshot.constraint().clone();
        let mut dependency = snapshot.dependency().clone();
        let mut history = snapshot.history().clone();
        let mut modified = 0usize;

        for leaf in delta.flatten_leaves() {
            match leaf {
                Delta::Proof(d) => {
                    let updates = d.materialize();
                    modified += updates.len();
                    proof = proof.with_updates(&updates);
                }
                Delta::Constraint(d) => {
                    modified += d.add.len() + d.update.len();
                    constraint = constraint.with_added(&d.add);
                    constraint = constraint.with_updated(&d.update);
                }
                Delta::Dependency(d) => {
                    modified += d.add_edges.len() + d.remove_edges.len();
                    dependency = dependency.with_added(&d.add_edges);
                    dependency = dependency.with_removed(&d.remove_edges);
                }
                Delta::History(d) => {
                    modified += d.entries.len();
                    history = history.with_appended(&d.entries);
                }
                Delta::Composite(_) => unreachable!("flatten_leaves never yields Composite"),
            }
        }

        ((proof, constraint, dependency, history), modified)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::new()
    }
}
