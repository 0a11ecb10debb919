//! The delta taxonomy: typed, validated state changes applied atomically
//! to the CRS (§3, §4.1).

use crate::constraint::Constraint;
use crate::dependency::DependencyEdge;
use crate::error::{CrsError, CrsResult};
use crate::history::HistoryEntry;
use crate::proof::{ProofNumber, ProofStatus};
use crate::signal::Signal;
use crate::snapshot::Snapshot;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Composite nesting depth bound (§3: "depth bound (>=100)").
pub const MAX_COMPOSITE_DEPTH: usize = 100;

/// One node's new proof/disproof numbers and status, without the source
/// tag -- the enclosing [`ProofDelta`] carries one source for all of its
/// updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProofUpdate {
    pub proof: u64,
    pub disproof: u64,
    pub status: ProofStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofDelta {
    pub updates: HashMap<NodeId, ProofUpdate>,
    pub source: Signal,
}

impl ProofDelta {
    pub fn validate(&self, snapshot: &Snapshot) -> CrsResult<()> {
        for (id, update) in &self.updates {
            if update.status.is_hard_only() && !self.source.is_hard() {
                return Err(CrsError::ValidationFailed {
                    reason: format!(
                        "node {id} status {:?} requires Hard source, got Soft",
                        update.status
                    ),
                });
            }
            if let Some(existing) = snapshot.proof().get(id) {
                let candidate = ProofNumber::new(update.proof, update.disproof, update.status, self.source);
                if existing.is_downgrade(&candidate) {
                    return Err(CrsError::ValidationFailed {
                        reason: format!(
                            "node {id} would downgrade from hard status {:?} via soft delta",
                            existing.status
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn materialize(&self) -> HashMap<NodeId, ProofNumber> {
        self.updates
            .iter()
            .map(|(id, u)| {
                (
                    id.clone(),
                    ProofNumber::new(u.proof, u.disproof, u.status, self.source),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintDelta {
    pub add: Vec<Constraint>,
    pub update: Vec<Constraint>,
    pub source: Signal,
}

impl ConstraintDelta {
    pub fn validate(&self, snapshot: &Snapshot) -> CrsResult<()> {
        let mut seen = std::collections::HashSet::new();
        for c in &self.add {
            if snapshot.constraint().contains(&c.id) || !seen.insert(c.id.clone()) {
                return Err(CrsError::ValidationFailed {
                    reason: format!("constraint id {} is not unique", c.id),
                });
            }
            for node in &c.nodes {
                if !snapshot.node_exists(node) {
                    return Err(CrsError::ValidationFailed {
                        reason: format!("constraint {} references unknown node {node}", c.id),
                    });
                }
            }
        }
        for c in &self.update {
            for node in &c.nodes {
                if !snapshot.node_exists(node) {
                    return Err(CrsError::ValidationFailed {
                        reason: format!("constraint {} references unknown node {node}", c.id),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyDelta {
    pub add_edges: Vec<DependencyEdge>,
    pub remove_edges: Vec<DependencyEdge>,
    pub source: Signal,
}

impl DependencyDelta {
    pub fn validate(&self, snapshot: &Snapshot) -> CrsResult<()> {
        for edge in &self.add_edges {
            if !snapshot.node_exists(&edge.from) || !snapshot.node_exists(&edge.to) {
                return Err(CrsError::ValidationFailed {
                    reason: format!(
                        "dependency edge {} -> {} references unknown node",
                        edge.from, edge.to
                    ),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryDelta {
    pub entries: Vec<HistoryEntry>,
    pub source: Signal,
}

impl HistoryDelta {
    pub fn validate(&self, snapshot: &Snapshot) -> CrsResult<()> {
        let mut last_ts = snapshot.history().last_timestamp_ms();
        let mut seen_ids = std::collections::HashSet::new();
        for entry in &self.entries {
            if let Some(last) = last_ts
                && entry.timestamp_ms <= last
            {
                return Err(CrsError::ValidationFailed {
                    reason: format!(
                        "history entry {} timestamp {} must be after {last}",
                        entry.id, entry.timestamp_ms
                    ),
                });
            }
            if snapshot.history().contains_id(&entry.id) || !seen_ids.insert(entry.id.clone()) {
                return Err(CrsError::ValidationFailed {
                    reason: format!("history entry id {} is not unique", entry.id),
                });
            }
            last_ts = Some(entry.timestamp_ms);
        }
        Ok(())
    }
}

/// A sealed sum type of state changes (§3). `Composite` flattens
/// recursively with a depth bound to guard against malformed nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Delta {
    Proof(ProofDelta),
    Constraint(ConstraintDelta),
    Dependency(DependencyDelta),
    History(HistoryDelta),
    Composite(Vec<Delta>),
}

/// Outcome of a successful `Apply`, per §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyMetrics {
    pub new_generation: u64,
    pub entries_modified: usize,
}

impl Delta {
    /// Combine zero, one, or many deltas the way `Runner::Collect` does
    /// (§4.2): 0 -> `None`, 1 -> pass-through, n -> `Composite`.
    #[must_use]
    pub fn combine(mut deltas: Vec<Self>) -> Option<Self> {
        match deltas.len() {
            0 => None,
            1 => Some(deltas.remove(0)),
            _ => Some(Self::Composite(deltas)),
        }
    }

    /// Recursively validate every leaf against the same snapshot (§4.1
    /// `Composite.Validate`), honoring the depth bound.
    pub fn validate(&self, snapshot: &Snapshot) -> CrsResult<()> {
        self.validate_at_depth(snapshot, 0)
    }

    fn validate_at_depth(&self, snapshot: &Snapshot, depth: usize) -> CrsResult<()> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(CrsError::DepthExceeded {
                limit: MAX_COMPOSITE_DEPTH,
            });
        }
        match self {
            Self::Proof(d) => d.validate(snapshot),
            Self::Constraint(d) => d.validate(snapshot),
            Self::Dependency(d) => d.validate(snapshot),
            Self::History(d) => d.validate(snapshot),
            Self::Composite(children) => {
                for child in children {
                    child.validate_at_depth(snapshot, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Flatten into leaf deltas in encounter order, stopping at the depth
    /// bound. Beyond the bound, remaining children are silently dropped
    /// rather than overflowing the stack (§8 property 5).
    #[must_use]
    pub fn flatten_leaves(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        self.flatten_into(&mut out, 0);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Self>, depth: usize) {
        if depth > MAX_COMPOSITE_DEPTH {
            return;
        }
        match self {
            Self::Composite(children) => {
                for child in children {
                    child.flatten_into(out, depth + 1);
                }
            }
            leaf => out.push(leaf),
        }
    }
}
