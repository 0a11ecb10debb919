use crate::signal::Signal;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    MutualExclusion,
    Implication,
    Ordering,
    Resource,
}

/// A single constraint over an ordered list of nodes, per §3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConstraintType,
    pub nodes: Vec<NodeId>,
    pub source: Signal,
}

/// Immutable, copy-on-write set of constraints keyed by unique id.
///
/// `BTreeMap` keeps iteration ordered by id, which `TraceRecorder`
/// extraction relies on for deterministic `ConstraintsAdded` ordering (§4.6).
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    entries: Arc<BTreeMap<String, Constraint>>,
}

impl ConstraintIndex {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Constraint> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.values()
    }

    #[must_use]
    pub fn with_added(&self, added: &[Constraint]) -> Self {
        let mut next = (*self.entries).clone();
        for c in added {
            next.insert(c.id.clone(), c.clone());
        }
        Self {
            entries: Arc::new(next),
        }
    }

    #[must_use]
    pub fn with_updated(&self, updated: &[Constraint]) -> Self {
        self.with_added(updated)
    }

    /// Nodes referenced by `node_exists` must already be present in a
    /// companion `ProofIndex` for `Validate` to accept the constraint.
    #[must_use]
    pub fn referenced_nodes<'a>(constraints: &'a [Constraint]) -> Vec<&'a NodeId> {
        constraints.iter().flat_map(|c| c.nodes.iter()).collect()
    }
}
