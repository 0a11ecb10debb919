use crate::signal::Signal;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Proof-number-search style status for a reasoning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStatus {
    Unknown,
    Expanded,
    Proven,
    Disproven,
}

impl ProofStatus {
    /// Hard status values may only be reached through a `Hard`-sourced delta.
    #[must_use]
    pub const fn is_hard_only(self) -> bool {
        matches!(self, Self::Proven | Self::Disproven)
    }

    /// Relative rank used to reject downgrades from a higher source class.
    const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Expanded => 1,
            Self::Proven | Self::Disproven => 2,
        }
    }
}

/// Proof/disproof number pair and status for one node, per §3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProofNumber {
    pub proof: u64,
    pub disproof: u64,
    pub status: ProofStatus,
    pub source: Signal,
}

impl ProofNumber {
    #[must_use]
    pub const fn new(proof: u64, disproof: u64, status: ProofStatus, source: Signal) -> Self {
        Self {
            proof,
            disproof,
            status,
            source,
        }
    }

    /// True if moving from `self` to `next` would be a downgrade from a
    /// higher source class to a lower one (§4.1 `Proof.Validate`).
    #[must_use]
    pub fn is_downgrade(&self, next: &Self) -> bool {
        self.source.is_hard() && !next.source.is_hard() && next.status.rank() < self.status.rank()
    }
}

/// Immutable, copy-on-write index of node -> proof number.
#[derive(Debug, Clone, Default)]
pub struct ProofIndex {
    entries: Arc<HashMap<NodeId, ProofNumber>>,
}

impl ProofIndex {
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&ProofNumber> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &ProofNumber)> {
        self.entries.iter()
    }

    /// Copy-on-write apply: clones the current map, applies updates, and
    /// returns a fresh index. The caller is expected to already have
    /// validated the updates via [`ProofDelta::validate`](crate::delta::ProofDelta::validate).
    #[must_use]
    pub fn with_updates(&self, updates: &HashMap<NodeId, ProofNumber>) -> Self {
        let mut next = (*self.entries).clone();
        for (id, value) in updates {
            next.insert(id.clone(), *value);
        }
        Self {
            entries: Arc::new(next),
        }
    }
}
