use crate::signal::Signal;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One append-only entry in the reasoning history, per §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub node: NodeId,
    pub action: String,
    pub result: String,
    pub source: Signal,
    pub timestamp_ms: i64,
    pub metadata: serde_json::Value,
}

/// Immutable, copy-on-write append log.
///
/// `Recent(n)` and `Trace(node)` are the only read operations §3 names;
/// both are plain slice scans, which is adequate at the per-session scale
/// this store targets (it is explicitly not meant to persist across
/// process restarts, so unbounded growth across a process lifetime is not
/// a concern this type needs to solve).
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    entries: Arc<Vec<HistoryEntry>>,
}

impl HistoryIndex {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.entries.last().map(|e| e.timestamp_ms)
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Last `n` entries in insertion order.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().collect()
    }

    /// All entries for a given node, in insertion order.
    #[must_use]
    pub fn trace(&self, node: &NodeId) -> Vec<&HistoryEntry> {
        self.entries.iter().filter(|e| &e.node == node).collect()
    }

    #[must_use]
    pub fn with_appended(&self, new_entries: &[HistoryEntry]) -> Self {
        let mut next = (*self.entries).clone();
        next.extend(new_entries.iter().cloned());
        Self {
            entries: Arc::new(next),
        }
    }
}
