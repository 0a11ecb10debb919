use crs_store::plan::PlanNode;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Optional table mapping a board hash (Zobrist-style, supplied by the
/// `Expander`) to an existing node, so identical subtrees share
/// statistics instead of being explored independently (§3).
#[derive(Default)]
pub struct TranspositionTable {
    entries: Mutex<FxHashMap<u64, Arc<PlanNode>>>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, hash: u64) -> Option<Arc<PlanNode>> {
        self.entries.lock().get(&hash).cloned()
    }

    /// Records `node` under `hash` if no entry exists yet; returns the
    /// canonical node for that hash (either the one just inserted or an
    /// existing one another worker beat us to).
    pub fn insert_or_get(&self, hash: u64, node: Arc<PlanNode>) -> Arc<PlanNode> {
        self.entries
            .lock()
            .entry(hash)
            .or_insert(node)
            .clone()
    }
}
