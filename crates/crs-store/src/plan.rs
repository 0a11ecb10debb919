//! `PlanTree` / `PlanNode` data model for the MCTS engine (§3, §9).
//!
//! Cyclic parent/child links are expressed as owned child lists plus a
//! weak parent pointer, never as a cycle of strong references, per §9
//! ("Cyclic data"). Mutable counters that many MCTS workers touch
//! concurrently are atomics; `best_path` is the one piece of tree-wide
//! state that needs a short critical section, so it is mutex-protected.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Lock-free f64 accumulator backed by bit-cast `AtomicU64`.
///
/// The standard library has no `AtomicF64`; this is the standard
/// compare-exchange-retry idiom for building one.
#[derive(Debug)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.load(order))
    }

    pub fn store(&self, value: f64, order: Ordering) {
        self.0.store(value.to_bits(), order);
    }

    /// Atomically add `delta` to the current value, retrying on contention.
    pub fn fetch_add(&self, delta: f64, order: Ordering) -> f64 {
        let mut current = self.0.load(order);
        loop {
            let new = f64::from_bits(current) + delta;
            match self
                .0
                .compare_exchange_weak(current, new.to_bits(), order, order)
            {
                Ok(prev) => return f64::from_bits(prev),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanNodeState {
    Pending,
    Exploring,
    Completed,
    Abandoned,
}

/// A candidate tool invocation in the MCTS search tree.
pub struct PlanNode {
    pub id: u64,
    pub description: String,
    pub depth: u32,
    pub action: String,
    pub prior: f64,
    pub state: RwLock<PlanNodeState>,
    pub visits: AtomicI64,
    pub total_score: AtomicF64,
    last_touched_ms: AtomicI64,
    parent: Option<Weak<PlanNode>>,
    children: RwLock<Vec<Arc<PlanNode>>>,
}

impl PlanNode {
    #[must_use]
    pub fn new_root(id: u64, description: impl Into<String>, action: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            description: description.into(),
            depth: 0,
            action: action.into(),
            prior: 1.0,
            state: RwLock::new(PlanNodeState::Pending),
            visits: AtomicI64::new(0),
            total_score: AtomicF64::new(0.0),
            last_touched_ms: AtomicI64::new(0),
            parent: None,
            children: RwLock::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn new_child(
        id: u64,
        description: impl Into<String>,
        action: impl Into<String>,
        prior: f64,
        parent: &Arc<PlanNode>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            description: description.into(),
            depth: parent.depth + 1,
            action: action.into(),
            prior,
            state: RwLock::new(PlanNodeState::Pending),
            visits: AtomicI64::new(0),
            total_score: AtomicF64::new(0.0),
            last_touched_ms: AtomicI64::new(0),
            parent: Some(Arc::downgrade(parent)),
            children: RwLock::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn parent(&self) -> Option<Arc<PlanNode>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn children(&self) -> Vec<Arc<PlanNode>> {
        self.children.read().clone()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    pub fn add_child(&self, child: Arc<PlanNode>) {
        self.children.write().push(child);
    }

    /// Replace the child list wholesale; used by pruning.
    pub fn retain_children(&self, keep: impl Fn(&Arc<PlanNode>) -> bool) {
        self.children.write().retain(|c| keep(c));
    }

    #[must_use]
    pub fn visits(&self) -> i64 {
        self.visits.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn average_score(&self) -> f64 {
        let visits = self.visits();
        if visits <= 0 {
            0.0
        } else {
            self.total_score.load(Ordering::Acquire) / visits as f64
        }
    }

    #[must_use]
    pub fn state(&self) -> PlanNodeState {
        *self.state.read()
    }

    pub fn set_state(&self, state: PlanNodeState) {
        *self.state.write() = state;
    }

    #[must_use]
    pub fn last_touched_ms(&self) -> i64 {
        self.last_touched_ms.load(Ordering::Acquire)
    }

    pub fn touch(&self, now_ms: i64) {
        self.last_touched_ms.store(now_ms, Ordering::Release);
    }
}

/// Composite resource limit for one MCTS run (§3).
#[derive(Debug, Clone, Copy)]
pub struct TreeBudget {
    pub max_nodes: i64,
    pub max_depth: u32,
    pub max_expansions: i64,
    pub time_limit: Duration,
    pub llm_token_limit: u64,
    pub llm_call_limit: u64,
    pub cost_limit_usd: f64,
}

impl Default for TreeBudget {
    fn default() -> Self {
        Self {
            max_nodes: 10_000,
            max_depth: 64,
            max_expansions: 5_000,
            time_limit: Duration::from_secs(30),
            llm_token_limit: u64::MAX,
            llm_call_limit: u64::MAX,
            cost_limit_usd: f64::MAX,
        }
    }
}

/// One MCTS run's tree: exclusively-owned root, tree-wide counters, and
/// the current best-path cache.
pub struct PlanTree {
    pub task: String,
    pub created_at_ms: i64,
    root: Arc<PlanNode>,
    total_nodes: AtomicI64,
    next_id: AtomicU64,
    best_path: Mutex<Vec<u64>>,
    pub budget: TreeBudget,
}

impl PlanTree {
    #[must_use]
    pub fn new(task: impl Into<String>, created_at_ms: i64, budget: TreeBudget) -> Self {
        let root = PlanNode::new_root(0, "root", "root");
        Self {
            task: task.into(),
            created_at_ms,
            root,
            total_nodes: AtomicI64::new(1),
            next_id: AtomicU64::new(1),
            best_path: Mutex::new(Vec::new()),
            budget,
        }
    }

    /// Allocates the next node id, unique for the lifetime of this tree.
    pub fn alloc_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    #[must_use]
    pub fn root(&self) -> &Arc<PlanNode> {
        &self.root
    }

    #[must_use]
    pub fn total_nodes(&self) -> i64 {
        self.total_nodes.load(Ordering::Acquire)
    }

    /// Atomically reserve room for `count` new nodes, returning `false`
    /// (and reserving nothing) if that would exceed `max_nodes`.
    pub fn try_reserve_nodes(&self, count: i64) -> bool {
        let mut current = self.total_nodes.load(Ordering::Acquire);
        loop {
            if current + count > self.budget.max_nodes {
                return false;
            }
            match self.total_nodes.compare_exchange_weak(
                current,
                current + count,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    #[must_use]
    pub fn best_path(&self) -> Vec<u64> {
        self.best_path.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_best_path(&self, path: Vec<u64>) {
        *self.best_path.lock().unwrap_or_else(|e| e.into_inner()) = path;
    }
}
