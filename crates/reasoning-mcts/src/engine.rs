use crate::expander::Expander;
use crate::pruning::{prune, PruningPolicy};
use crate::selection::{select_child, RaveTable};
use crate::transposition::TranspositionTable;
use crs_store::plan::{PlanNode, PlanNodeState, PlanTree};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::task::JoinSet;
use tracing::{debug, instrument};

/// Engine-level knobs, mirroring `reasoning_config::{AlgorithmConfig,
/// ParallelConfig, PruningConfig}` (the engine itself does not depend on
/// `reasoning-config`; the caller maps one to the other so this crate
/// stays usable outside the reasoning engine's config stack).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub num_workers: usize,
    pub max_iterations: u64,
    pub exploration_constant: f64,
    pub virtual_loss: f64,
    pub use_rave: bool,
    pub rave_equivalence: f64,
    pub use_transposition: bool,
    pub pruning: PruningPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            max_iterations: 1_000,
            exploration_constant: std::f64::consts::SQRT_2,
            virtual_loss: 1.0,
            use_rave: false,
            rave_equivalence: 50.0,
            use_transposition: false,
            pruning: PruningPolicy::default(),
        }
    }
}

/// Summary returned once every spawned worker has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    pub iterations_run: u64,
    pub nodes_created: i64,
}

/// Root- and leaf-parallel MCTS engine (§3, §9). Workers share one
/// `PlanTree` through `Arc`, descending it with lock-free UCB1
/// selection, applying virtual loss on the way down and correcting it
/// on the way back up, so no worker's in-flight simulation can bias
/// another's selection toward the same frontier.
pub struct ParallelMctsEngine<E: Expander> {
    expander: Arc<E>,
    config: EngineConfig,
    rave: Option<Arc<RaveTable>>,
    transposition: Option<Arc<TranspositionTable>>,
}

impl<E: Expander + 'static> ParallelMctsEngine<E> {
    #[must_use]
    pub fn new(expander: E, config: EngineConfig) -> Self {
        let rave = config.use_rave.then(|| Arc::new(RaveTable::new()));
        let transposition = config
            .use_transposition
            .then(|| Arc::new(TranspositionTable::new()));
        Self {
            expander: Arc::new(expander),
            config,
            rave,
            transposition,
        }
    }

    /// Runs the search to completion: spawns `num_workers` tasks, each
    /// looping select -> expand -> rollout -> backprop until the shared
    /// iteration counter or the tree's node/time budget is exhausted,
    /// then awaits every one of them before returning. Awaiting the full
    /// `JoinSet` here, rather than racing a cancellation signal, is what
    /// guarantees no residual virtual loss survives the call: every
    /// worker's last backprop always completes before `run` returns.
    #[instrument(skip_all, fields(task = %tree.task, workers = self.config.num_workers))]
    pub async fn run(&self, tree: Arc<PlanTree>) -> EngineStats {
        let deadline = Instant::now() + tree.budget.time_limit;
        let iterations_done = Arc::new(AtomicU64::new(0));
        let iteration_counter = Arc::new(AtomicU64::new(0));

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.num_workers {
            let worker = EngineWorker {
                tree: Arc::clone(&tree),
                expander: Arc::clone(&self.expander),
                config: self.config.clone(),
                rave: self.rave.clone(),
                transposition: self.transposition.clone(),
                deadline,
            };
            let iterations_done = Arc::clone(&iterations_done);
            let iteration_counter = Arc::clone(&iteration_counter);
            workers.spawn(async move {
                worker.run_loop(worker_id, iterations_done, iteration_counter).await;
            });
        }

        while workers.join_next().await.is_some() {}

        EngineStats {
            iterations_run: iterations_done.load(Ordering::Acquire),
            nodes_created: tree.total_nodes(),
        }
    }
}

struct EngineWorker<E: Expander> {
    tree: Arc<PlanTree>,
    expander: Arc<E>,
    config: EngineConfig,
    rave: Option<Arc<RaveTable>>,
    transposition: Option<Arc<TranspositionTable>>,
    deadline: Instant,
}

impl<E: Expander> EngineWorker<E> {
    async fn run_loop(
        &self,
        worker_id: usize,
        iterations_done: Arc<AtomicU64>,
        iteration_counter: Arc<AtomicU64>,
    ) {
        loop {
            if Instant::now() >= self.deadline {
                debug!(worker_id, "time budget exhausted");
                return;
            }
            let iteration = iteration_counter.fetch_add(1, Ordering::AcqRel);
            if iteration >= self.config.max_iterations {
                return;
            }

            self.iterate();
            iterations_done.fetch_add(1, Ordering::AcqRel);

            if self.config.pruning.prune_interval > 0
                && (iteration + 1) % self.config.pruning.prune_interval == 0
            {
                prune(self.tree.root(), &self.config.pruning, now_ms());
            }

            tokio::task::yield_now().await;
        }
    }

    /// One select -> expand -> rollout -> backprop cycle. Synchronous:
    /// the expensive parts (LLM calls inside `expand`/`rollout`) are the
    /// `Expander`'s business, not the engine's; this only touches
    /// in-memory tree state.
    fn iterate(&self) {
        let root = self.tree.root();
        let mut path = vec![Arc::clone(root)];
        apply_virtual_loss(root, self.config.virtual_loss);
        let mut node = Arc::clone(root);

        while node.child_count() > 0 && node.depth < self.tree.budget.max_depth {
            let Some(child) = select_child(
                &node,
                self.config.exploration_constant,
                self.rave.as_deref(),
                self.config.rave_equivalence,
            ) else {
                break;
            };
            apply_virtual_loss(&child, self.config.virtual_loss);
            node = child;
            path.push(Arc::clone(&node));
        }

        if node.depth < self.tree.budget.max_depth && node.state() != PlanNodeState::Abandoned {
            node = self.expand(node);
            // A transposition hit may redirect `node` to a canonical node
            // elsewhere in the tree; the virtual loss already applied to
            // the originally selected leaf still belongs to that leaf, so
            // only swap it into `path` when one was actually selected
            // (root-only paths never got the leaf's virtual loss).
            if let Some(last) = path.last_mut() {
                if !Arc::ptr_eq(last, &node) && path.len() > 1 {
                    *last = Arc::clone(&node);
                }
            }
        }

        let touched = now_ms();
        for n in &path {
            n.touch(touched);
        }

        let score = self.expander.rollout(&node);

        for n in path.iter().rev() {
            n.total_score
                .fetch_add(self.config.virtual_loss + score, std::sync::atomic::Ordering::AcqRel);
            if let Some(rave) = &self.rave {
                rave.update(&n.action, score);
            }
        }

        self.update_best_path();
    }

    /// Expands `node` in place if the budget allows, sharing statistics
    /// through the transposition table when the expander supplies a
    /// state hash. Returns the node the rollout should run from: the
    /// freshly expanded node (new children attached, but the rollout
    /// still scores the expansion point itself per §3), or the original
    /// node if expansion was skipped.
    fn expand(&self, node: Arc<PlanNode>) -> Arc<PlanNode> {
        if let Some(hash) = self.expander.state_hash(&node) {
            if let Some(table) = &self.transposition {
                if let Some(canonical) = table.lookup(hash) {
                    return canonical;
                }
            }
        }

        let specs = self.expander.expand(&node);
        if specs.is_empty() {
            node.set_state(PlanNodeState::Completed);
            return node;
        }
        if !self.tree.try_reserve_nodes(specs.len() as i64) {
            return node;
        }

        node.set_state(PlanNodeState::Exploring);
        for spec in specs {
            let id = self.tree.alloc_id();
            let child = PlanNode::new_child(id, spec.description, spec.action, spec.prior, &node);
            node.add_child(child);
        }

        if let (Some(hash), Some(table)) = (self.expander.state_hash(&node), &self.transposition) {
            table.insert_or_get(hash, Arc::clone(&node));
        }

        node
    }

    fn update_best_path(&self) {
        let mut path = vec![self.tree.root().id];
        let mut current = Arc::clone(self.tree.root());
        while let Some(best) = current.children().into_iter().max_by_key(|c| c.visits()) {
            path.push(best.id);
            current = best;
        }
        self.tree.set_best_path(path);
    }
}

/// Descent-time bias: make `node` look worse to concurrent selectors
/// until this worker's simulation backpropagates through it. Paired
/// one-for-one with the `virtual_loss +` term added back in `iterate`'s
/// backprop loop, so the net effect after a full cycle is exactly one
/// real visit and the real rollout score.
fn apply_virtual_loss(node: &Arc<PlanNode>, virtual_loss: f64) {
    node.visits.fetch_add(1, std::sync::atomic::Ordering::AcqRel);
    node.total_score
        .fetch_add(-virtual_loss, std::sync::atomic::Ordering::AcqRel);
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as i64
}
