//! Facade tying every other crate together into the one process a host
//! binary actually embeds: a `Crs` store, a `Bridge`/`Coordinator` pair
//! dispatching registered activities, a `TraceRecorder`, the parallel
//! MCTS engine, and the config/metrics ambient stack.

mod error;
mod mcts;

pub use error::{EngineError, EngineResult};

use crs_store::plan::PlanTree;
use crs_store::store::Crs;
use reasoning_activities::Activity;
use reasoning_bridge::{
    Bridge, Coordinator, CoordinatorResult, Event, EventContext, RetryPolicy, TraceLog,
    TraceRecorder,
};
use reasoning_config::MctsFullConfig;
use reasoning_mcts::{EngineStats, Expander, ParallelMctsEngine};
use reasoning_metrics::Metrics;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

/// One running instance: owned store, dispatch machinery, and the
/// ambient config/metrics every embedder needs regardless of which
/// activities they register.
pub struct ReasoningEngine {
    crs: Arc<Crs>,
    bridge: Arc<Bridge>,
    coordinator: Coordinator,
    recorder: Arc<TraceRecorder>,
    config: MctsFullConfig,
    metrics: Arc<dyn Metrics>,
}

impl ReasoningEngine {
    /// Validates `config` (§6 rejections) before wiring anything up, so
    /// a malformed config fails at construction, not mid-run.
    pub fn new(config: MctsFullConfig, metrics: Arc<dyn Metrics>) -> EngineResult<Self> {
        config.validate()?;

        let crs = Arc::new(Crs::new());
        let recorder = Arc::new(TraceRecorder::new());
        let bridge = Arc::new(Bridge::new(
            Arc::clone(&crs),
            Arc::clone(&recorder),
            RetryPolicy::default(),
        ));
        let coordinator = Coordinator::new(Arc::clone(&bridge), Arc::clone(&crs))
            .with_max_concurrent_activities(config.parallel.max_concurrent_activities);

        Ok(Self {
            crs,
            bridge,
            coordinator,
            recorder,
            config,
            metrics,
        })
    }

    #[must_use]
    pub fn crs(&self) -> &Arc<Crs> {
        &self.crs
    }

    #[must_use]
    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    #[must_use]
    pub fn config(&self) -> &MctsFullConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<dyn Metrics> {
        &self.metrics
    }

    #[must_use]
    pub fn trace_log(&self) -> TraceLog {
        self.recorder.to_log()
    }

    /// Registers an activity under `name`, with the activities (already
    /// completed and successful) it depends on.
    pub fn register(&mut self, activity: Arc<dyn Activity>, depends_on: Vec<&'static str>) {
        reasoning_config::register_activity_label(activity.name());
        self.coordinator.register(activity, depends_on);
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        self.coordinator.set_enabled(name, enabled);
    }

    /// Event-mode dispatch (§4.5): the primary entry point a host
    /// process calls as agent-originated events occur.
    pub async fn handle_event(
        &self,
        cancel: CancellationToken,
        event: Event,
        ctx: &EventContext,
        data: serde_json::Value,
    ) -> CoordinatorResult<()> {
        let generation_before = self.crs.generation();
        let result = self.coordinator.handle_event(cancel, event, ctx, data).await;
        self.metrics.set_generation(self.crs.generation());
        if self.crs.generation() > generation_before {
            tracing::debug!(event = ?event, "event produced at least one applied delta");
        }
        result
    }

    /// Polling-mode dispatch: one scheduling pass over every registered,
    /// enabled activity (§4.5 `RunOnce`).
    pub async fn run_once(&self, cancel: CancellationToken) -> CoordinatorResult<()> {
        let result = self.coordinator.run_once(cancel).await;
        self.metrics.set_generation(self.crs.generation());
        result
    }

    /// Runs the parallel MCTS engine to completion over a freshly
    /// created tree for `task`, using the budget and worker settings
    /// from this engine's config (§4.7).
    pub async fn run_mcts<E: Expander + 'static>(
        &self,
        task: impl Into<String>,
        expander: E,
    ) -> (Arc<PlanTree>, EngineStats) {
        let budget = mcts::tree_budget(&self.config);
        let tree = Arc::new(PlanTree::new(task, now_ms(), budget));
        let engine = ParallelMctsEngine::new(expander, mcts::engine_config(&self.config));
        let stats = engine.run(Arc::clone(&tree)).await;
        (tree, stats)
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
