use async_trait::async_trait;
use crs_store::plan::PlanNode;
use crs_store::snapshot::Snapshot;
use reasoning_activities::{Activity, ActivityOutcome, ExecutionStatus, Priority};
use reasoning_algorithms::Payload;
use reasoning_bridge::{Event, EventContext};
use reasoning_config::MctsFullConfig;
use reasoning_engine::ReasoningEngine;
use reasoning_metrics::NoopMetrics;
use reasoning_mcts::{ChildSpec, Expander};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct StubActivity {
    name: &'static str,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Activity for StubActivity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(200)
    }

    fn algorithms(&self) -> Vec<Arc<dyn reasoning_algorithms::Algorithm>> {
        Vec::new()
    }

    fn should_run(&self, _snapshot: &Snapshot) -> (bool, Priority) {
        (true, Priority::Normal)
    }

    async fn execute(
        &self,
        _cancel: CancellationToken,
        _snapshot: &Snapshot,
        _input: &Payload,
    ) -> Result<ActivityOutcome, reasoning_activities::ActivityError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(ActivityOutcome {
            status: ExecutionStatus::Success,
            delta: None,
            results: Vec::new(),
        })
    }
}

fn engine() -> ReasoningEngine {
    ReasoningEngine::new(MctsFullConfig::default(), Arc::new(NoopMetrics)).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn rejects_invalid_config_at_construction() {
    let mut config = MctsFullConfig::default();
    config.budget.max_nodes = 0;
    assert!(ReasoningEngine::new(config, Arc::new(NoopMetrics)).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_start_dispatches_only_registered_activities() {
    let mut engine = engine();
    let memory_runs = Arc::new(AtomicUsize::new(0));
    let streaming_runs = Arc::new(AtomicUsize::new(0));
    engine.register(
        Arc::new(StubActivity {
            name: "memory",
            runs: Arc::clone(&memory_runs),
        }),
        Vec::new(),
    );
    engine.register(
        Arc::new(StubActivity {
            name: "streaming",
            runs: Arc::clone(&streaming_runs),
        }),
        Vec::new(),
    );

    engine
        .handle_event(
            CancellationToken::new(),
            Event::SessionStart,
            &EventContext::default(),
            serde_json::Value::Null,
        )
        .await
        .unwrap();

    assert_eq!(memory_runs.load(Ordering::SeqCst), 1);
    assert_eq!(streaming_runs.load(Ordering::SeqCst), 1);
}

struct TwoChildExpander;

impl Expander for TwoChildExpander {
    fn expand(&self, node: &Arc<PlanNode>) -> Vec<ChildSpec> {
        if node.depth >= 2 {
            return Vec::new();
        }
        vec![ChildSpec::new("a", "a", 0.5), ChildSpec::new("b", "b", 0.5)]
    }

    fn rollout(&self, _node: &Arc<PlanNode>) -> f64 {
        0.5
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn run_mcts_respects_configured_node_budget() {
    let mut config = MctsFullConfig::default();
    config.budget.max_nodes = 10;
    config.budget.time_limit = Duration::from_secs(2);
    config.budget.max_expansions = 50;
    let engine = ReasoningEngine::new(config, Arc::new(NoopMetrics)).unwrap();

    let (tree, stats) = engine.run_mcts("demo-task", TwoChildExpander).await;

    assert!(stats.iterations_run >= 1);
    assert!(tree.total_nodes() <= 10);
    assert!(tree.root().visits() >= 1);
}
