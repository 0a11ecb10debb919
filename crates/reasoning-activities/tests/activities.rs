use async_trait::async_trait;
use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::snapshot::Snapshot;
use crs_store::types::NodeId;
use reasoning_activities::{
    Activity, ActivityInput, ExecutionStatus, MemoryActivity, MemoryInput, MemoryOperation,
    search_activity,
};
use reasoning_algorithms::{Algorithm, AlgorithmOutcome, AlgorithmResult, Payload};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct NoopAlgorithm;

#[async_trait]
impl Algorithm for NoopAlgorithm {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn input_type(&self) -> &'static str {
        "ActivityInput"
    }

    fn output_type(&self) -> &'static str {
        "()"
    }

    async fn process(
        &self,
        _cancel: CancellationToken,
        _snapshot: &Snapshot,
        _input: &Payload,
    ) -> AlgorithmResult<AlgorithmOutcome> {
        Ok(AlgorithmOutcome::empty())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn search_does_not_run_against_an_empty_snapshot() {
    let activity = search_activity(vec![Arc::new(NoopAlgorithm)], Duration::from_millis(100));
    let (should, _priority) = activity.should_run(&Snapshot::default());
    assert!(!should);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_execute_runs_registered_algorithms() {
    let activity = search_activity(vec![Arc::new(NoopAlgorithm)], Duration::from_millis(100));
    let input = ActivityInput::new(serde_json::Value::Null, Signal::Hard);
    let outcome = activity
        .execute(CancellationToken::new(), &Snapshot::default(), &input)
        .await
        .unwrap();
    assert_eq!(outcome.status, ExecutionStatus::Success);
    assert_eq!(outcome.results.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_never_wants_to_run_on_its_own() {
    let activity = MemoryActivity::default();
    let (should, _) = activity.should_run(&Snapshot::default());
    assert!(!should);
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_record_produces_a_history_delta() {
    let activity = MemoryActivity::default();
    let input = MemoryInput {
        operation: MemoryOperation::Record {
            action: "note".to_string(),
            result: "ok".to_string(),
            metadata: serde_json::Value::Null,
        },
    };
    let outcome = activity
        .execute(CancellationToken::new(), &Snapshot::default(), &input)
        .await
        .unwrap();
    assert!(matches!(outcome.delta, Some(Delta::History(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_query_returns_matching_trace_without_a_delta() {
    let crs = crs_store::store::Crs::new();
    let snap = crs.snapshot();
    let entry = HistoryEntry {
        id: "h1".to_string(),
        node: NodeId::from("n1"),
        action: "a".to_string(),
        result: "ok".to_string(),
        source: Signal::Soft,
        timestamp_ms: 1,
        metadata: serde_json::Value::Null,
    };
    crs.apply(
        &snap,
        &Delta::History(HistoryDelta {
            entries: vec![entry],
            source: Signal::Soft,
        }),
    )
    .unwrap();

    let activity = MemoryActivity::default();
    let input = MemoryInput {
        operation: MemoryOperation::Query {
            node: NodeId::from("n1"),
        },
    };
    let outcome = activity
        .execute(CancellationToken::new(), &crs.snapshot(), &input)
        .await
        .unwrap();
    assert!(outcome.delta.is_none());
    assert_eq!(outcome.results.len(), 1);
}
