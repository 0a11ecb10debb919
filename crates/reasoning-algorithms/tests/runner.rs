use async_trait::async_trait;
use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::snapshot::Snapshot;
use crs_store::types::NodeId;
use reasoning_algorithms::{
    Algorithm, AlgorithmError, AlgorithmOutcome, AlgorithmResult, Payload, Runner,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Echo {
    delay: Duration,
}

#[async_trait]
impl Algorithm for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn input_type(&self) -> &'static str {
        "()"
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
        tokio::time::sleep(self.delay).await;
        let delta = Delta::History(HistoryDelta {
            entries: vec![HistoryEntry {
                id: "echo-1".to_string(),
                node: NodeId::from("n"),
                action: "echo".to_string(),
                result: "ok".to_string(),
                source: Signal::Soft,
                timestamp_ms: 1,
                metadata: serde_json::Value::Null,
            }],
            source: Signal::Soft,
        });
        Ok(AlgorithmOutcome::delta_only(delta))
    }
}

struct Slow;

#[async_trait]
impl Algorithm for Slow {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(10)
    }

    fn input_type(&self) -> &'static str {
        "()"
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
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(AlgorithmOutcome::empty())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn collects_results_for_every_submitted_job() {
    let runner = Runner::new(8, CancellationToken::new());
    runner.submit(Arc::new(Echo { delay: Duration::ZERO }), Box::new(()));
    runner.submit(Arc::new(Echo { delay: Duration::ZERO }), Box::new(()));

    let results = runner.collect(Arc::new(Snapshot::default())).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.err.is_none()));

    let merged = Runner::merge_deltas(&results);
    assert!(matches!(merged, Some(Delta::Composite(ref d)) if d.len() == 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn exceeding_timeout_yields_deadline_exceeded() {
    let runner = Runner::new(4, CancellationToken::new());
    runner.submit(Arc::new(Slow), Box::new(()));

    let results = runner.collect(Arc::new(Snapshot::default())).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].cancelled);
    assert!(matches!(results[0].err, Some(AlgorithmError::DeadlineExceeded)));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_queue_drops_submission_instead_of_blocking() {
    let runner = Runner::new(1, CancellationToken::new());
    assert!(runner.submit(Arc::new(Echo { delay: Duration::from_millis(20) }), Box::new(())));
    let dropped = runner.submit(Arc::new(Echo { delay: Duration::ZERO }), Box::new(()));
    assert!(!dropped);

    let results = runner.collect(Arc::new(Snapshot::default())).await;
    assert_eq!(results.len(), 1);
}
