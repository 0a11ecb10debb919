use async_trait::async_trait;
use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::snapshot::Snapshot;
use crs_store::store::Crs;
use crs_store::types::NodeId;
use reasoning_activities::{Activity, ActivityOutcome, ExecutionStatus, Priority};
use reasoning_algorithms::Payload;
use reasoning_bridge::{Bridge, RetryPolicy, TraceRecorder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Always produces one new, uniquely-timestamped history entry; used to
/// exercise the retry loop under genuine conflicts. `task_tag` keeps
/// entry ids unique across concurrently-running instances.
struct RecordOnce {
    task_tag: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl Activity for RecordOnce {
    fn name(&self) -> &'static str {
        "test-record"
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
        snapshot: &Snapshot,
        _input: &Payload,
    ) -> Result<ActivityOutcome, reasoning_activities::ActivityError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let ts = snapshot.history().last_timestamp_ms().unwrap_or(0) + 1;
        let delta = Delta::History(HistoryDelta {
            entries: vec![HistoryEntry {
                id: format!("{}-{call}", self.task_tag),
                node: NodeId::from("n"),
                action: "record".to_string(),
                result: "ok".to_string(),
                source: Signal::Soft,
                timestamp_ms: ts,
                metadata: serde_json::Value::Null,
            }],
            source: Signal::Soft,
        });
        Ok(ActivityOutcome {
            status: ExecutionStatus::Success,
            delta: Some(delta),
            results: Vec::new(),
        })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn run_activity_applies_delta_and_records_trace_step() {
    let crs = Arc::new(Crs::new());
    let recorder = Arc::new(TraceRecorder::new());
    let bridge = Bridge::new(Arc::clone(&crs), Arc::clone(&recorder), RetryPolicy::default());

    let activity = RecordOnce {
        task_tag: "solo",
        calls: AtomicUsize::new(0),
    };
    let input = serde_json::Value::Null;

    let outcome = bridge
        .run_activity(CancellationToken::new(), &activity, &input)
        .await
        .unwrap();

    assert_eq!(outcome.status, ExecutionStatus::Success);
    assert_eq!(crs.generation(), 1);
    assert_eq!(recorder.len(), 1);
    recorder.verify().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_run_activity_calls_converge_under_contention() {
    let crs = Arc::new(Crs::new());
    let recorder = Arc::new(TraceRecorder::new());
    let bridge = Arc::new(Bridge::new(
        Arc::clone(&crs),
        Arc::clone(&recorder),
        RetryPolicy::default(),
    ));

    const TAGS: [&str; 6] = ["t0", "t1", "t2", "t3", "t4", "t5"];
    let mut handles = Vec::new();
    for tag in TAGS {
        let bridge = Arc::clone(&bridge);
        handles.push(tokio::spawn(async move {
            let activity = RecordOnce {
                task_tag: tag,
                calls: AtomicUsize::new(0),
            };
            bridge
                .run_activity(
                    CancellationToken::new(),
                    &activity,
                    &serde_json::Value::Null,
                )
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(crs.generation(), 6);
    assert_eq!(crs.snapshot().history().len(), 6);
    recorder.verify().unwrap();
}
