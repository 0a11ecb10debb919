//! `memory` is passive (§4.3): `should_run` always returns false, it is
//! invoked explicitly by the coordinator. `execute` dispatches on the
//! requested operation instead of running any algorithms.

use crate::activity::{Activity, ActivityOutcome, ExecutionStatus};
use crate::error::ActivityError;
use crate::input::{MemoryInput, MemoryOperation};
use crate::priority::Priority;
use async_trait::async_trait;
use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::{Algorithm, JobResult, Payload};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub struct MemoryActivity {
    timeout: Duration,
}

impl MemoryActivity {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for MemoryActivity {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Activity for MemoryActivity {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn algorithms(&self) -> Vec<Arc<dyn Algorithm>> {
        Vec::new()
    }

    fn should_run(&self, _snapshot: &Snapshot) -> (bool, Priority) {
        (false, Priority::Low)
    }

    async fn execute(
        &self,
        _cancel: CancellationToken,
        snapshot: &Snapshot,
        input: &Payload,
    ) -> Result<ActivityOutcome, ActivityError> {
        let Some(MemoryInput { operation }) = input.downcast_ref::<MemoryInput>() else {
            return Ok(ActivityOutcome {
                status: ExecutionStatus::Success,
                delta: None,
                results: Vec::new(),
            });
        };

        let start = Instant::now();
        let (output, delta): (Box<Payload>, Option<Delta>) = match operation {
            MemoryOperation::Record {
                action,
                result,
                metadata,
            } => {
                let entry = HistoryEntry {
                    id: format!("mem-{}", snapshot.generation()),
                    node: crs_store::types::NodeId::from("memory"),
                    action: action.clone(),
                    result: result.clone(),
                    source: Signal::Soft,
                    timestamp_ms: snapshot.history().last_timestamp_ms().unwrap_or(0) + 1,
                    metadata: metadata.clone(),
                };
                let delta = Delta::History(HistoryDelta {
                    entries: vec![entry],
                    source: Signal::Soft,
                });
                (Box::new(()), Some(delta))
            }
            MemoryOperation::Query { node } => {
                let entries: Vec<HistoryEntry> = snapshot
                    .history()
                    .trace(node)
                    .into_iter()
                    .cloned()
                    .collect();
                (Box::new(entries), None)
            }
            MemoryOperation::Replay { node } => {
                let entries: Vec<HistoryEntry> = snapshot
                    .history()
                    .trace(node)
                    .into_iter()
                    .cloned()
                    .collect();
                (Box::new(entries), None)
            }
        };

        let result = JobResult {
            name: "memory",
            start,
            end: Instant::now(),
            output: Some(output),
            delta: delta.clone(),
            err: None,
            cancelled: false,
            partial: false,
        };

        Ok(ActivityOutcome {
            status: ExecutionStatus::Success,
            delta,
            results: vec![result],
        })
    }
}
