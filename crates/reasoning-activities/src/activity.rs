//! The `Activity` contract (§4.3): a named orchestrator grouping a set
//! of algorithms, deciding whether it should run and at what priority,
//! and executing them via the shared [`Runner`].

use crate::error::ActivityError;
use crate::priority::Priority;
use async_trait::async_trait;
use crs_store::delta::Delta;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::{Algorithm, AlgorithmError, JobResult, Payload, Runner};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Partial,
}

/// The composite result of one `Activity::execute` call.
pub struct ActivityOutcome {
    pub status: ExecutionStatus,
    pub delta: Option<Delta>,
    pub results: Vec<JobResult>,
}

#[async_trait]
pub trait Activity: Send + Sync {
    fn name(&self) -> &'static str;
    fn timeout(&self) -> Duration;
    fn algorithms(&self) -> Vec<Arc<dyn Algorithm>>;

    async fn health_check(&self) -> Result<(), ActivityError> {
        Ok(())
    }

    /// Pure inspection of the snapshot: should this activity run now,
    /// and at what priority. Must not allocate trait objects that
    /// outlive the call or touch the store.
    fn should_run(&self, snapshot: &Snapshot) -> (bool, Priority);

    async fn execute(
        &self,
        cancel: CancellationToken,
        snapshot: &Snapshot,
        input: &Payload,
    ) -> Result<ActivityOutcome, ActivityError>;
}

/// Shared `RunAlgorithms` skeleton embedded by concrete activities:
/// fans every `(algorithm, input)` pair out through a [`Runner`] bounded
/// by `timeout`, then classifies the batch as `Success` (everything
/// succeeded) or `Partial` (some algorithms failed with a cancellation
/// class error). A non-cancellation failure from any algorithm is
/// fatal and aborts the whole activity.
pub struct BaseActivity;

impl BaseActivity {
    #[instrument(skip_all, fields(activity = activity_name))]
    pub async fn run_algorithms<F>(
        cancel: CancellationToken,
        timeout: Duration,
        activity_name: &'static str,
        snapshot: &Snapshot,
        algorithms: &[Arc<dyn Algorithm>],
        make_input: F,
    ) -> Result<ActivityOutcome, ActivityError>
    where
        F: Fn(&dyn Algorithm) -> Box<Payload>,
    {
        if algorithms.is_empty() {
            return Ok(ActivityOutcome {
                status: ExecutionStatus::Success,
                delta: None,
                results: Vec::new(),
            });
        }

        let child_cancel = cancel.child_token();
        let runner = Runner::new(algorithms.len(), child_cancel.clone());
        for algorithm in algorithms {
            let input = make_input(algorithm.as_ref());
            runner.submit(Arc::clone(algorithm), input);
        }

        let snapshot_arc = Arc::new(snapshot.clone());
        let results = match tokio::time::timeout(timeout, runner.collect(snapshot_arc)).await {
            Ok(results) => results,
            Err(_elapsed) => {
                child_cancel.cancel();
                return Err(ActivityError {
                    activity: activity_name,
                    operation: "run_algorithms",
                    err: AlgorithmError::DeadlineExceeded,
                });
            }
        };

        let mut any_failed = false;
        for result in &results {
            if let Some(err) = &result.err {
                if !err.is_cancellation() {
                    return Err(ActivityError {
                        activity: activity_name,
                        operation: "run_algorithms",
                        err: err.clone(),
                    });
                }
                any_failed = true;
            }
        }

        let delta = Runner::merge_deltas(&results);
        let status = if any_failed {
            ExecutionStatus::Partial
        } else {
            ExecutionStatus::Success
        };
        Ok(ActivityOutcome {
            status,
            delta,
            results,
        })
    }
}
