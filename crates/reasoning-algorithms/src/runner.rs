//! Bounded-concurrency execution of [`Algorithm`] jobs against a single
//! snapshot, grounded on the event-bus's bounded-channel-plus-`JoinSet`
//! shape: jobs are submitted into a fixed-capacity queue, dropped
//! silently when the queue is full (the submitter is expected to treat
//! that as backpressure, not an error), and collected once every spawned
//! task has finished or been cancelled.

use crate::algorithm::{Algorithm, AlgorithmOutcome, Payload};
use crate::error::AlgorithmError;
use crs_store::delta::Delta;
use crs_store::snapshot::Snapshot;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, warn};

/// Outcome of one submitted job, matching §4.2's `Result` shape.
pub struct JobResult {
    pub name: &'static str,
    pub start: Instant,
    pub end: Instant,
    pub output: Option<Box<Payload>>,
    pub delta: Option<Delta>,
    pub err: Option<AlgorithmError>,
    pub cancelled: bool,
    pub partial: bool,
}

impl JobResult {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }
}

struct Job {
    algorithm: Arc<dyn Algorithm>,
    input: Box<Payload>,
}

/// Submits jobs onto a bounded channel and drains their results once
/// every spawned task completes. One `Runner` is meant to live for the
/// lifetime of a single `RunOnce`/event-handling pass.
pub struct Runner {
    tx: mpsc::Sender<Job>,
    rx: mpsc::Receiver<Job>,
    cancel: CancellationToken,
}

impl Runner {
    #[must_use]
    pub fn new(capacity: usize, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self { tx, rx, cancel }
    }

    /// Enqueues a job. Returns `false` (and drops the job) if the queue
    /// is full -- this is a deliberate backpressure signal, not an error.
    pub fn submit(&self, algorithm: Arc<dyn Algorithm>, input: Box<Payload>) -> bool {
        self.tx.try_send(Job { algorithm, input }).is_ok()
    }

    /// Runs every currently-queued job concurrently against `snapshot`
    /// and returns once all of them have finished, timed out, or been
    /// cancelled. Closing the sender side first ensures `recv` drains
    /// exactly what was submitted before this call.
    pub async fn collect(mut self, snapshot: Arc<Snapshot>) -> Vec<JobResult> {
        drop(self.tx);

        let mut set = JoinSet::new();
        while let Some(job) = self.rx.recv().await {
            let snapshot = Arc::clone(&snapshot);
            let cancel = self.cancel.clone();
            set.spawn(run_one(job, snapshot, cancel));
        }

        let mut results = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(join_err) => {
                    warn!(error = %join_err, "algorithm task panicked");
                }
            }
        }
        results
    }

    /// Merges every job's delta into one composite, in encounter order.
    /// `None` if no job produced a delta.
    #[must_use]
    pub fn merge_deltas(results: &[JobResult]) -> Option<Delta> {
        let deltas: Vec<Delta> = results.iter().filter_map(|r| r.delta.clone()).collect();
        Delta::combine(deltas)
    }
}

async fn run_one(job: Job, snapshot: Arc<Snapshot>, cancel: CancellationToken) -> JobResult {
    let Job { algorithm, input } = job;
    let name = algorithm.name();
    let start = Instant::now();
    let span = tracing::info_span!("algorithm.run", algorithm = name);

    let child_cancel = cancel.child_token();
    let deadline = algorithm.timeout();

    let outcome = tokio::time::timeout(
        deadline,
        algorithm.process(child_cancel.clone(), &snapshot, input.as_ref()),
    )
    .instrument(span)
    .await;

    let end = Instant::now();
    match outcome {
        Ok(Ok(AlgorithmOutcome { output, delta })) => JobResult {
            name,
            start,
            end,
            output: Some(output),
            delta,
            err: None,
            cancelled: false,
            partial: false,
        },
        Ok(Err(err)) => {
            let cancelled = err.is_cancellation();
            JobResult {
                name,
                start,
                end,
                output: None,
                delta: None,
                err: Some(err),
                cancelled,
                partial: false,
            }
        }
        Err(_elapsed) => {
            child_cancel.cancel();
            JobResult {
                name,
                start,
                end,
                output: None,
                delta: None,
                err: Some(AlgorithmError::DeadlineExceeded),
                cancelled: true,
                partial: algorithm.supports_partial_results(),
            }
        }
    }
}
