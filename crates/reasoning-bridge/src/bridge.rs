//! `Bridge`: the complete retry/record cycle between an `Activity` and
//! the `Crs` store (§4.4).

use crate::error::{BridgeError, BridgeResult};
use crate::extract;
use crate::trace_recorder::TraceRecorder;
use crs_store::delta::Delta;
use crs_store::store::Crs;
use reasoning_activities::{Activity, ActivityOutcome};
use reasoning_algorithms::Payload;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, warn, Instrument};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

pub struct Bridge {
    crs: Arc<Crs>,
    recorder: Arc<TraceRecorder>,
    retry: RetryPolicy,
}

impl Bridge {
    #[must_use]
    pub fn new(crs: Arc<Crs>, recorder: Arc<TraceRecorder>, retry: RetryPolicy) -> Self {
        Self {
            crs,
            recorder,
            retry,
        }
    }

    /// Direct delta application for callers outside the activity
    /// machinery. Validates against the current snapshot first.
    pub fn apply(&self, delta: &Delta) -> BridgeResult<()> {
        let snapshot = self.crs.snapshot();
        delta.validate(&snapshot).map_err(BridgeError::Store)?;
        self.crs.apply(&snapshot, delta)?;
        Ok(())
    }

    /// The complete retry/record cycle: snapshot, execute, apply (with
    /// conflict retry), record, regardless of outcome.
    pub async fn run_activity(
        &self,
        cancel: CancellationToken,
        activity: &dyn Activity,
        input: &Payload,
    ) -> BridgeResult<ActivityOutcome> {
        let span = info_span!("bridge.run_activity", activity = activity.name());
        self.run_activity_inner(cancel, activity, input)
            .instrument(span)
            .await
    }

    async fn run_activity_inner(
        &self,
        cancel: CancellationToken,
        activity: &dyn Activity,
        input: &Payload,
    ) -> BridgeResult<ActivityOutcome> {
        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                if cancel.is_cancelled() {
                    return Err(BridgeError::Cancelled);
                }
                tokio::select! {
                    () = tokio::time::sleep(self.retry.retry_delay) => {}
                    () = cancel.cancelled() => return Err(BridgeError::Cancelled),
                }
            }

            let start = Instant::now();
            let snapshot = self.crs.snapshot();
            let execute_result = activity
                .execute(cancel.child_token(), &snapshot, input)
                .await;

            let outcome = match execute_result {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.record_trace_step(activity.name(), input, None, start, Some(err.to_string()));
                    return Err(BridgeError::Activity(err));
                }
            };

            let apply_result = match &outcome.delta {
                Some(delta) => self.crs.apply(&snapshot, delta).map(|_| ()),
                None => Ok(()),
            };

            self.record_trace_step(
                activity.name(),
                input,
                Some(&outcome),
                start,
                apply_result.as_ref().err().map(ToString::to_string),
            );

            match apply_result {
                Ok(()) => return Ok(outcome),
                Err(e) if e.is_retriable() => continue,
                Err(e) => return Err(BridgeError::Store(e)),
            }
        }

        Err(BridgeError::RetriesExhausted {
            attempts: self.retry.max_retries + 1,
        })
    }

    /// Four independent, individually-guarded publications: a trace
    /// event, a structured log line, and the hash-chained append.
    /// Failure in any one never prevents the others or propagates to
    /// the caller of `run_activity`.
    fn record_trace_step(
        &self,
        activity: &'static str,
        input: &Payload,
        outcome: Option<&ActivityOutcome>,
        start: Instant,
        error: Option<String>,
    ) {
        let duration = start.elapsed();
        let default_outcome;
        let outcome_ref = match outcome {
            Some(o) => o,
            None => {
                default_outcome = empty_outcome();
                &default_outcome
            }
        };

        let timestamp_ms = wall_clock_ms();
        let core = extract::extract(
            activity,
            input,
            outcome_ref,
            timestamp_ms,
            duration,
            error.clone(),
        );

        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.recorder.append(core)
        })) {
            Ok(hash) => {
                tracing::debug!(activity, %hash, ?duration, error = error.as_deref(), "trace step recorded");
            }
            Err(_) => {
                warn!(activity, "trace recorder append panicked; step dropped");
            }
        }
    }
}

fn empty_outcome() -> ActivityOutcome {
    ActivityOutcome {
        status: reasoning_activities::ExecutionStatus::Success,
        delta: None,
        results: Vec::new(),
    }
}

fn wall_clock_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
