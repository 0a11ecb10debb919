//! The `Algorithm` contract (§4.2): a pure function over a snapshot that
//! emits an output and an optional delta. This crate fixes the interface,
//! purity contract, cancellation discipline, and delta shape only -- the
//! individual algorithm bodies (PN-MCTS, CDCL, HTN, AC-3, TMS, ...) are
//! out of scope per §1 and live as separate implementations of this
//! trait in the activity layer or its host application.

use crate::error::AlgorithmResult;
use async_trait::async_trait;
use crs_store::delta::Delta;
use crs_store::snapshot::Snapshot;
use std::any::Any;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Type-erased input/output payload. Algorithms downcast with
/// `Any::downcast_ref`; `InputType()`/`OutputType()` on [`Algorithm`]
/// exist only so diagnostic harnesses can print what a given algorithm
/// expects, per §9 ("no behavioural consequence").
pub type Payload = dyn Any + Send + Sync;

/// A named evaluation hook surfaced for health checks / test harnesses.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub description: &'static str,
}

/// A metric this algorithm contributes to, surfaced for registration at
/// startup (the metrics crate owns the actual instruments).
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub kind: MetricKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
    Gauge,
}

/// Output of one algorithm invocation before it is wrapped into a
/// [`crate::runner::JobResult`].
pub struct AlgorithmOutcome {
    pub output: Box<Payload>,
    pub delta: Option<Delta>,
}

impl AlgorithmOutcome {
    #[must_use]
    pub fn new(output: Box<Payload>, delta: Option<Delta>) -> Self {
        Self { output, delta }
    }

    #[must_use]
    pub fn delta_only(delta: Delta) -> Self {
        Self {
            output: Box::new(()),
            delta: Some(delta),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            output: Box::new(()),
            delta: None,
        }
    }
}

#[async_trait]
pub trait Algorithm: Send + Sync {
    /// Stable name, used for metric labels and trace extraction.
    fn name(&self) -> &'static str;

    /// Hard per-invocation deadline.
    fn timeout(&self) -> Duration;

    /// Advisory recording cadence for watchdogs.
    fn progress_interval(&self) -> Duration {
        Duration::from_millis(100)
    }

    fn supports_partial_results(&self) -> bool {
        false
    }

    fn input_type(&self) -> &'static str;
    fn output_type(&self) -> &'static str;

    /// Validates configuration; must not touch the graph.
    async fn health_check(&self) -> AlgorithmResult<()> {
        Ok(())
    }

    fn properties(&self) -> Vec<Property> {
        Vec::new()
    }

    fn metrics(&self) -> Vec<MetricDefinition> {
        Vec::new()
    }

    /// The pure function itself. Must not mutate `input`, must check
    /// `cancel` at least every 100ms and at each non-trivial loop
    /// boundary, and must return a partial result on cancellation when
    /// `supports_partial_results()` is true.
    async fn process(
        &self,
        cancel: CancellationToken,
        snapshot: &Snapshot,
        input: &Payload,
    ) -> AlgorithmResult<AlgorithmOutcome>;
}
