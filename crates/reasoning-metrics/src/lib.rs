mod otel;
mod types;

use std::time::Duration;

pub use otel::OtelMetrics;
pub use types::{ActivityStatus, CycleAlgorithm, DistributionKind};

/// The full instrument surface §6 names. The core engine never requires
/// a live backend to run: every call site holds a `dyn Metrics` and the
/// default is `NoopMetrics`, which records nothing.
pub trait Metrics: Send + Sync {
    fn record_activity(&self, activity: &str, status: ActivityStatus, duration: Duration);
    fn record_proof_update(&self, status: &str);
    fn record_constraint_added(&self, kind: &str);
    fn record_dependency_found(&self);
    fn record_conflict(&self);
    fn record_step_recorded(&self, duration: Duration);
    fn record_recording_error(&self, error_type: &str);
    fn record_cycle_detected(&self, algorithm: CycleAlgorithm, length: u64);
    fn record_clause_learned(&self, failure_type: &str);
    fn record_decision_blocked(&self, tool: &str);
    fn set_generation(&self, generation: u64);
    fn record_activity_distribution(&self, kind: DistributionKind, activity: &str, value: u64);
}

/// Default metrics sink: every method is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn record_activity(&self, _activity: &str, _status: ActivityStatus, _duration: Duration) {}
    fn record_proof_update(&self, _status: &str) {}
    fn record_constraint_added(&self, _kind: &str) {}
    fn record_dependency_found(&self) {}
    fn record_conflict(&self) {}
    fn record_step_recorded(&self, _duration: Duration) {}
    fn record_recording_error(&self, _error_type: &str) {}
    fn record_cycle_detected(&self, _algorithm: CycleAlgorithm, _length: u64) {}
    fn record_clause_learned(&self, _failure_type: &str) {}
    fn record_decision_blocked(&self, _tool: &str) {}
    fn set_generation(&self, _generation: u64) {}
    fn record_activity_distribution(
        &self,
        _kind: DistributionKind,
        _activity: &str,
        _value: u64,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_accepts_every_call_without_panicking() {
        let metrics = NoopMetrics;
        metrics.record_activity("search", ActivityStatus::Success, Duration::from_millis(5));
        metrics.record_proof_update("proven");
        metrics.record_constraint_added("range");
        metrics.record_dependency_found();
        metrics.record_conflict();
        metrics.record_step_recorded(Duration::from_micros(100));
        metrics.record_recording_error("panic");
        metrics.record_cycle_detected(CycleAlgorithm::Tarjan, 3);
        metrics.record_clause_learned("timeout");
        metrics.record_decision_blocked("shell");
        metrics.set_generation(42);
        metrics.record_activity_distribution(DistributionKind::ProofUpdates, "search", 7);
    }
}
