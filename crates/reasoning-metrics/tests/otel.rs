use opentelemetry::metrics::MeterProvider as _;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use reasoning_metrics::{ActivityStatus, CycleAlgorithm, DistributionKind, Metrics, OtelMetrics};
use std::time::Duration;

#[test]
fn records_every_instrument_without_panicking() {
    let provider = SdkMeterProvider::builder().build();
    let meter = provider.meter("reasoning-engine-test");
    let metrics = OtelMetrics::new(&meter);

    metrics.record_activity("search", ActivityStatus::Success, Duration::from_millis(12));
    metrics.record_activity("not-a-real-activity", ActivityStatus::Failure, Duration::from_millis(1));
    metrics.record_proof_update("proven");
    metrics.record_constraint_added("range");
    metrics.record_dependency_found();
    metrics.record_conflict();
    metrics.record_step_recorded(Duration::from_micros(250));
    metrics.record_recording_error("panic");
    metrics.record_cycle_detected(CycleAlgorithm::Brent, 4);
    metrics.record_clause_learned("deadline_exceeded");
    metrics.record_decision_blocked("shell");
    metrics.set_generation(7);
    metrics.record_activity_distribution(DistributionKind::Dependencies, "awareness", 3);
}
