use crate::types::{ActivityStatus, CycleAlgorithm, DistributionKind};
use crate::Metrics;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use opentelemetry::KeyValue;
use reasoning_config::sanitize_activity_label;
use std::collections::HashMap;
use std::time::Duration;

const ACTIVITY_DURATION_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
const RECORDING_DURATION_BUCKETS: &[f64] = &[1e-4, 5e-4, 1e-3, 5e-3, 0.01, 0.05, 0.1];

/// Instrument set matching §6's exact counter/histogram/gauge names and
/// bucket boundaries, backed by a real `opentelemetry::metrics::Meter`.
/// The exporter behind the `Meter` is the host process's choice; this
/// crate only records into the instruments.
pub struct OtelMetrics {
    activities_total: Counter<u64>,
    activity_duration_seconds: Histogram<f64>,
    proof_updates_total: Counter<u64>,
    constraints_added_total: Counter<u64>,
    dependencies_found_total: Counter<u64>,
    conflicts_total: Counter<u64>,
    steps_recorded_total: Counter<u64>,
    recording_duration_seconds: Histogram<f64>,
    recording_errors_total: Counter<u64>,
    cycles_detected_total: Counter<u64>,
    cycle_length: Histogram<f64>,
    clauses_learned_total: Counter<u64>,
    decisions_blocked_total: Counter<u64>,
    generation: Gauge<u64>,
    distributions: HashMap<&'static str, Histogram<f64>>,
}

impl OtelMetrics {
    #[must_use]
    pub fn new(meter: &Meter) -> Self {
        let mut distributions = HashMap::new();
        for kind in [
            DistributionKind::ProofUpdates,
            DistributionKind::Constraints,
            DistributionKind::Dependencies,
            DistributionKind::SymbolsPerActivity,
        ] {
            distributions.insert(
                kind.metric_name(),
                meter.f64_histogram(kind.metric_name()).build(),
            );
        }

        Self {
            activities_total: meter.u64_counter("activities_total").build(),
            activity_duration_seconds: meter
                .f64_histogram("activity_duration_seconds")
                .with_boundaries(ACTIVITY_DURATION_BUCKETS.to_vec())
                .build(),
            proof_updates_total: meter.u64_counter("proof_updates_total").build(),
            constraints_added_total: meter.u64_counter("constraints_added_total").build(),
            dependencies_found_total: meter.u64_counter("dependencies_found_total").build(),
            conflicts_total: meter.u64_counter("conflicts_total").build(),
            steps_recorded_total: meter.u64_counter("steps_recorded_total").build(),
            recording_duration_seconds: meter
                .f64_histogram("recording_duration_seconds")
                .with_boundaries(RECORDING_DURATION_BUCKETS.to_vec())
                .build(),
            recording_errors_total: meter.u64_counter("recording_errors_total").build(),
            cycles_detected_total: meter.u64_counter("cycles_detected_total").build(),
            cycle_length: meter.f64_histogram("cycle_length").build(),
            clauses_learned_total: meter.u64_counter("clauses_learned_total").build(),
            decisions_blocked_total: meter.u64_counter("decisions_blocked_total").build(),
            generation: meter.u64_gauge("generation").build(),
            distributions,
        }
    }
}

impl Metrics for OtelMetrics {
    fn record_activity(&self, activity: &str, status: ActivityStatus, duration: Duration) {
        let activity = sanitize_activity_label(activity);
        let attrs = [
            KeyValue::new("activity", activity),
            KeyValue::new("status", status.as_str()),
        ];
        self.activities_total.add(1, &attrs);
        self.activity_duration_seconds
            .record(duration.as_secs_f64(), &attrs);
    }

    fn record_proof_update(&self, status: &str) {
        self.proof_updates_total
            .add(1, &[KeyValue::new("status", status.to_string())]);
    }

    fn record_constraint_added(&self, kind: &str) {
        self.constraints_added_total
            .add(1, &[KeyValue::new("type", kind.to_string())]);
    }

    fn record_dependency_found(&self) {
        self.dependencies_found_total.add(1, &[]);
    }

    fn record_conflict(&self) {
        self.conflicts_total.add(1, &[]);
    }

    fn record_step_recorded(&self, duration: Duration) {
        self.steps_recorded_total.add(1, &[]);
        self.recording_duration_seconds
            .record(duration.as_secs_f64(), &[]);
    }

    fn record_recording_error(&self, error_type: &str) {
        self.recording_errors_total
            .add(1, &[KeyValue::new("error_type", error_type.to_string())]);
    }

    fn record_cycle_detected(&self, algorithm: CycleAlgorithm, length: u64) {
        let attrs = [KeyValue::new("algorithm", algorithm.as_str())];
        self.cycles_detected_total.add(1, &attrs);
        self.cycle_length.record(length as f64, &attrs);
    }

    fn record_clause_learned(&self, failure_type: &str) {
        self.clauses_learned_total
            .add(1, &[KeyValue::new("failure_type", failure_type.to_string())]);
    }

    fn record_decision_blocked(&self, tool: &str) {
        self.decisions_blocked_total
            .add(1, &[KeyValue::new("tool", tool.to_string())]);
    }

    fn set_generation(&self, generation: u64) {
        self.generation.record(generation, &[]);
    }

    fn record_activity_distribution(&self, kind: DistributionKind, activity: &str, value: u64) {
        let activity = sanitize_activity_label(activity);
        if let Some(histogram) = self.distributions.get(kind.metric_name()) {
            histogram.record(value as f64, &[KeyValue::new("activity", activity)]);
        }
    }
}
