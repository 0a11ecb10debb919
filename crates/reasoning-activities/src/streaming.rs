use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Streaming sketches (HyperLogLog/MinHash/LSH-style estimators) are
/// cheap enough to always run; always low priority so it never
/// preempts substantive work under `MaxConcurrentActivities`.
#[must_use]
pub fn streaming_activity(
    algorithms: Vec<Arc<dyn Algorithm>>,
    timeout: Duration,
) -> GenericActivity {
    GenericActivity::new("streaming", timeout, algorithms, should_run)
}

fn should_run(_snapshot: &Snapshot) -> (bool, Priority) {
    (true, Priority::Low)
}
