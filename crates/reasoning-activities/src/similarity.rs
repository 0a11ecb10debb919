use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Wants to run whenever there are at least two nodes to compare.
#[must_use]
pub fn similarity_activity(
    algorithms: Vec<Arc<dyn Algorithm>>,
    timeout: Duration,
) -> GenericActivity {
    GenericActivity::new("similarity", timeout, algorithms, should_run)
}

fn should_run(snapshot: &Snapshot) -> (bool, Priority) {
    (snapshot.proof().len() >= 2, Priority::Low)
}
