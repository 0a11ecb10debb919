use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Wants to run whenever there are constraints registered to propagate.
#[must_use]
pub fn constraint_activity(
    algorithms: Vec<Arc<dyn Algorithm>>,
    timeout: Duration,
) -> GenericActivity {
    GenericActivity::new("constraint", timeout, algorithms, should_run)
}

fn should_run(snapshot: &Snapshot) -> (bool, Priority) {
    if snapshot.constraint().is_empty() {
        (false, Priority::Low)
    } else {
        (true, Priority::Normal)
    }
}
