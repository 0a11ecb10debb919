use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Wants to run whenever the dependency graph is non-empty; this is the
/// activity `GraphRefreshed` dispatches to, after `CRS.InvalidateGraphCache`.
#[must_use]
pub fn awareness_activity(
    algorithms: Vec<Arc<dyn Algorithm>>,
    timeout: Duration,
) -> GenericActivity {
    GenericActivity::new("awareness", timeout, algorithms, should_run)
}

fn should_run(snapshot: &Snapshot) -> (bool, Priority) {
    if snapshot.dependency().is_empty() {
        (false, Priority::Low)
    } else {
        (true, Priority::Normal)
    }
}
