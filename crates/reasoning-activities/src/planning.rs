use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::proof::ProofStatus;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Wants to run whenever there is at least one expanded-but-unresolved
/// node that a plan tree could be grown from.
#[must_use]
pub fn planning_activity(
    algorithms: Vec<Arc<dyn Algorithm>>,
    timeout: Duration,
) -> GenericActivity {
    GenericActivity::new("planning", timeout, algorithms, should_run)
}

fn should_run(snapshot: &Snapshot) -> (bool, Priority) {
    let expanded = snapshot
        .proof()
        .iter()
        .any(|(_, n)| n.status == ProofStatus::Expanded);
    (expanded, Priority::Normal)
}
