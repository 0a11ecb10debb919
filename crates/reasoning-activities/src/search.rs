use crate::generic::GenericActivity;
use crate::priority::Priority;
use crs_store::proof::ProofStatus;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::Algorithm;
use std::sync::Arc;
use std::time::Duration;

/// Wants to run whenever the proof index has unresolved (`Unknown`)
/// nodes to expand. Priority rises with the size of the frontier.
#[must_use]
pub fn search_activity(algorithms: Vec<Arc<dyn Algorithm>>, timeout: Duration) -> GenericActivity {
    GenericActivity::new("search", timeout, algorithms, should_run)
}

fn should_run(snapshot: &Snapshot) -> (bool, Priority) {
    let unknown = snapshot
        .proof()
        .iter()
        .filter(|(_, n)| n.status == ProofStatus::Unknown)
        .count();
    if unknown == 0 {
        return (false, Priority::Low);
    }
    let priority = if unknown > 50 {
        Priority::High
    } else {
        Priority::Normal
    };
    (true, priority)
}
