//! Builds a [`TraceStepCore`] out of an activity's outcome, mirroring
//! §4.6's "extraction from `(ActivityResult, Delta, Input)`" rules.

use crate::trace_recorder::TraceStepCore;
use crs_store::delta::Delta;
use reasoning_activities::{ActivityInput, ActivityOutcome};
use reasoning_algorithms::Payload;
use std::time::Duration;

pub fn extract(
    activity: &'static str,
    input: &Payload,
    outcome: &ActivityOutcome,
    timestamp_ms: i64,
    duration: Duration,
    error: Option<String>,
) -> TraceStepCore {
    let target = input
        .downcast_ref::<ActivityInput>()
        .and_then(|ctx| ctx.context.get("target").and_then(|v| v.as_str()))
        .unwrap_or_default()
        .to_string();

    let symbols_found = outcome
        .results
        .iter()
        .filter_map(|r| r.output.as_deref())
        .filter_map(|output| output.downcast_ref::<Vec<String>>())
        .flatten()
        .cloned()
        .collect();

    let (proof_updates, constraints_added, dependencies_found) = outcome
        .delta
        .as_ref()
        .map(extract_from_delta)
        .unwrap_or_default();

    TraceStepCore {
        timestamp_ms,
        action: activity.to_string(),
        target,
        duration,
        symbols_found,
        proof_updates,
        constraints_added,
        dependencies_found,
        error,
        metadata: serde_json::Value::Null,
    }
}

/// `proof_updates` node ids lexicographically sorted; `constraints_added`
/// is `add` in encounter order followed by `update` sorted by id;
/// `dependencies_found` is `add_edges` in encounter order (`remove_edges`
/// are never recorded).
fn extract_from_delta(delta: &Delta) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut proof_updates = Vec::new();
    let mut constraints_added = Vec::new();
    let mut dependencies_found = Vec::new();

    for leaf in delta.flatten_leaves() {
        match leaf {
            Delta::Proof(p) => {
                let mut ids: Vec<String> =
                    p.updates.keys().map(ToString::to_string).collect();
                ids.sort_unstable();
                proof_updates.extend(ids);
            }
            Delta::Constraint(c) => {
                constraints_added.extend(c.add.iter().map(|constraint| constraint.id.clone()));
                let mut updated: Vec<String> =
                    c.update.iter().map(|constraint| constraint.id.clone()).collect();
                updated.sort_unstable();
                constraints_added.extend(updated);
            }
            Delta::Dependency(d) => {
                dependencies_found.extend(
                    d.add_edges
                        .iter()
                        .map(|edge| format!("{}->{}", edge.from, edge.to)),
                );
            }
            Delta::History(_) | Delta::Composite(_) => {}
        }
    }

    (proof_updates, constraints_added, dependencies_found)
}
