use crs_store::plan::{PlanNode, PlanNodeState};
use std::sync::Arc;
use std::time::Duration;

/// §3/§4.7 pruning policy, mirroring `reasoning_config::PruningConfig`'s
/// field set (this crate does not depend on `reasoning-config` for the
/// policy values themselves, only the engine's caller does, so the
/// policy is a plain copy-of-fields struct here).
#[derive(Debug, Clone, Copy)]
pub struct PruningPolicy {
    pub prune_interval: u64,
    pub keep_best_n: usize,
    pub visits_threshold: i64,
    pub score_threshold: f64,
    pub max_abandoned_age: Duration,
}

impl Default for PruningPolicy {
    fn default() -> Self {
        Self {
            prune_interval: 100,
            keep_best_n: 8,
            visits_threshold: 5,
            score_threshold: 0.1,
            max_abandoned_age: Duration::from_secs(60),
        }
    }
}

/// Walks the tree from `root`, applying the §3 pruning rule at every
/// internal node with more than `keep_best_n` children, and sweeping
/// subtrees marked `Abandoned` whose last touch predates `now_ms -
/// max_abandoned_age`. Safe to call between iterations; takes a brief
/// exclusive lock on each affected node's child list via
/// `PlanNode::retain_children`, never while a worker is mid-descent
/// through that same list (§3: "implementations may take a brief
/// exclusive lock on the affected node's child list").
pub fn prune(root: &Arc<PlanNode>, policy: &PruningPolicy, now_ms: i64) {
    let cutoff_ms = now_ms - policy.max_abandoned_age.as_millis() as i64;

    let mut children = root.children();
    if children.len() > policy.keep_best_n {
        children.sort_by(|a, b| {
            b.average_score()
                .partial_cmp(&a.average_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let discard: std::collections::HashSet<u64> = children
            .iter()
            .skip(policy.keep_best_n)
            .filter(|child| {
                child.visits() >= policy.visits_threshold
                    && child.average_score() < policy.score_threshold
            })
            .map(|child| child.id)
            .collect();
        if !discard.is_empty() {
            root.retain_children(|child| !discard.contains(&child.id));
        }
    }

    root.retain_children(|child| {
        !(child.state() == PlanNodeState::Abandoned && child.last_touched_ms() < cutoff_ms)
    });

    for child in root.children() {
        prune(&child, policy, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn discards_low_scoring_children_beyond_keep_best_n() {
        let root = PlanNode::new_root(0, "root", "root");
        for i in 0..5 {
            let child = PlanNode::new_child(i + 1, format!("c{i}"), "a", 1.0, &root);
            child.visits.store(10, Ordering::Release);
            child.total_score.store(if i < 2 { 9.0 } else { 0.1 }, Ordering::Release);
            root.add_child(child);
        }

        let policy = PruningPolicy {
            keep_best_n: 2,
            visits_threshold: 1,
            score_threshold: 0.5,
            ..PruningPolicy::default()
        };
        prune(&root, &policy, 0);

        assert_eq!(root.child_count(), 2);
        for child in root.children() {
            assert!(child.average_score() >= 0.9);
        }
    }

    #[test]
    fn sweeps_abandoned_subtrees_past_max_age() {
        let root = PlanNode::new_root(0, "root", "root");
        let stale = PlanNode::new_child(1, "stale", "a", 1.0, &root);
        stale.set_state(PlanNodeState::Abandoned);
        stale.touch(0);
        let fresh = PlanNode::new_child(2, "fresh", "b", 1.0, &root);
        fresh.set_state(PlanNodeState::Abandoned);
        fresh.touch(100_000);
        root.add_child(stale);
        root.add_child(fresh.clone());

        let policy = PruningPolicy {
            max_abandoned_age: Duration::from_secs(10),
            ..PruningPolicy::default()
        };
        prune(&root, &policy, 100_000);

        assert_eq!(root.child_count(), 1);
        assert_eq!(root.children()[0].id, fresh.id);
    }
}
