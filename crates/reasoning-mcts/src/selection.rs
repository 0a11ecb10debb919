use crs_store::plan::PlanNode;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Per-`ActionType` (here, per action string) score pooled across every
/// node in the tree that took that action, blended into UCB selection
/// (§3: "RAVE (optional): maintain per-ActionType score").
#[derive(Default)]
pub struct RaveTable {
    scores: RwLock<FxHashMap<String, (f64, u64)>>,
}

impl RaveTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, action: &str, score: f64) {
        let mut scores = self.scores.write();
        let entry = scores.entry(action.to_string()).or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }

    #[must_use]
    pub fn average(&self, action: &str) -> Option<f64> {
        self.scores
            .read()
            .get(action)
            .filter(|(_, visits)| *visits > 0)
            .map(|(total, visits)| total / *visits as f64)
    }
}

/// UCB1 score for `child`, optionally blended with its RAVE estimate.
/// A child with zero visits always scores `f64::INFINITY` so every
/// child is tried at least once before any revisit.
#[must_use]
pub fn ucb1_score(
    child: &Arc<PlanNode>,
    parent_visits: i64,
    exploration_constant: f64,
    rave: Option<&RaveTable>,
    rave_equivalence: f64,
) -> f64 {
    let visits = child.visits();
    if visits <= 0 {
        return f64::INFINITY;
    }

    let exploitation = child.average_score();
    let exploration =
        exploration_constant * ((parent_visits.max(1) as f64).ln() / visits as f64).sqrt();
    let ucb = exploitation + exploration;

    match rave.and_then(|table| table.average(&child.action)) {
        Some(rave_score) => {
            let beta = rave_equivalence / (rave_equivalence + visits as f64);
            (1.0 - beta) * ucb + beta * rave_score
        }
        None => ucb,
    }
}

/// Picks the child maximizing `ucb1_score`; `None` if there are no
/// children (the node is a leaf).
#[must_use]
pub fn select_child(
    node: &Arc<PlanNode>,
    exploration_constant: f64,
    rave: Option<&RaveTable>,
    rave_equivalence: f64,
) -> Option<Arc<PlanNode>> {
    let parent_visits = node.visits().max(1);
    node.children()
        .into_iter()
        .max_by(|a, b| {
            let score_a = ucb1_score(a, parent_visits, exploration_constant, rave, rave_equivalence);
            let score_b = ucb1_score(b, parent_visits, exploration_constant, rave, rave_equivalence);
            score_a
                .partial_cmp(&score_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_store::plan::PlanNode;

    #[test]
    fn unvisited_child_has_infinite_score() {
        let root = PlanNode::new_root(0, "root", "root");
        let child = PlanNode::new_child(1, "c", "a", 1.0, &root);
        assert_eq!(
            ucb1_score(&child, 1, 1.41, None, 50.0),
            f64::INFINITY
        );
    }

    #[test]
    fn select_child_prefers_unvisited_over_visited() {
        use std::sync::atomic::Ordering;
        let root = PlanNode::new_root(0, "root", "root");
        let visited = PlanNode::new_child(1, "visited", "a", 1.0, &root);
        visited.visits.store(10, Ordering::Release);
        visited.total_score.store(5.0, Ordering::Release);
        let unvisited = PlanNode::new_child(2, "unvisited", "b", 1.0, &root);
        root.add_child(visited);
        root.add_child(unvisited.clone());

        let chosen = select_child(&root, 1.41, None, 50.0).unwrap();
        assert_eq!(chosen.id, unvisited.id);
    }
}
