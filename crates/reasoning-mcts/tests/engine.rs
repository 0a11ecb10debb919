use crs_store::plan::{PlanNode, PlanTree, TreeBudget};
use reasoning_mcts::{ChildSpec, EngineConfig, Expander, ParallelMctsEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Deterministic two-child expander: every leaf below depth 3 gets two
/// children, everything else is a terminal rollout of a fixed score.
struct TwoChildExpander {
    expansions: AtomicUsize,
}

impl TwoChildExpander {
    fn new() -> Self {
        Self {
            expansions: AtomicUsize::new(0),
        }
    }
}

impl Expander for TwoChildExpander {
    fn expand(&self, node: &Arc<PlanNode>) -> Vec<ChildSpec> {
        if node.depth >= 3 {
            return Vec::new();
        }
        self.expansions.fetch_add(1, Ordering::Relaxed);
        vec![
            ChildSpec::new("left", "left", 0.5),
            ChildSpec::new("right", "right", 0.5),
        ]
    }

    fn rollout(&self, node: &Arc<PlanNode>) -> f64 {
        if node.action == "left" {
            0.8
        } else {
            0.2
        }
    }
}

fn test_tree(budget: TreeBudget) -> Arc<PlanTree> {
    Arc::new(PlanTree::new("test-task", 0, budget))
}

fn assert_no_negative_visits(node: &Arc<PlanNode>) {
    assert!(node.visits() >= 0, "node {} has negative visits", node.id);
    for child in node.children() {
        assert_no_negative_visits(&child);
    }
}

fn assert_visits_equal_total_score_denominator(node: &Arc<PlanNode>) {
    // After every worker has fully backpropagated, total_score / visits
    // must be a finite, sane average -- a residual virtual loss would
    // drive it strongly negative.
    if node.visits() > 0 {
        let avg = node.average_score();
        assert!(
            (-0.01..=1.01).contains(&avg),
            "node {} average score {avg} outside expected [0,1] range, suggests leftover virtual loss",
            node.id
        );
    }
    for child in node.children() {
        assert_visits_equal_total_score_denominator(&child);
    }
}

#[tokio::test]
async fn root_and_all_visited_nodes_have_nonnegative_visits() {
    let tree = test_tree(TreeBudget {
        time_limit: Duration::from_secs(5),
        ..TreeBudget::default()
    });
    let engine = ParallelMctsEngine::new(
        TwoChildExpander::new(),
        EngineConfig {
            num_workers: 4,
            max_iterations: 20,
            ..EngineConfig::default()
        },
    );

    let stats = engine.run(Arc::clone(&tree)).await;

    assert!(stats.iterations_run >= 1);
    assert!(tree.root().visits() >= 1);
    assert_no_negative_visits(tree.root());
}

#[tokio::test]
async fn no_residual_virtual_loss_after_run_completes() {
    let tree = test_tree(TreeBudget {
        time_limit: Duration::from_secs(5),
        ..TreeBudget::default()
    });
    let engine = ParallelMctsEngine::new(
        TwoChildExpander::new(),
        EngineConfig {
            num_workers: 4,
            max_iterations: 40,
            ..EngineConfig::default()
        },
    );

    engine.run(Arc::clone(&tree)).await;

    assert_visits_equal_total_score_denominator(tree.root());
}

#[tokio::test]
async fn respects_max_nodes_budget() {
    let tree = test_tree(TreeBudget {
        max_nodes: 10,
        time_limit: Duration::from_secs(5),
        ..TreeBudget::default()
    });
    let engine = ParallelMctsEngine::new(
        TwoChildExpander::new(),
        EngineConfig {
            num_workers: 4,
            max_iterations: 200,
            ..EngineConfig::default()
        },
    );

    engine.run(Arc::clone(&tree)).await;

    assert!(tree.total_nodes() <= 10);
}

#[tokio::test]
async fn end_to_end_four_workers_twenty_iterations_prefers_higher_scoring_branch() {
    let tree = test_tree(TreeBudget {
        time_limit: Duration::from_secs(5),
        ..TreeBudget::default()
    });
    let engine = ParallelMctsEngine::new(
        TwoChildExpander::new(),
        EngineConfig {
            num_workers: 4,
            max_iterations: 20,
            ..EngineConfig::default()
        },
    );

    engine.run(Arc::clone(&tree)).await;

    let root = tree.root();
    assert!(root.visits() >= 1);
    let children = root.children();
    assert!(!children.is_empty());
    let left = children.iter().find(|c| c.action == "left");
    let right = children.iter().find(|c| c.action == "right");
    if let (Some(left), Some(right)) = (left, right) {
        if left.visits() > 0 && right.visits() > 0 {
            assert!(left.average_score() >= right.average_score() - 0.5);
        }
    }
}
