//! §8 property 5: composite-delta flattening is independent of nesting
//! depth (up to the bound), and depth > 100 yields an empty list rather
//! than a stack overflow.

use crs_store::delta::{Delta, HistoryDelta, MAX_COMPOSITE_DEPTH};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::types::NodeId;
use proptest::prelude::*;

fn leaf(id: &str) -> Delta {
    Delta::History(HistoryDelta {
        entries: vec![HistoryEntry {
            id: id.to_string(),
            node: NodeId::from("n"),
            action: "a".to_string(),
            result: "r".to_string(),
            source: Signal::Soft,
            timestamp_ms: 1,
            metadata: serde_json::Value::Null,
        }],
        source: Signal::Soft,
    })
}

fn nest(inner: Delta, depth: usize) -> Delta {
    (0..depth).fold(inner, |acc, _| Delta::Composite(vec![acc]))
}

proptest! {
    #[test]
    fn flattening_is_depth_independent(depth in 0usize..=MAX_COMPOSITE_DEPTH) {
        let nested = nest(leaf("only"), depth);
        let flat = nested.flatten_leaves();
        prop_assert_eq!(flat.len(), 1);
    }
}

#[test]
fn beyond_depth_bound_yields_empty_not_overflow() {
    let nested = nest(leaf("only"), MAX_COMPOSITE_DEPTH + 50);
    let flat = nested.flatten_leaves();
    assert!(flat.is_empty());
}

#[test]
fn multiple_leaves_preserve_encounter_order() {
    let composite = Delta::Composite(vec![
        Delta::Composite(vec![leaf("a"), leaf("b")]),
        leaf("c"),
    ]);
    let flat = composite.flatten_leaves();
    assert_eq!(flat.len(), 3);
}
