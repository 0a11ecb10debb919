//! §8 properties 1-2: snapshot immutability and generation monotonicity
//! under concurrent writers.

use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::store::Crs;
use crs_store::types::NodeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;

fn history_delta(id: &str, ts: i64) -> Delta {
    Delta::History(HistoryDelta {
        entries: vec![HistoryEntry {
            id: id.to_string(),
            node: NodeId::from("n"),
            action: "a".to_string(),
            result: "r".to_string(),
            source: Signal::Soft,
            timestamp_ms: ts,
            metadata: serde_json::Value::Null,
        }],
        source: Signal::Soft,
    })
}

#[test]
fn concurrent_writers_each_advance_generation_by_one_eventually() {
    let crs = Arc::new(Crs::new());
    let clock = Arc::new(AtomicI64::new(1));
    let writers = 8;
    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let crs = Arc::clone(&crs);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                loop {
                    let snap = crs.snapshot();
                    let ts = clock.fetch_add(1, Ordering::SeqCst);
                    let delta = history_delta(&format!("entry-{i}"), ts);
                    match crs.apply(&snap, &delta) {
                        Ok(_) => break,
                        Err(e) if e.is_retriable() => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(crs.generation(), i64::from(writers) as u64);
    assert_eq!(crs.snapshot().history().len(), writers as usize);
}

#[test]
fn snapshot_taken_before_apply_never_observes_later_state() {
    let crs = Crs::new();
    let s1 = crs.snapshot();
    crs.apply(&s1, &history_delta("a", 1)).unwrap();
    let s2 = crs.snapshot();
    crs.apply(&s2, &history_delta("b", 2)).unwrap();

    assert!(s1.generation() < crs.generation());
    assert_eq!(s1.history().len(), 0);
    assert_eq!(s2.history().len(), 1);
}
