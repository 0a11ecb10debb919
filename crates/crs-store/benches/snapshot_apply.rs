use criterion::{Criterion, criterion_group, criterion_main};
use crs_store::delta::{Delta, HistoryDelta};
use crs_store::history::HistoryEntry;
use crs_store::signal::Signal;
use crs_store::store::Crs;
use crs_store::types::NodeId;
use std::hint::black_box;

fn bench_snapshot(c: &mut Criterion) {
    let crs = Crs::new();
    for i in 0..1000 {
        let snap = crs.snapshot();
        let delta = Delta::History(HistoryDelta {
            entries: vec![HistoryEntry {
                id: format!("entry-{i}"),
                node: NodeId::from("n"),
                action: "a".to_string(),
                result: "r".to_string(),
                source: Signal::Soft,
                timestamp_ms: i,
                metadata: serde_json::Value::Null,
            }],
            source: Signal::Soft,
        });
        crs.apply(&snap, &delta).unwrap();
    }

    c.bench_function("snapshot_o1", |b| {
        b.iter(|| black_box(crs.snapshot()));
    });
}

fn bench_apply(c: &mut Criterion) {
    let crs = Crs::new();
    let mut counter = 0i64;
    c.bench_function("apply_history_entry", |b| {
        b.iter(|| {
            let snap = crs.snapshot();
            counter += 1;
            let delta = Delta::History(HistoryDelta {
                entries: vec![HistoryEntry {
                    id: format!("bench-{counter}"),
                    node: NodeId::from("n"),
                    action: "a".to_string(),
                    result: "r".to_string(),
                    source: Signal::Soft,
                    timestamp_ms: counter,
                    metadata: serde_json::Value::Null,
                }],
                source: Signal::Soft,
            });
            black_box(crs.apply(&snap, &delta).unwrap());
        });
    });
}

criterion_group!(benches, bench_snapshot, bench_apply);
criterion_main!(benches);
