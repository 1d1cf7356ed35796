//! Benchmarks for keyed reconciliation.
//!
//! Run with: cargo bench -p destlist-core

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use destlist_core::reconcile::{Reconciler, reconcile};

struct Row {
    key: Rc<str>,
}

fn key_of(row: &Row) -> Rc<str> {
    Rc::clone(&row.key)
}

fn rows(n: usize, prefix: &str) -> Vec<Rc<Row>> {
    (0..n)
        .map(|i| {
            Rc::new(Row {
                key: Rc::from(format!("{prefix}/{i}")),
            })
        })
        .collect()
}

// ============================================================================
// Unchanged view (fixed point)
// ============================================================================

fn bench_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/unchanged");
    for n in [100, 1_000, 10_000] {
        let next = rows(n, "local");
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &next, |b, next| {
            let mut bound = next.clone();
            b.iter(|| black_box(reconcile(&mut bound, next, key_of)));
        });
    }
    group.finish();
}

// ============================================================================
// Status churn: every other row replaced by a new key
// ============================================================================

fn bench_status_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/status_churn");
    for n in [100, 1_000, 10_000] {
        let previous = rows(n, "local");
        let next: Vec<_> = previous
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if i % 2 == 0 {
                    Rc::clone(row)
                } else {
                    Rc::new(Row {
                        key: Rc::from(format!("{}/offline", row.key)),
                    })
                }
            })
            .collect();

        group.throughput(Throughput::Elements(n as u64));
        for (label, max) in [("splice", usize::MAX), ("rewrite", 0)] {
            let reconciler = Reconciler::new().with_max_shifting_splices(max);
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| {
                    let mut bound = previous.clone();
                    black_box(reconciler.reconcile(&mut bound, &next, key_of))
                });
            });
        }
    }
    group.finish();
}

// ============================================================================
// Reversal (worst case for anchoring)
// ============================================================================

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/reverse");
    for n in [100, 1_000, 10_000] {
        let previous = rows(n, "cookies");
        let next: Vec<_> = previous.iter().rev().cloned().collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut bound = previous.clone();
                black_box(reconcile(&mut bound, &next, key_of))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unchanged, bench_status_churn, bench_reverse);
criterion_main!(benches);
