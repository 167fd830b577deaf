//! Benchmark: snap-point consolidation and lookup.
//!
//! Run with: `cargo bench -p glide-core --bench consolidation_bench`
//!
//! Measures a full consolidation pass over mixed mandatory/optional
//! declarations (the cost paid on every declaration or viewport change)
//! and the per-dispatch cost of snapping a target value.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glide_core::snap::{SnapPoint, SnapPointSet, SnapPointsAlignment};

fn declarations(count: usize) -> Vec<SnapPoint> {
    (0..count)
        .map(|i| {
            let point = SnapPoint::irregular(((i * 7919) % (count * 10)) as f64);
            match i % 3 {
                0 => point,
                1 => point.optional(25.0),
                _ => point.aligned(SnapPointsAlignment::Center),
            }
        })
        .collect()
}

fn bench_consolidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap/consolidate");
    for count in [16usize, 128, 1024] {
        let points = declarations(count);
        group.bench_function(format!("{count}_points"), |b| {
            b.iter(|| SnapPointSet::consolidate(black_box(&points), 300.0))
        });
    }
    group.finish();
}

fn bench_value_after_snap_points(c: &mut Criterion) {
    let points = declarations(1024);
    let Ok(set) = SnapPointSet::consolidate(&points, 300.0) else {
        return;
    };
    c.bench_function("snap/value_after_snap_points", |b| {
        let mut probe = 0.0;
        b.iter(|| {
            probe = (probe + 37.5) % 10_240.0;
            black_box(set.value_after_snap_points(black_box(probe)))
        })
    });
}

criterion_group!(benches, bench_consolidate, bench_value_after_snap_points);
criterion_main!(benches);
