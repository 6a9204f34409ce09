//! Criterion micro-benchmarks for growable-array growth, erase, and copy.

use std::hint::black_box;

use corral_array::DynArray;
use corral_bench::{erase_windows, filled_array, scrambled_keys, GROWTH_POLICIES};
use corral_core::GrowthPolicy;
use corral_test_utils::TrackingSource;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark: push 10K keys one at a time under each growth policy.
fn bench_push_back_10k(c: &mut Criterion) {
    let keys = scrambled_keys(10_000, 42);
    let mut group = c.benchmark_group("array_push_back_10k");
    for (label, policy) in GROWTH_POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(label), &policy, |b, &policy| {
            b.iter(|| {
                let mut array = DynArray::new();
                array.set_growth_policy(policy);
                for &key in &keys {
                    array.push_back(key);
                }
                black_box(array.len());
            });
        });
    }
    group.finish();
}

/// Benchmark: buffers acquired while growing to 10K under each policy.
///
/// Runs the same workload against a tracking source so the report shows the
/// allocation count that drives each policy's cost.
fn bench_growth_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_growth_events_10k");
    for (label, policy) in GROWTH_POLICIES {
        group.bench_function(label, |b| {
            b.iter(|| {
                let source = TrackingSource::new();
                let mut array = DynArray::new_in(source.allocator());
                array.set_growth_policy(policy);
                for key in 0..10_000u64 {
                    array.push_back(key);
                }
                drop(array);
                black_box(source.acquired());
            });
        });
    }
    group.finish();
}

/// Benchmark: reserve up front, then push 10K keys.
fn bench_reserved_push_10k(c: &mut Criterion) {
    let keys = scrambled_keys(10_000, 42);
    c.bench_function("array_reserved_push_10k", |b| {
        b.iter(|| {
            let mut array = DynArray::with_capacity(keys.len());
            for &key in &keys {
                array.push_back(key);
            }
            black_box(array.capacity());
        });
    });
}

/// Benchmark: erase 64-element windows from a 10K array, restoring it each round.
fn bench_erase_windows(c: &mut Criterion) {
    let base = filled_array(GrowthPolicy::Double, 10_000, 7);
    let windows = erase_windows(base.len(), 64, 16, 11);
    c.bench_function("array_erase_64_x16", |b| {
        b.iter(|| {
            let mut array = base.clone();
            for window in &windows {
                let window = window.start.min(array.len())..window.end.min(array.len());
                array.erase(window);
            }
            black_box(array.len());
        });
    });
}

/// Benchmark: element-wise clone of a 10K array.
fn bench_clone_10k(c: &mut Criterion) {
    let base = filled_array(GrowthPolicy::Double, 10_000, 3);
    c.bench_function("array_clone_10k", |b| {
        b.iter(|| black_box(base.clone()));
    });
}

criterion_group!(
    benches,
    bench_push_back_10k,
    bench_growth_events,
    bench_reserved_push_10k,
    bench_erase_windows,
    bench_clone_10k
);
criterion_main!(benches);
