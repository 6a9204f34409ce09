//! Criterion micro-benchmarks for linked-list and block-deque operations.

use std::hint::black_box;

use corral_bench::{filled_deque, scrambled_keys};
use corral_deque::BlockDeque;
use corral_list::{DList, SList};
use criterion::{criterion_group, criterion_main, Criterion};

/// Benchmark: push then pop 10K keys at the head of a singly-linked list.
fn bench_slist_push_pop_10k(c: &mut Criterion) {
    let keys = scrambled_keys(10_000, 42);
    c.bench_function("slist_push_pop_10k", |b| {
        b.iter(|| {
            let mut list = SList::new();
            for &key in &keys {
                list.push_front(key);
            }
            let mut sum = 0u64;
            while let Some(key) = list.pop_front() {
                sum = sum.wrapping_add(key);
            }
            black_box(sum);
        });
    });
}

/// Benchmark: insert after every node of a 1K singly-linked list.
fn bench_slist_insert_after_1k(c: &mut Criterion) {
    c.bench_function("slist_insert_after_1k", |b| {
        b.iter(|| {
            let mut list: SList<u64> = (0..1_000).collect();
            let mut cursor = list.cursor_front_mut();
            while !cursor.is_null() {
                cursor.insert_after(0);
                cursor.advance(2);
            }
            black_box(list.len());
        });
    });
}

/// Benchmark: cursor walk erasing every other node of a 10K doubly-linked list.
fn bench_dlist_cursor_erase_10k(c: &mut Criterion) {
    c.bench_function("dlist_cursor_erase_10k", |b| {
        b.iter(|| {
            let mut list: DList<u64> = (0..10_000).collect();
            let mut cursor = list.cursor_front_mut();
            while !cursor.is_null() {
                cursor.erase();
                cursor.move_next();
            }
            black_box(list.len());
        });
    });
}

/// Benchmark: FIFO traffic through a deque at several block sizes.
fn bench_deque_fifo(c: &mut Criterion) {
    fn fifo<const SIZE: usize>() -> u64 {
        let mut deque: BlockDeque<u64, SIZE> = BlockDeque::new();
        let mut sum = 0u64;
        for key in 0..10_000u64 {
            deque.push_back(key);
            if deque.len() > 64 {
                sum = sum.wrapping_add(deque.pop_front().unwrap_or(0));
            }
        }
        sum
    }

    let mut group = c.benchmark_group("deque_fifo_10k");
    group.bench_function("block_4", |b| b.iter(|| black_box(fifo::<4>())));
    group.bench_function("block_16", |b| b.iter(|| black_box(fifo::<16>())));
    group.bench_function("block_64", |b| b.iter(|| black_box(fifo::<64>())));
    group.finish();
}

/// Benchmark: random access into a 10K deque (walks the block list).
fn bench_deque_random_access(c: &mut Criterion) {
    let deque = filled_deque::<16>(10_000, 5);
    let probes: Vec<usize> = scrambled_keys(256, 9)
        .into_iter()
        .map(|k| (k % 10_000) as usize)
        .collect();
    c.bench_function("deque_random_access_256", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &i in &probes {
                sum = sum.wrapping_add(deque[i]);
            }
            black_box(sum);
        });
    });
}

criterion_group!(
    benches,
    bench_slist_push_pop_10k,
    bench_slist_insert_after_1k,
    bench_dlist_cursor_erase_10k,
    bench_deque_fifo,
    bench_deque_random_access
);
criterion_main!(benches);
