//! Integration test: queue and stack workloads over a tracked block list.
//!
//! Steady-state FIFO traffic must keep the number of live blocks bounded,
//! and every workload must hand all memory back once the deque is gone.

use corral_deque::{BlockDeque, BlockNode};
use corral_test_utils::{DropLedger, TrackedNodeAllocator, TrackingSource};

type Tracked<T, const SIZE: usize> = BlockDeque<T, SIZE, TrackedNodeAllocator<BlockNode<T, SIZE>>>;

// ── FIFO ─────────────────────────────────────────────────────────

#[test]
fn steady_fifo_keeps_block_count_bounded() {
    let source = TrackingSource::new();
    let mut queue: Tracked<u64, 8> = BlockDeque::new_in(source.node_allocator());
    queue.extend(0..32);

    let mut peak = 0;
    for next in 32..10_000u64 {
        queue.push_back(next);
        assert_eq!(queue.pop_front(), Some(next - 32));
        peak = peak.max(source.live_blocks());
    }
    assert_eq!(queue.len(), 32);
    // 32 live elements span at most five 8-slot blocks.
    assert!(peak <= 5, "peak of {peak} blocks");
    assert_eq!(queue.front(), Some(&(10_000 - 32)));

    drop(queue);
    source.assert_no_leaks();
}

// ── LIFO from either end ─────────────────────────────────────────

#[test]
fn stack_at_front_and_back() {
    let mut deque: BlockDeque<String, 4> = BlockDeque::new();
    for word in ["alpha", "beta", "gamma", "delta", "epsilon"] {
        deque.push_front(word.to_string());
    }
    assert_eq!(deque.pop_front().as_deref(), Some("epsilon"));
    assert_eq!(deque.back().map(String::as_str), Some("alpha"));

    deque.emplace_back(|| "omega".to_string());
    assert_eq!(deque.pop_back().as_deref(), Some("omega"));
    assert_eq!(deque.to_string(), "{ delta, gamma, beta, alpha }");
}

// ── Element lifetimes ────────────────────────────────────────────

#[test]
fn mixed_traffic_drops_each_element_once() {
    let source = TrackingSource::new();
    let ledger = DropLedger::new();
    let mut deque: Tracked<_, 3> = BlockDeque::new_in(source.node_allocator());

    for id in 0..50 {
        if id % 3 == 0 {
            deque.push_front(ledger.counter(id));
        } else {
            deque.push_back(ledger.counter(id));
        }
        if id % 7 == 0 {
            drop(deque.pop_back());
        }
    }
    let popped = ledger.dropped();
    assert_eq!(popped + deque.len(), 50);

    let survivors: Vec<usize> = deque.iter().map(|c| c.id()).collect();
    let copy = deque.clone();
    assert_eq!(copy.iter().map(|c| c.id()).collect::<Vec<_>>(), survivors);

    drop(deque);
    drop(copy);
    assert_eq!(ledger.dropped(), popped + 2 * survivors.len());
    source.assert_no_leaks();
}

#[test]
fn into_iter_from_both_ends_releases_blocks() {
    let source = TrackingSource::new();
    let mut deque: Tracked<u16, 4> = BlockDeque::new_in(source.node_allocator());
    deque.extend(0..10);
    let mut iter = deque.into_iter();
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(9));
    assert_eq!(iter.len(), 8);
    drop(iter);
    source.assert_no_leaks();
}
