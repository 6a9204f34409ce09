//! Integration test: list scenarios under a memory ledger.
//!
//! Each scenario owns a `TrackingSource`; the ledger must be empty once the
//! lists are dropped, and element drops are counted to catch leaks or
//! double drops through cursor edits.

use corral_list::{DList, DNode, SList, SNode};
use corral_test_utils::{DropCounter, DropLedger, TrackedNodeAllocator, TrackingSource};

type TrackedSList<T> = SList<T, TrackedNodeAllocator<SNode<T>>>;
type TrackedDList<T> = DList<T, TrackedNodeAllocator<DNode<T>>>;

// ── Singly-linked ────────────────────────────────────────────────

#[test]
fn slist_cursor_walk_rewrites_every_other_node() {
    let source = TrackingSource::new();
    let ledger = DropLedger::new();
    let mut list: TrackedSList<DropCounter> = SList::new_in(source.node_allocator());
    list.extend((0..6).map(|i| ledger.counter(i)));

    // Drop the successor of every even position: 0, 2, 4 survive.
    let mut cursor = list.cursor_front_mut();
    while !cursor.is_null() {
        drop(cursor.erase_after());
        cursor.move_next();
    }
    assert_eq!(list.to_string(), "{ #0, #2, #4 }");
    assert_eq!(ledger.dropped(), 3);
    assert_eq!(source.live_blocks(), 3);

    drop(list);
    assert_eq!(ledger.dropped(), 6);
    source.assert_no_leaks();
}

#[test]
fn slist_emplace_after_builds_in_order() {
    let mut list: SList<String> = SList::new();
    list.push_front("a".to_string());
    {
        let mut cursor = list.cursor_front_mut();
        for word in ["b", "c", "d"] {
            cursor.emplace_after(|| word.to_string());
            cursor.move_next();
        }
    }
    assert_eq!(list.to_string(), "{ a, b, c, d }");
}

// ── Doubly-linked ────────────────────────────────────────────────

#[test]
fn dlist_cursor_erase_walks_forward() {
    let source = TrackingSource::new();
    let mut list: TrackedDList<u32> = DList::new_in(source.node_allocator());
    list.extend(1..=10);

    let mut cursor = list.cursor_front_mut();
    while !cursor.is_null() {
        let odd = cursor.current().is_some_and(|v| *v % 2 == 1);
        if odd {
            cursor.erase();
        } else {
            cursor.move_next();
        }
    }
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 4, 6, 8, 10]);
    assert_eq!(list.front(), Some(&2));
    assert_eq!(list.back(), Some(&10));

    drop(list);
    source.assert_no_leaks();
}

#[test]
fn dlist_insert_from_back_cursor() {
    let mut list: DList<char> = ['a', 'c'].into();
    let mut cursor = list.cursor_back_mut();
    cursor.insert('b');
    cursor.retreat(2);
    cursor.insert('_');
    assert_eq!(list.to_string(), "{ _, a, b, c }");
    assert_eq!(list.nth(2), Some(&'b'));
}

#[test]
fn dlist_random_access_mutation() {
    let mut list: DList<i64> = (0..20).collect();
    for i in 0..20 {
        if let Some(v) = list.nth_mut(i) {
            *v = -*v;
        }
    }
    assert_eq!(list.iter().sum::<i64>(), -190);
    assert!(list.nth_mut(20).is_none());
}

#[test]
fn moved_from_lists_are_reusable() {
    let source = TrackingSource::new();
    let mut a: TrackedSList<i32> = SList::new_in(source.node_allocator());
    let mut b: TrackedDList<i32> = DList::new_in(source.node_allocator());
    a.extend([1, 2, 3]);
    b.extend([4, 5, 6]);

    let a2 = a.take();
    let b2 = b.take();
    a.push_front(7);
    b.push_back(8);

    assert_eq!(a.to_string(), "{ 7 }");
    assert_eq!(b.to_string(), "{ 8 }");
    assert_eq!(a2.len() + b2.len(), 6);
    assert_eq!(source.live_blocks(), 8);

    drop((a, b, a2, b2));
    source.assert_no_leaks();
}
