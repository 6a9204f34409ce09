//! Test utilities for Corral development.
//!
//! Provides an instrumented [`MemorySource`] ([`TrackingSource`]) that
//! records every live block and can inject allocation failures, and a
//! [`DropLedger`] for checking that containers drop each element exactly
//! once.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use corral_core::{AllocError, MemorySource, StdAllocator, StdNodeAllocator, System};
use indexmap::IndexMap;

/// Contiguous allocator over a [`TrackingSource`].
pub type TrackedAllocator<T> = StdAllocator<T, TrackingSource>;

/// Node allocator over a [`TrackingSource`].
pub type TrackedNodeAllocator<N> = StdNodeAllocator<N, TrackingSource>;

#[derive(Default)]
struct Ledger {
    /// Live blocks keyed by address, in acquisition order.
    live: IndexMap<usize, Layout>,
    acquired: usize,
    released: usize,
    /// Remaining successful acquisitions before failures start.
    budget: Option<usize>,
}

/// A [`MemorySource`] backed by [`System`] that keeps a ledger.
///
/// Every clone shares the same ledger, so a source handed to a container
/// (and to the containers it is copied into) can be inspected afterwards.
///
/// Releasing a block with a layout other than the one it was acquired
/// with panics: it is the sized-deallocation contract every container
/// must honor.
#[derive(Clone, Default)]
pub struct TrackingSource {
    ledger: Rc<RefCell<Ledger>>,
}

impl TrackingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contiguous allocator drawing from this source.
    pub fn allocator<T>(&self) -> TrackedAllocator<T> {
        StdAllocator::with_source(self.clone())
    }

    /// Node allocator drawing from this source.
    pub fn node_allocator<N>(&self) -> TrackedNodeAllocator<N> {
        StdNodeAllocator::with_source(self.clone())
    }

    /// Number of blocks acquired and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.ledger.borrow().live.len()
    }

    /// Total bytes held by live blocks.
    pub fn live_bytes(&self) -> usize {
        self.ledger.borrow().live.values().map(Layout::size).sum()
    }

    /// Successful acquisitions so far.
    pub fn acquired(&self) -> usize {
        self.ledger.borrow().acquired
    }

    /// Releases so far.
    pub fn released(&self) -> usize {
        self.ledger.borrow().released
    }

    /// Allow `successes` more acquisitions, then fail every later one with
    /// [`AllocError::OutOfMemory`].
    pub fn fail_after(&self, successes: usize) {
        self.ledger.borrow_mut().budget = Some(successes);
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        self.ledger.borrow_mut().budget = None;
    }

    /// Panic if any block is still live, listing them oldest first.
    #[track_caller]
    pub fn assert_no_leaks(&self) {
        let ledger = self.ledger.borrow();
        if !ledger.live.is_empty() {
            let blocks: Vec<String> = ledger
                .live
                .iter()
                .map(|(addr, layout)| format!("{addr:#x} ({} bytes)", layout.size()))
                .collect();
            panic!(
                "{} block(s) leaked: {}",
                blocks.len(),
                blocks.join(", ")
            );
        }
    }
}

impl fmt::Debug for TrackingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.ledger.borrow();
        f.debug_struct("TrackingSource")
            .field("live", &ledger.live.len())
            .field("acquired", &ledger.acquired)
            .field("released", &ledger.released)
            .finish()
    }
}

// SAFETY: blocks come from System and are returned to it unchanged.
unsafe impl MemorySource for TrackingSource {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut ledger = self.ledger.borrow_mut();
        if let Some(budget) = ledger.budget.as_mut() {
            if *budget == 0 {
                return Err(AllocError::OutOfMemory { layout });
            }
            *budget -= 1;
        }
        let ptr = System.acquire(layout)?;
        ledger.live.insert(ptr.as_ptr() as usize, layout);
        ledger.acquired += 1;
        Ok(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        let mut ledger = self.ledger.borrow_mut();
        let recorded = ledger.live.shift_remove(&(ptr.as_ptr() as usize));
        assert_eq!(
            recorded,
            Some(layout),
            "release of {ptr:p} does not match its acquisition"
        );
        ledger.released += 1;
        // SAFETY: ptr was acquired from System with this layout (checked above).
        unsafe { System.release(ptr, layout) }
    }
}

/// Shared drop counter handing out [`DropCounter`] values.
#[derive(Clone, Debug, Default)]
pub struct DropLedger {
    drops: Rc<Cell<usize>>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A value tagged `id` whose drop is counted by this ledger.
    pub fn counter(&self, id: usize) -> DropCounter {
        DropCounter {
            id,
            drops: Rc::clone(&self.drops),
        }
    }

    /// Number of counters dropped so far.
    pub fn dropped(&self) -> usize {
        self.drops.get()
    }
}

/// Element type that reports its own drop to a [`DropLedger`].
///
/// Clones share the ledger, so copying a container of counters doubles the
/// number of drops expected.
#[derive(Clone, Debug)]
pub struct DropCounter {
    id: usize,
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl PartialEq for DropCounter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for DropCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
