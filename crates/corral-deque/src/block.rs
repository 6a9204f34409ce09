//! Fixed-capacity storage blocks.

use std::mem::MaybeUninit;
use std::ops::Range;
use std::ptr;
use std::slice;

use corral_list::DNode;

/// List node carrying one deque block.
pub type BlockNode<T, const SIZE: usize> = DNode<Block<T, SIZE>>;

/// A run of `SIZE` slots, each live or uninitialized.
///
/// The block never tracks which slots are live; the owning deque derives
/// that from its count and offset. Dropping a block drops nothing.
pub struct Block<T, const SIZE: usize> {
    slots: [MaybeUninit<T>; SIZE],
}

impl<T, const SIZE: usize> Block<T, SIZE> {
    /// Number of slots per block.
    pub const CAPACITY: usize = SIZE;

    pub(crate) const fn new() -> Self {
        Self {
            slots: [const { MaybeUninit::uninit() }; SIZE],
        }
    }

    /// Store `value` at `index`, overwriting (not dropping) the slot.
    pub(crate) fn write(&mut self, index: usize, value: T) -> &mut T {
        self.slots[index].write(value)
    }

    /// Move the value out of `index`, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// Slot `index` must be live; it is dead afterwards.
    pub(crate) unsafe fn take(&mut self, index: usize) -> T {
        // SAFETY: the slot is live (caller contract).
        unsafe { self.slots[index].assume_init_read() }
    }

    /// # Safety
    ///
    /// Slot `index` must be live.
    pub(crate) unsafe fn get(&self, index: usize) -> &T {
        // SAFETY: the slot is live (caller contract).
        unsafe { self.slots[index].assume_init_ref() }
    }

    /// # Safety
    ///
    /// Slot `index` must be live.
    pub(crate) unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: the slot is live (caller contract).
        unsafe { self.slots[index].assume_init_mut() }
    }

    /// # Safety
    ///
    /// Every slot in `range` must be live.
    pub(crate) unsafe fn slice(&self, range: Range<usize>) -> &[T] {
        let slots = &self.slots[range];
        // SAFETY: MaybeUninit<T> has T's layout and the slots are live.
        unsafe { slice::from_raw_parts(slots.as_ptr().cast::<T>(), slots.len()) }
    }

    /// # Safety
    ///
    /// Every slot in `range` must be live.
    pub(crate) unsafe fn slice_mut(&mut self, range: Range<usize>) -> &mut [T] {
        let slots = &mut self.slots[range];
        // SAFETY: MaybeUninit<T> has T's layout and the slots are live.
        unsafe { slice::from_raw_parts_mut(slots.as_mut_ptr().cast::<T>(), slots.len()) }
    }

    /// Drop every value in `range`, leaving the slots uninitialized.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must be live; they are dead afterwards.
    pub(crate) unsafe fn drop_range(&mut self, range: Range<usize>) {
        // SAFETY: forwarded caller contract.
        unsafe { ptr::drop_in_place(self.slice_mut(range)) }
    }
}

/// Live slot range of the `k`-th block (from the front) of a deque whose
/// live elements occupy global slots `[offset, end)`.
pub(crate) fn live_range<const SIZE: usize>(k: usize, offset: usize, end: usize) -> Range<usize> {
    let start = if k == 0 { offset } else { 0 };
    let stop = end.saturating_sub(k * SIZE).min(SIZE);
    start..stop.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_test_utils::{DropCounter, DropLedger};

    #[test]
    fn write_take_round() {
        let mut block: Block<String, 4> = Block::new();
        block.write(2, "two".to_string()).push('!');
        // SAFETY: slot 2 was written above and is taken once.
        let value = unsafe {
            assert_eq!(block.get(2), "two!");
            block.take(2)
        };
        assert_eq!(value, "two!");
    }

    #[test]
    fn dropping_a_block_leaves_slots_to_the_owner() {
        let ledger = DropLedger::new();
        let mut block: Block<DropCounter, 2> = Block::new();
        block.write(0, ledger.counter(0));
        block.write(1, ledger.counter(1));
        // SAFETY: slot 0 is live and moved out once.
        let first = unsafe { block.take(0) };
        // SAFETY: only slot 1 is still live.
        unsafe { block.drop_range(1..2) };
        assert_eq!(ledger.dropped(), 1);
        drop(block);
        assert_eq!(ledger.dropped(), 1);
        drop(first);
        assert_eq!(ledger.dropped(), 2);
    }

    #[test]
    fn live_ranges_cover_offset_window() {
        // SIZE 4, offset 3, 6 live elements: slots 3 | 0..4 | 0..1.
        assert_eq!(live_range::<4>(0, 3, 9), 3..4);
        assert_eq!(live_range::<4>(1, 3, 9), 0..4);
        assert_eq!(live_range::<4>(2, 3, 9), 0..1);
    }

    #[test]
    fn live_range_within_single_block() {
        assert_eq!(live_range::<8>(0, 2, 5), 2..5);
    }
}
