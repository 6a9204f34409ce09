//! The [`BlockDeque`] container.

use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ops::{Index, IndexMut};
use std::slice;

use corral_core::{fmt_sequence, AllocError, NodeAllocator, StdNodeAllocator};
use corral_list::{dlist, DList};

use crate::block::{live_range, Block, BlockNode};

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// A double-ended queue stored as a doubly-linked list of fixed-size
/// blocks.
///
/// Global index `i` lives in block `(offset + i) / SIZE` at slot
/// `(offset + i) % SIZE`, where `offset < SIZE` is the first live slot of
/// the front block. A block is only released from the end it empties at,
/// and the last block is released as soon as the deque becomes empty.
///
/// `SIZE` defaults to [`DEFAULT_BLOCK_SIZE`]; a zero block size is a
/// compile-time error.
pub struct BlockDeque<
    T,
    const SIZE: usize = 16,
    A: NodeAllocator<BlockNode<T, SIZE>> = StdNodeAllocator<BlockNode<T, SIZE>>,
> {
    blocks: DList<Block<T, SIZE>, A>,
    len: usize,
    offset: usize,
}

impl<T, const SIZE: usize> BlockDeque<T, SIZE> {
    /// Create an empty deque. No block is allocated until the first push.
    pub fn new() -> Self {
        Self::new_in(StdNodeAllocator::new())
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> BlockDeque<T, SIZE, A> {
    const NONZERO_BLOCK_SIZE: () = assert!(SIZE > 0, "deque block size must be non-zero");

    /// Create an empty deque drawing blocks from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_BLOCK_SIZE;
        Self {
            blocks: DList::new_in(alloc),
            len: 0,
            offset: 0,
        }
    }

    /// The allocator backing the block list.
    pub fn allocator(&self) -> &A {
        self.blocks.allocator()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the deque is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of blocks currently held.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Checked access: `None` when `index >= len`.
    pub fn at(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let slot = self.offset + index;
        let block = self.blocks.nth(slot / SIZE)?;
        // SAFETY: index < len, so the slot is inside the live window.
        Some(unsafe { block.get(slot % SIZE) })
    }

    /// Checked mutable access: `None` when `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.offset + index;
        let block = self.blocks.nth_mut(slot / SIZE)?;
        // SAFETY: index < len, so the slot is inside the live window.
        Some(unsafe { block.get_mut(slot % SIZE) })
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        let block = self.blocks.front()?;
        // SAFETY: a front block exists only while the deque is non-empty, and
        // `offset` is its first live slot.
        Some(unsafe { block.get(self.offset) })
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        let block = self.blocks.back()?;
        // SAFETY: a back block exists only while the deque is non-empty.
        Some(unsafe { block.get(self.back_slot()) })
    }

    /// Mutable first element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let offset = self.offset;
        let block = self.blocks.front_mut()?;
        // SAFETY: as for `front`.
        Some(unsafe { block.get_mut(offset) })
    }

    /// Mutable last element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let slot = self.back_slot();
        let block = self.blocks.back_mut()?;
        // SAFETY: as for `back`.
        Some(unsafe { block.get_mut(slot) })
    }

    /// Prepend `value`. Returns the stored element.
    pub fn push_front(&mut self, value: T) -> &mut T {
        match self.try_push_front(value) {
            Ok(stored) => stored,
            Err(e) => e.handle(),
        }
    }

    /// Prepend `value`. On failure the deque is unchanged and `value` dropped.
    pub fn try_push_front(&mut self, value: T) -> Result<&mut T, AllocError> {
        if self.blocks.is_empty() || self.offset == 0 {
            self.blocks.try_push_front(Block::new())?;
            tracing::trace!(block_size = SIZE, blocks = self.blocks.len(), "acquired front block");
            self.offset = SIZE - 1;
        } else {
            self.offset -= 1;
        }
        self.len += 1;
        let offset = self.offset;
        let block = self
            .blocks
            .front_mut()
            .expect("front block exists after reserving a front slot");
        Ok(block.write(offset, value))
    }

    /// Prepend the value produced by `make`.
    pub fn emplace_front<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.push_front(make())
    }

    /// Append `value`. Returns the stored element.
    pub fn push_back(&mut self, value: T) -> &mut T {
        match self.try_push_back(value) {
            Ok(stored) => stored,
            Err(e) => e.handle(),
        }
    }

    /// Append `value`. On failure the deque is unchanged and `value` dropped.
    ///
    /// The first element of an empty deque goes through the front path, so
    /// it lands in the last slot of a fresh block.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, AllocError> {
        if self.len == 0 {
            return self.try_push_front(value);
        }
        let slot = (self.offset + self.len) % SIZE;
        if slot == 0 {
            self.blocks.try_push_back(Block::new())?;
            tracing::trace!(block_size = SIZE, blocks = self.blocks.len(), "acquired back block");
        }
        self.len += 1;
        let block = self
            .blocks
            .back_mut()
            .expect("back block exists after reserving a back slot");
        Ok(block.write(slot, value))
    }

    /// Append the value produced by `make`.
    pub fn emplace_back<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.push_back(make())
    }

    /// Remove and return the first element; `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let offset = self.offset;
        let block = self.blocks.front_mut()?;
        // SAFETY: `offset` is the first live slot; it leaves the live window
        // below.
        let value = unsafe { block.take(offset) };
        self.len -= 1;
        if self.len == 0 {
            self.release_blocks();
        } else if offset == SIZE - 1 {
            self.blocks.pop_front();
            tracing::trace!(block_size = SIZE, blocks = self.blocks.len(), "released front block");
            self.offset = 0;
        } else {
            self.offset += 1;
        }
        Some(value)
    }

    /// Remove and return the last element; `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.back_slot();
        let block = self.blocks.back_mut()?;
        // SAFETY: `slot` is the last live slot; it leaves the live window
        // below.
        let value = unsafe { block.take(slot) };
        self.len -= 1;
        if self.len == 0 {
            self.release_blocks();
        } else if slot == 0 {
            self.blocks.pop_back();
            tracing::trace!(block_size = SIZE, blocks = self.blocks.len(), "released back block");
        }
        Some(value)
    }

    /// Drop every element and release every block.
    pub fn clear(&mut self) {
        let offset = mem::take(&mut self.offset);
        let end = offset + mem::take(&mut self.len);
        for (k, block) in self.blocks.iter_mut().enumerate() {
            // SAFETY: `live_range` yields exactly the live slots of block `k`,
            // and the count is already zero so none is visited again.
            unsafe { block.drop_range(live_range::<SIZE>(k, offset, end)) };
        }
        self.release_blocks();
    }

    /// Iterate front to back (or back to front with `.rev()`).
    pub fn iter(&self) -> Iter<'_, T, SIZE> {
        Iter {
            front_block: 0,
            back_block: self.blocks.len(),
            blocks: self.blocks.iter(),
            front: Default::default(),
            back: Default::default(),
            offset: self.offset,
            end: self.offset + self.len,
            remaining: self.len,
        }
    }

    /// Iterate with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, SIZE> {
        IterMut {
            front_block: 0,
            back_block: self.blocks.len(),
            blocks: self.blocks.iter_mut(),
            front: Default::default(),
            back: Default::default(),
            offset: self.offset,
            end: self.offset + self.len,
            remaining: self.len,
        }
    }

    /// Move the contents out, leaving `self` empty with no blocks.
    pub fn take(&mut self) -> Self {
        Self {
            blocks: self.blocks.take(),
            len: mem::take(&mut self.len),
            offset: mem::take(&mut self.offset),
        }
    }

    /// Slot of the last live element inside the back block.
    fn back_slot(&self) -> usize {
        (self.offset + self.len.saturating_sub(1)) % SIZE
    }

    /// Release every block; the deque must hold no live elements.
    fn release_blocks(&mut self) {
        let released = self.blocks.len();
        self.blocks.clear();
        self.offset = 0;
        if released > 0 {
            tracing::trace!(block_size = SIZE, released, "released all blocks");
        }
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Drop for BlockDeque<T, SIZE, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const SIZE: usize, A> Default for BlockDeque<T, SIZE, A>
where
    A: NodeAllocator<BlockNode<T, SIZE>> + Default,
{
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Clone
    for BlockDeque<T, SIZE, A>
{
    fn clone(&self) -> Self {
        let mut copy = Self::new_in(self.allocator().detached());
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Index<usize>
    for BlockDeque<T, SIZE, A>
{
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len;
        self.at(index)
            .unwrap_or_else(|| panic!("index {index} out of range for deque of length {len}"))
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> IndexMut<usize>
    for BlockDeque<T, SIZE, A>
{
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        self.at_mut(index)
            .unwrap_or_else(|| panic!("index {index} out of range for deque of length {len}"))
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Extend<T>
    for BlockDeque<T, SIZE, A>
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, const SIZE: usize, A> FromIterator<T> for BlockDeque<T, SIZE, A>
where
    A: NodeAllocator<BlockNode<T, SIZE>> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::default();
        deque.extend(iter);
        deque
    }
}

impl<T, const SIZE: usize, const N: usize> From<[T; N]> for BlockDeque<T, SIZE> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: fmt::Debug, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> fmt::Debug
    for BlockDeque<T, SIZE, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> fmt::Display
    for BlockDeque<T, SIZE, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_sequence(f, self.iter())
    }
}

impl<T, const SIZE: usize, const OTHER: usize, A, B> PartialEq<BlockDeque<T, OTHER, B>>
    for BlockDeque<T, SIZE, A>
where
    T: PartialEq,
    A: NodeAllocator<BlockNode<T, SIZE>>,
    B: NodeAllocator<BlockNode<T, OTHER>>,
{
    fn eq(&self, other: &BlockDeque<T, OTHER, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Eq for BlockDeque<T, SIZE, A> {}

impl<'a, T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> IntoIterator
    for &'a BlockDeque<T, SIZE, A>
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> IntoIterator
    for &'a mut BlockDeque<T, SIZE, A>
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> IntoIterator
    for BlockDeque<T, SIZE, A>
{
    type Item = T;
    type IntoIter = IntoIter<T, SIZE, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

/// Borrowing double-ended iterator over a [`BlockDeque`].
///
/// Walks the block list from both ends, yielding each block's live slots
/// as a slice.
pub struct Iter<'a, T, const SIZE: usize> {
    blocks: dlist::Iter<'a, Block<T, SIZE>>,
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
    front_block: usize,
    back_block: usize,
    offset: usize,
    end: usize,
    remaining: usize,
}

impl<'a, T, const SIZE: usize> Iterator for Iter<'a, T, SIZE> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.front.next() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.blocks.next() {
                Some(block) => {
                    let range = live_range::<SIZE>(self.front_block, self.offset, self.end);
                    self.front_block += 1;
                    // SAFETY: `range` is exactly the live slots of this block.
                    self.front = unsafe { block.slice(range) }.iter();
                }
                None => {
                    let item = self.back.next()?;
                    self.remaining -= 1;
                    return Some(item);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, const SIZE: usize> DoubleEndedIterator for Iter<'a, T, SIZE> {
    fn next_back(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.back.next_back() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.blocks.next_back() {
                Some(block) => {
                    self.back_block -= 1;
                    let range = live_range::<SIZE>(self.back_block, self.offset, self.end);
                    // SAFETY: `range` is exactly the live slots of this block.
                    self.back = unsafe { block.slice(range) }.iter();
                }
                None => {
                    let item = self.front.next_back()?;
                    self.remaining -= 1;
                    return Some(item);
                }
            }
        }
    }
}

impl<T, const SIZE: usize> ExactSizeIterator for Iter<'_, T, SIZE> {}

impl<T, const SIZE: usize> FusedIterator for Iter<'_, T, SIZE> {}

/// Mutably borrowing double-ended iterator over a [`BlockDeque`].
pub struct IterMut<'a, T, const SIZE: usize> {
    blocks: dlist::IterMut<'a, Block<T, SIZE>>,
    front: slice::IterMut<'a, T>,
    back: slice::IterMut<'a, T>,
    front_block: usize,
    back_block: usize,
    offset: usize,
    end: usize,
    remaining: usize,
}

impl<'a, T, const SIZE: usize> Iterator for IterMut<'a, T, SIZE> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        loop {
            if let Some(item) = self.front.next() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.blocks.next() {
                Some(block) => {
                    let range = live_range::<SIZE>(self.front_block, self.offset, self.end);
                    self.front_block += 1;
                    // SAFETY: `range` is exactly the live slots of this block.
                    self.front = unsafe { block.slice_mut(range) }.iter_mut();
                }
                None => {
                    let item = self.back.next()?;
                    self.remaining -= 1;
                    return Some(item);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, const SIZE: usize> DoubleEndedIterator for IterMut<'a, T, SIZE> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        loop {
            if let Some(item) = self.back.next_back() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.blocks.next_back() {
                Some(block) => {
                    self.back_block -= 1;
                    let range = live_range::<SIZE>(self.back_block, self.offset, self.end);
                    // SAFETY: `range` is exactly the live slots of this block.
                    self.back = unsafe { block.slice_mut(range) }.iter_mut();
                }
                None => {
                    let item = self.front.next_back()?;
                    self.remaining -= 1;
                    return Some(item);
                }
            }
        }
    }
}

impl<T, const SIZE: usize> ExactSizeIterator for IterMut<'_, T, SIZE> {}

impl<T, const SIZE: usize> FusedIterator for IterMut<'_, T, SIZE> {}

/// Owning double-ended iterator over a [`BlockDeque`].
pub struct IntoIter<
    T,
    const SIZE: usize = 16,
    A: NodeAllocator<BlockNode<T, SIZE>> = StdNodeAllocator<BlockNode<T, SIZE>>,
> {
    deque: BlockDeque<T, SIZE, A>,
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> Iterator for IntoIter<T, SIZE, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len, Some(self.deque.len))
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> DoubleEndedIterator
    for IntoIter<T, SIZE, A>
{
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> ExactSizeIterator
    for IntoIter<T, SIZE, A>
{
}

impl<T, const SIZE: usize, A: NodeAllocator<BlockNode<T, SIZE>>> FusedIterator
    for IntoIter<T, SIZE, A>
{
}
