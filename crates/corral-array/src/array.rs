//! The [`DynArray`] container.

use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Bound, Deref, DerefMut, Index, IndexMut, Range, RangeBounds};
use std::ptr::{self, NonNull};
use std::slice::{self, SliceIndex};

use corral_core::{
    fmt_sequence, AllocError, ArrayConfig, ConfigError, ContiguousAllocator, GrowthPolicy,
    StdAllocator,
};

use crate::iter::IntoIter;

/// A growable contiguous array.
///
/// Elements `[0, len)` are live; `[len, capacity)` is allocated but
/// uninitialized. The buffer is owned through the allocator's resource
/// slot and released when the array is dropped.
pub struct DynArray<T, A: ContiguousAllocator<T> = StdAllocator<T>> {
    alloc: A,
    len: usize,
    capacity: usize,
    growth: GrowthPolicy,
    _marker: PhantomData<T>,
}

impl<T> DynArray<T> {
    /// Create an empty array. No storage is allocated until the first append.
    pub const fn new() -> Self {
        Self {
            alloc: StdAllocator::new(),
            len: 0,
            capacity: 0,
            growth: ArrayConfig::DEFAULT_GROWTH,
            _marker: PhantomData,
        }
    }

    /// Create an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, StdAllocator::new())
    }

    /// Create an empty array from a validated [`ArrayConfig`].
    pub fn with_config(config: ArrayConfig) -> Result<Self, ConfigError> {
        Self::with_config_in(config, StdAllocator::new())
    }
}

impl<T, A: ContiguousAllocator<T>> DynArray<T, A> {
    /// Create an empty array drawing storage from `alloc`.
    ///
    /// Any resource already recorded in `alloc` is ignored and replaced.
    pub fn new_in(mut alloc: A) -> Self {
        alloc.set_resource(None);
        Self {
            alloc,
            len: 0,
            capacity: 0,
            growth: ArrayConfig::DEFAULT_GROWTH,
            _marker: PhantomData,
        }
    }

    /// Create an empty array with room for `capacity` elements.
    ///
    /// Allocation failure is fatal; see [`try_with_capacity_in`](Self::try_with_capacity_in).
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_with_capacity_in(capacity, alloc).unwrap_or_else(|e| e.handle())
    }

    /// Create an empty array with room for `capacity` elements.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::new_in(alloc);
        array.try_reserve(capacity)?;
        Ok(array)
    }

    /// Create an empty array from a validated [`ArrayConfig`].
    ///
    /// Returns the validation error, if any, before touching the allocator.
    /// Allocation failure for the initial capacity is fatal.
    pub fn with_config_in(config: ArrayConfig, alloc: A) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut array = Self::with_capacity_in(config.initial_capacity, alloc);
        array.growth = config.growth;
        Ok(array)
    }

    /// The allocator backing this array.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Policy applied at the next growth event.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Replace the growth policy. Takes effect at the next growth event;
    /// the current capacity is left alone.
    pub fn set_growth_policy(&mut self, policy: GrowthPolicy) {
        self.growth = policy;
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the live elements in bytes.
    pub fn bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    /// Raw pointer to the buffer (dangling when nothing is allocated).
    pub fn as_ptr(&self) -> *const T {
        self.buffer().as_ptr()
    }

    /// Mutable raw pointer to the buffer (dangling when nothing is allocated).
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer().as_ptr()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is initialized; the pointer is non-null and aligned
        // even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Checked access: `None` when `index >= len`.
    pub fn at(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Checked mutable access: `None` when `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Unchecked access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of range for length {}", self.len);
        // SAFETY: index < len (caller contract).
        unsafe { &*self.as_ptr().add(index) }
    }

    /// Unchecked mutable access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} out of range for length {}", self.len);
        // SAFETY: index < len (caller contract).
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Mutable first element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Mutable last element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Append `value`, growing if full. Returns the stored element.
    ///
    /// Allocation failure is fatal; see [`try_push_back`](Self::try_push_back).
    pub fn push_back(&mut self, value: T) -> &mut T {
        if self.len == self.capacity {
            if let Err(e) = self.grow() {
                e.handle();
            }
        }
        // SAFETY: len < capacity after the growth check.
        unsafe { self.construct_at_end(value) }
    }

    /// Append `value`, growing if full.
    ///
    /// On failure the array is unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, AllocError> {
        if self.len == self.capacity {
            self.grow()?;
        }
        // SAFETY: len < capacity after the growth check.
        Ok(unsafe { self.construct_at_end(value) })
    }

    /// Append the value produced by `make`, acquiring the slot first.
    ///
    /// Storage is secured before `make` runs, so a constructor is never
    /// invoked for a value that could not be stored.
    pub fn emplace_back<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if self.len == self.capacity {
            if let Err(e) = self.grow() {
                e.handle();
            }
        }
        let value = make();
        // SAFETY: len < capacity; `make` cannot observe or change the array.
        unsafe { self.construct_at_end(value) }
    }

    /// Remove and return the last element; `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range, so it
        // is read exactly once.
        Some(unsafe { self.as_ptr().add(self.len).read() })
    }

    /// Ensure the capacity is at least `capacity` (an absolute count, not an
    /// increment).
    ///
    /// Allocation failure is fatal; see [`try_reserve`](Self::try_reserve).
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(e) = self.try_reserve(capacity) {
            e.handle();
        }
    }

    /// Ensure the capacity is at least `capacity`.
    ///
    /// On failure the array is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.capacity {
            return Ok(());
        }
        tracing::trace!(
            old_capacity = self.capacity,
            new_capacity = capacity,
            len = self.len,
            "reserving array storage"
        );
        self.relocate(capacity)
    }

    /// Shrink the buffer to exactly `len` elements. An empty array releases
    /// its buffer entirely.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity == self.len {
            return;
        }
        tracing::trace!(
            old_capacity = self.capacity,
            new_capacity = self.len,
            "shrinking array storage"
        );
        if let Err(e) = self.relocate(self.len) {
            e.handle();
        }
    }

    /// Drop the elements in `range` and close the gap, preserving the order
    /// of the survivors.
    ///
    /// Unbounded ends default to the start and end of the array. A range
    /// starting at `len` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the range starts after `len`, ends before it starts, or
    /// ends past `len`.
    pub fn erase<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        let Range { start, end } = bounds_to_range(range, self.len);
        if start == self.len {
            return;
        }
        assert!(
            start <= end && end <= self.len,
            "erase range {start}..{end} out of bounds for length {}",
            self.len
        );
        if start == end {
            return;
        }

        let tail = self.len - end;
        // Elements past `start` are unreachable through `self` while the
        // range is dropped, so a panicking destructor leaks instead of
        // double-dropping.
        self.len = start;
        let base = self.as_mut_ptr();
        // SAFETY: [start, end) are live and dropped exactly once; [end, end+tail)
        // are live and moved down into the hole by `condense`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), end - start));
            self.condense(start, end, tail);
        }
        self.len = start + tail;
    }

    /// Drop every element. Capacity is retained.
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: [0, len) were live and are no longer reachable.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), len)) }
    }

    /// Replace the contents with `items`, reusing the buffer when it is
    /// large enough.
    pub fn assign<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(items);
    }

    /// Move the contents out, leaving `self` empty with no storage.
    ///
    /// The returned array owns the buffer and keeps the growth policy; the
    /// source gets a detached allocator handle over the same memory source.
    pub fn take(&mut self) -> Self {
        let fresh = self.alloc.detached();
        let alloc = mem::replace(&mut self.alloc, fresh);
        Self {
            alloc,
            len: mem::take(&mut self.len),
            capacity: mem::take(&mut self.capacity),
            growth: self.growth,
            _marker: PhantomData,
        }
    }

    /// Split into raw parts for [`IntoIter`].
    pub(crate) fn into_raw_parts(self) -> (A, usize, usize) {
        let me = ManuallyDrop::new(self);
        // SAFETY: `me` is never used or dropped again, so the allocator is
        // moved out exactly once.
        let alloc = unsafe { ptr::read(&me.alloc) };
        (alloc, me.len, me.capacity)
    }

    fn buffer(&self) -> NonNull<T> {
        self.alloc.resource().unwrap_or(NonNull::dangling())
    }

    /// Construct `value` at index `len` and bump `len`.
    ///
    /// # Safety
    ///
    /// `len < capacity`.
    unsafe fn construct_at_end(&mut self, value: T) -> &mut T {
        debug_assert!(self.len < self.capacity);
        // SAFETY: slot `len` is allocated and uninitialized (caller contract).
        unsafe {
            let slot = self.buffer().add(self.len);
            self.alloc.construct(slot, value);
            self.len += 1;
            &mut *slot.as_ptr()
        }
    }

    /// Make room for `additional` more elements in one relocation, never
    /// growing by less than the policy's next step.
    fn try_reserve_for(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        if required <= self.capacity {
            return Ok(());
        }
        let stepped = self.growth.next_capacity(self.capacity).unwrap_or(required);
        self.try_reserve(required.max(stepped))
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let new_capacity = self
            .growth
            .next_capacity(self.capacity)
            .ok_or(AllocError::CapacityOverflow)?;
        tracing::trace!(
            old_capacity = self.capacity,
            new_capacity,
            len = self.len,
            policy = ?self.growth,
            "growing array"
        );
        self.relocate(new_capacity)
    }

    /// Move the live elements into a buffer of exactly `new_capacity`.
    ///
    /// The new buffer is fully populated before the old one is released, so
    /// an allocation failure leaves the array untouched.
    fn relocate(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        debug_assert!(new_capacity >= self.len);
        let fresh = if new_capacity == 0 {
            None
        } else {
            Some(self.alloc.allocate(new_capacity)?)
        };

        if let Some(old) = self.alloc.resource() {
            if let Some(fresh) = fresh {
                for i in 0..self.len {
                    // SAFETY: old[i] is live and read once (the move leaves the
                    // old slot logically destroyed); fresh[i] is uninitialized.
                    unsafe {
                        let value = old.add(i).read();
                        self.alloc.construct(fresh.add(i), value);
                    }
                }
            }
            // SAFETY: `old` was allocated with the current capacity.
            unsafe { self.alloc.deallocate(old, self.capacity) };
        }

        self.alloc.set_resource(fresh);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Close the hole `[hole, src)` by moving `count` elements starting at
    /// `src` down one at a time.
    ///
    /// # Safety
    ///
    /// `[hole, src)` must be dead slots and `[src, src + count)` live ones,
    /// all inside the buffer.
    unsafe fn condense(&mut self, hole: usize, src: usize, count: usize) {
        let base = self.buffer();
        for i in 0..count {
            // SAFETY: the destination is either part of the original hole or a
            // slot vacated on a previous iteration; the source is live and read
            // once. Destinations always precede sources.
            unsafe {
                let value = base.add(src + i).read();
                self.alloc.construct(base.add(hole + i), value);
            }
        }
    }
}

fn bounds_to_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&i) => i.saturating_add(1),
        Bound::Excluded(&i) => i,
        Bound::Unbounded => len,
    };
    start..end
}

impl<T, A: ContiguousAllocator<T>> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        self.clear();
        if let Some(buffer) = self.alloc.resource() {
            // SAFETY: the buffer was allocated with the current capacity and
            // holds no live elements after `clear`.
            unsafe { self.alloc.deallocate(buffer, self.capacity) };
            self.alloc.set_resource(None);
        }
    }
}

impl<T, A: ContiguousAllocator<T> + Default> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: ContiguousAllocator<T>> Clone for DynArray<T, A> {
    /// Element-wise copy into freshly allocated storage from the same source.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_in(self.len, self.alloc.detached());
        copy.growth = self.growth;
        for item in self.iter() {
            copy.push_back(item.clone());
        }
        copy
    }
}

impl<T, A: ContiguousAllocator<T>> Deref for DynArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: ContiguousAllocator<T>> DerefMut for DynArray<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, A: ContiguousAllocator<T>> Index<I> for DynArray<T, A> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: ContiguousAllocator<T>> IndexMut<I> for DynArray<T, A> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug, A: ContiguousAllocator<T>> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, A: ContiguousAllocator<T>> fmt::Display for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_sequence(f, self.iter())
    }
}

impl<T, U, A, B> PartialEq<DynArray<U, B>> for DynArray<T, A>
where
    T: PartialEq<U>,
    A: ContiguousAllocator<T>,
    B: ContiguousAllocator<U>,
{
    fn eq(&self, other: &DynArray<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: ContiguousAllocator<T>> Eq for DynArray<T, A> {}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for DynArray<T, A>
where
    T: PartialEq<U>,
    A: ContiguousAllocator<T>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, A: ContiguousAllocator<T>> Extend<T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(e) = self.try_reserve_for(lower) {
            e.handle();
        }
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T, A: ContiguousAllocator<T> + Default> FromIterator<T> for DynArray<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::default();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    /// Allocates exactly `N` slots and moves the elements in.
    fn from(items: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        array.extend(items);
        array
    }
}

impl<'a, T, A: ContiguousAllocator<T>> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: ContiguousAllocator<T>> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: ContiguousAllocator<T>> IntoIterator for DynArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
