//! By-value iteration over a [`DynArray`].

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use corral_core::{ContiguousAllocator, StdAllocator};

use crate::array::DynArray;

/// Owning iterator returned by `DynArray::into_iter`.
///
/// Elements in `[front, back)` are still live. Whatever is not yielded is
/// dropped with the iterator, which then releases the buffer.
pub struct IntoIter<T, A: ContiguousAllocator<T> = StdAllocator<T>> {
    alloc: A,
    capacity: usize,
    front: usize,
    back: usize,
    _marker: PhantomData<T>,
}

impl<T, A: ContiguousAllocator<T>> IntoIter<T, A> {
    pub(crate) fn new(array: DynArray<T, A>) -> Self {
        let (alloc, len, capacity) = array.into_raw_parts();
        Self {
            alloc,
            capacity,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [front, back) is live.
        unsafe {
            slice::from_raw_parts(self.base().as_ptr().add(self.front), self.back - self.front)
        }
    }

    fn base(&self) -> NonNull<T> {
        self.alloc.resource().unwrap_or(NonNull::dangling())
    }
}

impl<T, A: ContiguousAllocator<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: `index` was live and is now outside [front, back).
        Some(unsafe { self.base().add(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: ContiguousAllocator<T>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: `back` was live and is now outside [front, back).
        Some(unsafe { self.base().add(self.back).read() })
    }
}

impl<T, A: ContiguousAllocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: ContiguousAllocator<T>> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: ContiguousAllocator<T>> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: ContiguousAllocator<T>> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let Some(buffer) = self.alloc.resource() else {
            return;
        };
        let start = self.front;
        let remaining = self.back - start;
        self.front = self.back;
        // SAFETY: the remaining range was live and is dropped once; the buffer
        // was allocated with `capacity` and is released once.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                buffer.as_ptr().add(start),
                remaining,
            ));
            self.alloc.deallocate(buffer, self.capacity);
        }
        self.alloc.set_resource(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_test_utils::{DropLedger, TrackingSource};

    #[test]
    fn iterator_is_covariant_in_element() {
        fn shorten<'a>(iter: IntoIter<&'static str>) -> IntoIter<&'a str> {
            iter
        }
        let array: DynArray<&'static str> = ["a", "b"].into();
        let iter = shorten(array.into_iter());
        assert_eq!(iter.as_slice(), ["a", "b"]);
    }

    #[test]
    fn yields_in_order_from_both_ends() {
        let array: DynArray<i32> = (1..=5).collect();
        let mut iter = array.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(5));
        assert_eq!(iter.as_slice(), &[2, 3, 4]);
        assert_eq!(iter.collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn partial_consumption_drops_rest_and_releases() {
        let source = TrackingSource::new();
        let ledger = DropLedger::new();
        let mut array = DynArray::new_in(source.allocator());
        for id in 0..4 {
            array.push_back(ledger.counter(id));
        }
        let mut iter = array.into_iter();
        let first = iter.next();
        drop(iter);
        assert_eq!(ledger.dropped(), 3);
        drop(first);
        assert_eq!(ledger.dropped(), 4);
        source.assert_no_leaks();
    }

    #[test]
    fn empty_array_iterates_nothing() {
        let array: DynArray<String> = DynArray::new();
        assert_eq!(array.into_iter().next(), None);
    }
}
