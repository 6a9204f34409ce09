//! Raw byte providers behind the typed allocators.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::AllocError;

/// A provider of raw, untyped storage.
///
/// Typed allocators ([`StdAllocator`](crate::StdAllocator),
/// [`StdNodeAllocator`](crate::StdNodeAllocator)) translate element counts
/// into a [`Layout`] and forward here. Sources are never asked for
/// zero-sized blocks; the typed layer answers those with a dangling
/// pointer.
///
/// Cloning a source yields a handle onto the same underlying memory pool.
///
/// # Safety
///
/// A block returned by `acquire` must be valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and stay valid until
/// it is passed back to `release` (on this source or any clone of it).
pub unsafe trait MemorySource {
    /// Acquire a block for `layout`. `layout.size()` is non-zero.
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the source.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `acquire` on this source (or a
    /// clone of it) with exactly `layout`, and not released since.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide system allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

// SAFETY: forwards to the global allocator, which upholds the contract.
unsafe impl MemorySource for System {
    fn acquire(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0, "zero-sized request reached System");
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw).ok_or(AllocError::OutOfMemory { layout })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: ptr came from `alloc::alloc` with this layout (caller contract).
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Acquire storage for `n` values of `T` from `source`.
///
/// Zero-sized requests (`n == 0` or zero-sized `T`) yield a dangling,
/// well-aligned pointer without touching the source.
pub(crate) fn acquire_array<T, S: MemorySource>(
    source: &S,
    n: usize,
) -> Result<NonNull<T>, AllocError> {
    let layout = Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    source.acquire(layout).map(NonNull::cast)
}

/// Release storage previously obtained from [`acquire_array`] with the same `n`.
///
/// # Safety
///
/// `ptr` must come from `acquire_array::<T, _>(source, n)` (or a clone of
/// `source`) with exactly this `n`, and not have been released since.
pub(crate) unsafe fn release_array<T, S: MemorySource>(source: &S, ptr: NonNull<T>, n: usize) {
    let Ok(layout) = Layout::array::<T>(n) else {
        debug_assert!(false, "release of {n} elements that could never be acquired");
        return;
    };
    if layout.size() != 0 {
        // SAFETY: same layout as the matching acquire (caller contract).
        unsafe { source.release(ptr.cast(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_request_is_dangling() {
        let ptr = acquire_array::<u32, _>(&System, 0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        // SAFETY: matches the zero-length acquire above.
        unsafe { release_array(&System, ptr, 0) };
    }

    #[test]
    fn zero_sized_type_never_reaches_source() {
        let ptr = acquire_array::<(), _>(&System, 1024).unwrap();
        assert_eq!(ptr, NonNull::dangling());
    }

    #[test]
    fn oversized_request_is_capacity_overflow() {
        let result = acquire_array::<u64, _>(&System, usize::MAX);
        assert_eq!(result, Err(AllocError::CapacityOverflow));
    }

    #[test]
    fn system_round_trip_is_writable() {
        let ptr = acquire_array::<u64, _>(&System, 8).unwrap();
        // SAFETY: ptr is valid for 8 u64 writes and released with the same count.
        unsafe {
            for i in 0..8 {
                ptr.as_ptr().add(i).write(i as u64 * 3);
            }
            assert_eq!(ptr.as_ptr().add(7).read(), 21);
            release_array(&System, ptr, 8);
        }
    }
}
