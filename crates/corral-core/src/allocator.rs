//! Typed allocator contracts and their standard implementations.
//!
//! Two flavours exist because containers consume storage in two shapes:
//!
//! - [`ContiguousAllocator`]: one buffer of `n` elements, replaced wholesale
//!   on growth. The allocator tracks the buffer start as its *resource*.
//! - [`NodeAllocator`]: one node per element, linked by the container. The
//!   allocator tracks the chain's head and tail.
//!
//! Neither flavour records counts. Every `deallocate` must be given the
//! same element count as the `allocate` that produced the pointer.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::node::{Link, Node};
use crate::source::{acquire_array, release_array, MemorySource, System};

/// Allocator for contiguous buffers of `T`.
pub trait ContiguousAllocator<T> {
    /// Obtain uninitialized storage for `n` values. No value is constructed.
    fn allocate(&mut self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Release storage for `n` values. Values still in it are not dropped.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Self::allocate) on this allocator
    /// (or one it was [`detached`](Self::detached) from) with exactly `n`,
    /// and not have been deallocated since.
    unsafe fn deallocate(&mut self, ptr: NonNull<T>, n: usize);

    /// Construct `value` in place at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must lie inside storage from [`allocate`](Self::allocate) and
    /// be currently uninitialized; any previous value there is overwritten
    /// without being dropped.
    unsafe fn construct(&mut self, slot: NonNull<T>, value: T) {
        // SAFETY: slot is valid, aligned, uninitialized storage (caller contract).
        unsafe { slot.as_ptr().write(value) }
    }

    /// The buffer the owning container currently uses, if any.
    fn resource(&self) -> Option<NonNull<T>>;

    /// Record the buffer the owning container now uses.
    fn set_resource(&mut self, resource: Option<NonNull<T>>);

    /// A handle onto the same memory source with no resource attached.
    ///
    /// Used when a container is copied or moved-from: the new handle may
    /// allocate and release against the same source independently.
    fn detached(&self) -> Self
    where
        Self: Sized;
}

/// Allocator for individually allocated linked nodes.
pub trait NodeAllocator<N: Node> {
    /// Obtain uninitialized storage for `n` nodes. Neither links nor
    /// values are written.
    fn allocate(&mut self, n: usize) -> Result<NonNull<N>, AllocError>;

    /// Release storage for `n` nodes without dropping their contents.
    ///
    /// # Safety
    ///
    /// `node` must come from [`allocate`](Self::allocate) on this allocator
    /// (or one it was [`detached`](Self::detached) from) with exactly `n`,
    /// and not have been deallocated since.
    unsafe fn deallocate(&mut self, node: NonNull<N>, n: usize);

    /// Construct `value` in the value field of `node`. Link fields are left
    /// exactly as they are.
    ///
    /// # Safety
    ///
    /// `node` must come from [`allocate`](Self::allocate) and its value
    /// field must be uninitialized.
    unsafe fn construct(&mut self, node: NonNull<N>, value: N::Value) {
        // SAFETY: node points to allocated storage for N (caller contract), so
        // the value slot is valid and aligned.
        unsafe { N::value_ptr(node).as_ptr().write(value) }
    }

    /// First node of the owning container's chain.
    fn head(&self) -> Link<N>;

    /// Record the first node of the chain.
    fn set_head(&mut self, head: Link<N>);

    /// Last node of the chain (tracked by bidirectional containers only).
    fn tail(&self) -> Link<N>;

    /// Record the last node of the chain.
    fn set_tail(&mut self, tail: Link<N>);

    /// A handle onto the same memory source with an empty chain.
    fn detached(&self) -> Self
    where
        Self: Sized;
}

/// Standard [`ContiguousAllocator`] drawing from a [`MemorySource`].
pub struct StdAllocator<T, S: MemorySource = System> {
    resource: Option<NonNull<T>>,
    source: S,
    _marker: PhantomData<T>,
}

impl<T, S: MemorySource> StdAllocator<T, S> {
    /// Create an allocator over `source` with no resource.
    pub fn with_source(source: S) -> Self {
        Self {
            resource: None,
            source,
            _marker: PhantomData,
        }
    }

    /// The underlying memory source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<T> StdAllocator<T> {
    /// Create an allocator over the system allocator.
    pub const fn new() -> Self {
        Self {
            resource: None,
            source: System,
            _marker: PhantomData,
        }
    }
}

impl<T, S: MemorySource + Default> Default for StdAllocator<T, S> {
    fn default() -> Self {
        Self::with_source(S::default())
    }
}

impl<T, S: MemorySource + fmt::Debug> fmt::Debug for StdAllocator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdAllocator")
            .field("resource", &self.resource)
            .field("source", &self.source)
            .finish()
    }
}

impl<T, S: MemorySource + Clone> ContiguousAllocator<T> for StdAllocator<T, S> {
    fn allocate(&mut self, n: usize) -> Result<NonNull<T>, AllocError> {
        acquire_array(&self.source, n)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, n: usize) {
        // SAFETY: forwarded caller contract; detached handles share the source.
        unsafe { release_array(&self.source, ptr, n) }
    }

    fn resource(&self) -> Option<NonNull<T>> {
        self.resource
    }

    fn set_resource(&mut self, resource: Option<NonNull<T>>) {
        self.resource = resource;
    }

    fn detached(&self) -> Self {
        Self::with_source(self.source.clone())
    }
}

/// Standard [`NodeAllocator`] drawing from a [`MemorySource`].
pub struct StdNodeAllocator<N, S: MemorySource = System> {
    head: Link<N>,
    tail: Link<N>,
    source: S,
}

impl<N, S: MemorySource> StdNodeAllocator<N, S> {
    /// Create a node allocator over `source` with an empty chain.
    pub fn with_source(source: S) -> Self {
        Self {
            head: None,
            tail: None,
            source,
        }
    }

    /// The underlying memory source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<N> StdNodeAllocator<N> {
    /// Create a node allocator over the system allocator.
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            source: System,
        }
    }
}

impl<N, S: MemorySource + Default> Default for StdNodeAllocator<N, S> {
    fn default() -> Self {
        Self::with_source(S::default())
    }
}

impl<N, S: MemorySource + fmt::Debug> fmt::Debug for StdNodeAllocator<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdNodeAllocator")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("source", &self.source)
            .finish()
    }
}

impl<N: Node, S: MemorySource + Clone> NodeAllocator<N> for StdNodeAllocator<N, S> {
    fn allocate(&mut self, n: usize) -> Result<NonNull<N>, AllocError> {
        acquire_array(&self.source, n)
    }

    unsafe fn deallocate(&mut self, node: NonNull<N>, n: usize) {
        // SAFETY: forwarded caller contract; detached handles share the source.
        unsafe { release_array(&self.source, node, n) }
    }

    fn head(&self) -> Link<N> {
        self.head
    }

    fn set_head(&mut self, head: Link<N>) {
        self.head = head;
    }

    fn tail(&self) -> Link<N> {
        self.tail
    }

    fn set_tail(&mut self, tail: Link<N>) {
        self.tail = tail;
    }

    fn detached(&self) -> Self {
        Self::with_source(self.source.clone())
    }
}
