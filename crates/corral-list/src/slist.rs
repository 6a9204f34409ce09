//! The singly-linked [`SList`] and its cursor.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use corral_core::{fmt_sequence, AllocError, Link, NodeAllocator, StdNodeAllocator};

use crate::node::SNode;

/// A singly-linked list.
///
/// The head lives in the allocator's head slot; following `next` from it
/// `len` times reaches the end of the chain.
pub struct SList<T, A: NodeAllocator<SNode<T>> = StdNodeAllocator<SNode<T>>> {
    alloc: A,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> SList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            alloc: StdNodeAllocator::new(),
            len: 0,
            _marker: PhantomData,
        }
    }
}

impl<T, A: NodeAllocator<SNode<T>>> SList<T, A> {
    /// Create an empty list drawing nodes from `alloc`.
    pub fn new_in(mut alloc: A) -> Self {
        alloc.set_head(None);
        alloc.set_tail(None);
        Self {
            alloc,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// The allocator backing this list.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: the head node is live while the list is borrowed.
        self.alloc.head().map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Mutable first element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the head node is live and uniquely borrowed through `self`.
        self.alloc.head().map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Prepend `value`. Returns the stored element.
    pub fn push_front(&mut self, value: T) -> &mut T {
        match self.try_push_front(value) {
            Ok(stored) => stored,
            Err(e) => e.handle(),
        }
    }

    /// Prepend `value`. On failure the list is unchanged and `value` dropped.
    pub fn try_push_front(&mut self, value: T) -> Result<&mut T, AllocError> {
        let node = self.new_node(value, self.alloc.head())?;
        self.alloc.set_head(Some(node));
        self.len += 1;
        // SAFETY: the node was just constructed and is owned by the list.
        Ok(unsafe { &mut (*node.as_ptr()).value })
    }

    /// Prepend the value produced by `make`.
    pub fn emplace_front<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.push_front(make())
    }

    /// Remove and return the first element; `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.alloc.head()?;
        // SAFETY: head is live; it is unlinked before being freed.
        unsafe {
            self.alloc.set_head((*head.as_ptr()).next);
            self.len -= 1;
            Some(self.free_node(head))
        }
    }

    /// Drop every element and free every node.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.alloc.set_tail(None);
    }

    /// A cursor on the first node (or the null position when empty).
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let current = self.alloc.head();
        CursorMut {
            list: self,
            current,
        }
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.alloc.head(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Iterate front to back with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.alloc.head(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Move the contents out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        let fresh = self.alloc.detached();
        Self {
            alloc: mem::replace(&mut self.alloc, fresh),
            len: mem::take(&mut self.len),
            _marker: PhantomData,
        }
    }

    /// Allocate a node holding `value` that links to `next`.
    fn new_node(&mut self, value: T, next: Link<SNode<T>>) -> Result<NonNull<SNode<T>>, AllocError> {
        let node = self.alloc.allocate(1)?;
        // SAFETY: fresh storage for one node; the link is written first, then
        // the value is constructed.
        unsafe {
            ptr::addr_of_mut!((*node.as_ptr()).next).write(next);
            self.alloc.construct(node, value);
        }
        Ok(node)
    }

    /// Move the value out of an unlinked node and release it.
    ///
    /// # Safety
    ///
    /// `node` must be live, owned by this list and no longer reachable.
    unsafe fn free_node(&mut self, node: NonNull<SNode<T>>) -> T {
        // SAFETY: the value is read once and the node released once.
        unsafe {
            let value = ptr::addr_of!((*node.as_ptr()).value).read();
            self.alloc.deallocate(node, 1);
            value
        }
    }

    /// Link a new node after `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list.
    unsafe fn link_after(
        &mut self,
        node: NonNull<SNode<T>>,
        value: T,
    ) -> Result<NonNull<SNode<T>>, AllocError> {
        // SAFETY: node is live (caller contract).
        unsafe {
            let fresh = self.new_node(value, (*node.as_ptr()).next)?;
            (*node.as_ptr()).next = Some(fresh);
            self.len += 1;
            Ok(fresh)
        }
    }

    /// Unlink and destroy the successor of `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list.
    unsafe fn unlink_after(&mut self, node: NonNull<SNode<T>>) -> Option<T> {
        // SAFETY: node and its successor are live; the successor is bypassed
        // before it is freed.
        unsafe {
            let victim = (*node.as_ptr()).next?;
            (*node.as_ptr()).next = (*victim.as_ptr()).next;
            self.len -= 1;
            Some(self.free_node(victim))
        }
    }

    fn last_node(&self) -> Link<SNode<T>> {
        let mut node = self.alloc.head()?;
        // SAFETY: every node reached from head is live.
        while let Some(next) = unsafe { (*node.as_ptr()).next } {
            node = next;
        }
        Some(node)
    }
}

impl<T, A: NodeAllocator<SNode<T>>> Drop for SList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: NodeAllocator<SNode<T>> + Default> Default for SList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: NodeAllocator<SNode<T>>> Clone for SList<T, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::new_in(self.alloc.detached());
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T, A: NodeAllocator<SNode<T>>> Extend<T> for SList<T, A> {
    /// Append at the back. The tail is found once, then each element links
    /// after the previous one.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut tail = self.last_node();
        for value in iter {
            let node = match tail {
                // SAFETY: `tail` is the live last node of this list.
                Some(last) => unsafe { self.link_after(last, value) },
                None => self.new_node(value, None).map(|node| {
                    self.alloc.set_head(Some(node));
                    self.len += 1;
                    node
                }),
            };
            tail = Some(node.unwrap_or_else(|e| e.handle()));
        }
    }
}

impl<T, A: NodeAllocator<SNode<T>> + Default> FromIterator<T> for SList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for SList<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: fmt::Debug, A: NodeAllocator<SNode<T>>> fmt::Debug for SList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, A: NodeAllocator<SNode<T>>> fmt::Display for SList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_sequence(f, self.iter())
    }
}

impl<T: PartialEq, A: NodeAllocator<SNode<T>>, B: NodeAllocator<SNode<T>>> PartialEq<SList<T, B>>
    for SList<T, A>
{
    fn eq(&self, other: &SList<T, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: NodeAllocator<SNode<T>>> Eq for SList<T, A> {}

impl<'a, T, A: NodeAllocator<SNode<T>>> IntoIterator for &'a SList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: NodeAllocator<SNode<T>>> IntoIterator for &'a mut SList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: NodeAllocator<SNode<T>>> IntoIterator for SList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

/// A position in an [`SList`] that can insert and erase after itself.
///
/// The cursor sits on a node or on the null position past the last node.
/// Moving forward from the null position stays there.
pub struct CursorMut<'a, T, A: NodeAllocator<SNode<T>> = StdNodeAllocator<SNode<T>>> {
    list: &'a mut SList<T, A>,
    current: Link<SNode<T>>,
}

impl<T, A: NodeAllocator<SNode<T>>> CursorMut<'_, T, A> {
    /// The element under the cursor; `None` at the null position.
    pub fn current(&mut self) -> Option<&mut T> {
        // SAFETY: the node is live and the list is uniquely borrowed.
        self.current.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Whether the cursor is at the null position.
    pub fn is_null(&self) -> bool {
        self.current.is_none()
    }

    /// Step to the next node.
    pub fn move_next(&mut self) {
        if let Some(node) = self.current {
            // SAFETY: the node is live.
            self.current = unsafe { (*node.as_ptr()).next };
        }
    }

    /// Step forward `n` nodes, stopping at the null position.
    pub fn advance(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            if self.current.is_none() {
                break;
            }
            self.move_next();
        }
        self
    }

    /// Link `value` after the current node and return it. At the null
    /// position nothing is linked, `value` is dropped and `None` returned.
    pub fn insert_after(&mut self, value: T) -> Option<&mut T> {
        let node = self.current?;
        // SAFETY: node is a live node of the borrowed list.
        let fresh = unsafe { self.list.link_after(node, value) }.unwrap_or_else(|e| e.handle());
        // SAFETY: freshly linked and owned by the list.
        Some(unsafe { &mut (*fresh.as_ptr()).value })
    }

    /// Like [`insert_after`](Self::insert_after), but `make` only runs when
    /// the cursor is on a node.
    pub fn emplace_after<F>(&mut self, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.current?;
        self.insert_after(make())
    }

    /// Unlink and return the successor of the current node. `None` when the
    /// cursor or its successor is at the null position.
    pub fn erase_after(&mut self) -> Option<T> {
        let node = self.current?;
        // SAFETY: node is a live node of the borrowed list.
        unsafe { self.list.unlink_after(node) }
    }
}

/// Borrowing iterator over an [`SList`].
pub struct Iter<'a, T> {
    next: Link<SNode<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.remaining -= 1;
        // SAFETY: nodes stay live for the list borrow `'a`.
        let node = unsafe { &*node.as_ptr() };
        self.next = node.next;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// Mutably borrowing iterator over an [`SList`].
pub struct IterMut<'a, T> {
    next: Link<SNode<T>>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let node = self.next?;
        self.remaining -= 1;
        // SAFETY: each node is yielded once during the unique borrow `'a`.
        let node = unsafe { &mut *node.as_ptr() };
        self.next = node.next;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over an [`SList`].
pub struct IntoIter<T, A: NodeAllocator<SNode<T>> = StdNodeAllocator<SNode<T>>> {
    list: SList<T, A>,
}

impl<T, A: NodeAllocator<SNode<T>>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: NodeAllocator<SNode<T>>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: NodeAllocator<SNode<T>>> FusedIterator for IntoIter<T, A> {}
