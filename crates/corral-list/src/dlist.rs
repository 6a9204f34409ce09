//! The doubly-linked [`DList`] and its cursor.
//!
//! Every mutation maintains four adjacency relations:
//!
//! - `node.prev.next == node` for every node with a predecessor;
//! - `node.next.prev == node` for every node with a successor;
//! - the head has no predecessor;
//! - the tail has no successor.
//!
//! The head and tail are stored in the allocator's boundary slots.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use corral_core::{fmt_sequence, AllocError, Link, NodeAllocator, StdNodeAllocator};

use crate::node::DNode;

/// A doubly-linked list with head and tail tracking.
pub struct DList<T, A: NodeAllocator<DNode<T>> = StdNodeAllocator<DNode<T>>> {
    alloc: A,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> DList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            alloc: StdNodeAllocator::new(),
            len: 0,
            _marker: PhantomData,
        }
    }
}

impl<T, A: NodeAllocator<DNode<T>>> DList<T, A> {
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
        // SAFETY: boundary nodes are live while the list is borrowed.
        self.alloc.head().map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Mutable first element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as for `front`, uniquely borrowed through `self`.
        self.alloc.head().map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: boundary nodes are live while the list is borrowed.
        self.alloc.tail().map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Mutable last element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as for `back`, uniquely borrowed through `self`.
        self.alloc.tail().map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Element at `index`, walking from whichever end is nearer.
    pub fn nth(&self, index: usize) -> Option<&T> {
        // SAFETY: node_at only yields live nodes.
        self.node_at(index).map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Mutable element at `index`, walking from whichever end is nearer.
    pub fn nth_mut(&mut self, index: usize) -> Option<&mut T> {
        // SAFETY: node_at only yields live nodes; `self` is uniquely borrowed.
        self.node_at(index).map(|node| unsafe { &mut (*node.as_ptr()).value })
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
        let node = self.new_node(value)?;
        // SAFETY: node is fresh; the head (if any) is live.
        unsafe {
            self.link(node, None, self.alloc.head());
            Ok(&mut (*node.as_ptr()).value)
        }
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

    /// Append `value`. On failure the list is unchanged and `value` dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, AllocError> {
        let node = self.new_node(value)?;
        // SAFETY: node is fresh; the tail (if any) is live.
        unsafe {
            self.link(node, self.alloc.tail(), None);
            Ok(&mut (*node.as_ptr()).value)
        }
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
        let head = self.alloc.head()?;
        // SAFETY: head is a live node of this list.
        Some(unsafe { self.unlink(head) })
    }

    /// Remove and return the last element; `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.alloc.tail()?;
        // SAFETY: tail is a live node of this list.
        Some(unsafe { self.unlink(tail) })
    }

    /// Drop every element and free every node.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// A cursor on the first node (or the null position when empty).
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let current = self.alloc.head();
        CursorMut {
            list: self,
            current,
        }
    }

    /// A cursor on the last node (or the null position when empty).
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        let current = self.alloc.tail();
        CursorMut {
            list: self,
            current,
        }
    }

    /// Iterate front to back (or back to front with `.rev()`).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.alloc.head(),
            tail: self.alloc.tail(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Iterate with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.alloc.head(),
            tail: self.alloc.tail(),
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

    fn new_node(&mut self, value: T) -> Result<NonNull<DNode<T>>, AllocError> {
        let node = self.alloc.allocate(1)?;
        // SAFETY: fresh storage for one node; links are written, then the
        // value is constructed.
        unsafe {
            ptr::addr_of_mut!((*node.as_ptr()).prev).write(None);
            ptr::addr_of_mut!((*node.as_ptr()).next).write(None);
            self.alloc.construct(node, value);
        }
        Ok(node)
    }

    /// Splice `node` between `prev` and `next`.
    ///
    /// # Safety
    ///
    /// `node` must be fully constructed and unlinked. `prev` and `next` must
    /// be adjacent live nodes of this list, with `None` standing for the
    /// head or tail boundary.
    unsafe fn link(&mut self, node: NonNull<DNode<T>>, prev: Link<DNode<T>>, next: Link<DNode<T>>) {
        // SAFETY: all pointers are live (caller contract).
        unsafe {
            (*node.as_ptr()).prev = prev;
            (*node.as_ptr()).next = next;
            match prev {
                Some(p) => (*p.as_ptr()).next = Some(node),
                None => self.alloc.set_head(Some(node)),
            }
            match next {
                Some(n) => (*n.as_ptr()).prev = Some(node),
                None => self.alloc.set_tail(Some(node)),
            }
        }
        self.len += 1;
    }

    /// Detach `node`, release it and return its value.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list.
    unsafe fn unlink(&mut self, node: NonNull<DNode<T>>) -> T {
        // SAFETY: node and its neighbours are live; the node is bypassed
        // before its value is moved out and its storage released.
        unsafe {
            let prev = (*node.as_ptr()).prev;
            let next = (*node.as_ptr()).next;
            match prev {
                Some(p) => (*p.as_ptr()).next = next,
                None => self.alloc.set_head(next),
            }
            match next {
                Some(n) => (*n.as_ptr()).prev = prev,
                None => self.alloc.set_tail(prev),
            }
            self.len -= 1;
            let value = ptr::addr_of!((*node.as_ptr()).value).read();
            self.alloc.deallocate(node, 1);
            value
        }
    }

    fn node_at(&self, index: usize) -> Link<DNode<T>> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len, so every step lands on a live node.
        unsafe {
            if index <= self.len / 2 {
                let mut node = self.alloc.head()?;
                for _ in 0..index {
                    node = (*node.as_ptr()).next?;
                }
                Some(node)
            } else {
                let mut node = self.alloc.tail()?;
                for _ in 0..self.len - 1 - index {
                    node = (*node.as_ptr()).prev?;
                }
                Some(node)
            }
        }
    }
}

impl<T, A: NodeAllocator<DNode<T>>> Drop for DList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: NodeAllocator<DNode<T>> + Default> Default for DList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: NodeAllocator<DNode<T>>> Clone for DList<T, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::new_in(self.alloc.detached());
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T, A: NodeAllocator<DNode<T>>> Extend<T> for DList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, A: NodeAllocator<DNode<T>> + Default> FromIterator<T> for DList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for DList<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: fmt::Debug, A: NodeAllocator<DNode<T>>> fmt::Debug for DList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, A: NodeAllocator<DNode<T>>> fmt::Display for DList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_sequence(f, self.iter())
    }
}

impl<T: PartialEq, A: NodeAllocator<DNode<T>>, B: NodeAllocator<DNode<T>>> PartialEq<DList<T, B>>
    for DList<T, A>
{
    fn eq(&self, other: &DList<T, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: NodeAllocator<DNode<T>>> Eq for DList<T, A> {}

impl<'a, T, A: NodeAllocator<DNode<T>>> IntoIterator for &'a DList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: NodeAllocator<DNode<T>>> IntoIterator for &'a mut DList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: NodeAllocator<DNode<T>>> IntoIterator for DList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

/// A position in a [`DList`] that can insert before and erase itself.
///
/// The null position sits past the tail. Moving forward from it stays
/// there; moving backward from it lands on the tail, and moving backward
/// from the head lands on it.
pub struct CursorMut<'a, T, A: NodeAllocator<DNode<T>> = StdNodeAllocator<DNode<T>>> {
    list: &'a mut DList<T, A>,
    current: Link<DNode<T>>,
}

impl<T, A: NodeAllocator<DNode<T>>> CursorMut<'_, T, A> {
    /// The element under the cursor; `None` at the null position.
    pub fn current(&mut self) -> Option<&mut T> {
        // SAFETY: the node is live and the list is uniquely borrowed.
        self.current.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Whether the cursor is at the null position.
    pub fn is_null(&self) -> bool {
        self.current.is_none()
    }

    /// Step towards the tail.
    pub fn move_next(&mut self) {
        if let Some(node) = self.current {
            // SAFETY: the node is live.
            self.current = unsafe { (*node.as_ptr()).next };
        }
    }

    /// Step towards the head.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            // SAFETY: the node is live.
            Some(node) => unsafe { (*node.as_ptr()).prev },
            None => self.list.alloc.tail(),
        };
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

    /// Step backward `n` nodes. Stops at the null position once it has
    /// moved past the head.
    pub fn retreat(&mut self, n: usize) -> &mut Self {
        for step in 0..n {
            if step > 0 && self.current.is_none() {
                break;
            }
            self.move_prev();
        }
        self
    }

    /// Link `value` before the current node and return it. At the null
    /// position nothing is linked, `value` is dropped and `None` returned.
    pub fn insert(&mut self, value: T) -> Option<&mut T> {
        let next = self.current?;
        let node = self.list.new_node(value).unwrap_or_else(|e| e.handle());
        // SAFETY: `next` is live and `prev` is its live predecessor (or the
        // head boundary); node is fresh.
        unsafe {
            let prev = (*next.as_ptr()).prev;
            self.list.link(node, prev, Some(next));
            Some(&mut (*node.as_ptr()).value)
        }
    }

    /// Like [`insert`](Self::insert), but `make` only runs when the cursor
    /// is on a node.
    pub fn emplace<F>(&mut self, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.current?;
        self.insert(make())
    }

    /// Unlink and return the current element, moving the cursor to its
    /// successor. `None` at the null position.
    pub fn erase(&mut self) -> Option<T> {
        let node = self.current?;
        // SAFETY: node is a live node of the borrowed list; its successor is
        // read before the node is released.
        unsafe {
            self.current = (*node.as_ptr()).next;
            Some(self.list.unlink(node))
        }
    }
}

/// Borrowing double-ended iterator over a [`DList`].
pub struct Iter<'a, T> {
    head: Link<DNode<T>>,
    tail: Link<DNode<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.head?;
        self.remaining -= 1;
        // SAFETY: nodes stay live for the list borrow `'a`.
        let node = unsafe { &*node.as_ptr() };
        self.head = node.next;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.tail?;
        self.remaining -= 1;
        // SAFETY: nodes stay live for the list borrow `'a`.
        let node = unsafe { &*node.as_ptr() };
        self.tail = node.prev;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// Mutably borrowing double-ended iterator over a [`DList`].
pub struct IterMut<'a, T> {
    head: Link<DNode<T>>,
    tail: Link<DNode<T>>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.head?;
        self.remaining -= 1;
        // SAFETY: `remaining` keeps the two ends from meeting, so each node is
        // yielded once during the unique borrow `'a`.
        let node = unsafe { &mut *node.as_ptr() };
        self.head = node.next;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.tail?;
        self.remaining -= 1;
        // SAFETY: as for `next`.
        let node = unsafe { &mut *node.as_ptr() };
        self.tail = node.prev;
        Some(&mut node.value)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning double-ended iterator over a [`DList`].
pub struct IntoIter<T, A: NodeAllocator<DNode<T>> = StdNodeAllocator<DNode<T>>> {
    list: DList<T, A>,
}

impl<T, A: NodeAllocator<DNode<T>>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: NodeAllocator<DNode<T>>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: NodeAllocator<DNode<T>>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: NodeAllocator<DNode<T>>> FusedIterator for IntoIter<T, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_test_utils::{DropLedger, TrackedNodeAllocator, TrackingSource};

    fn tracked<T>(source: &TrackingSource) -> DList<T, TrackedNodeAllocator<DNode<T>>> {
        DList::new_in(source.node_allocator())
    }

    /// Check every adjacency relation and that both walks see `len` nodes.
    fn assert_links<T, A: NodeAllocator<DNode<T>>>(list: &DList<T, A>) {
        let head = list.allocator().head();
        let tail = list.allocator().tail();
        if list.is_empty() {
            assert!(head.is_none() && tail.is_none(), "empty list with boundary nodes");
            return;
        }
        // SAFETY: every node reachable from the boundaries is live.
        unsafe {
            let head = head.expect("non-empty list without head");
            assert!((*head.as_ptr()).prev.is_none(), "head has a predecessor");
            let mut forward = 0;
            let mut node = head;
            loop {
                forward += 1;
                match (*node.as_ptr()).next {
                    Some(next) => {
                        assert_eq!((*next.as_ptr()).prev, Some(node), "broken prev link");
                        node = next;
                    }
                    None => break,
                }
            }
            assert_eq!(Some(node), tail, "forward walk does not end at tail");
            assert_eq!(forward, list.len());

            let mut backward = 0;
            let mut link = tail;
            while let Some(node) = link {
                backward += 1;
                link = (*node.as_ptr()).prev;
            }
            assert_eq!(backward, list.len());
        }
    }

    #[test]
    fn string_insert_pop_emplace_erase_sequence() {
        let source = TrackingSource::new();
        let mut words = tracked::<String>(&source);
        words.extend(["one", "two", "three", "four"].map(String::from));
        assert_eq!(words.to_string(), "{ one, two, three, four }");

        words.cursor_front_mut().advance(3).insert("cat".to_string());
        assert_eq!(words.to_string(), "{ one, two, three, cat, four }");
        assert_links(&words);

        assert_eq!(words.pop_front().as_deref(), Some("one"));
        words.emplace_front(|| "dog".to_string());
        words.emplace_back(|| "fish".to_string());
        assert_eq!(words.to_string(), "{ dog, two, three, cat, four, fish }");
        assert_links(&words);

        assert_eq!(
            words.cursor_front_mut().advance(2).erase().as_deref(),
            Some("three")
        );
        assert_eq!(words.to_string(), "{ dog, two, cat, four, fish }");
        assert_links(&words);

        drop(words);
        source.assert_no_leaks();
    }

    #[test]
    fn push_pop_both_ends() {
        let mut list = DList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_links(&list);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), None);
        assert_eq!(list.pop_front(), None);
        assert_links(&list);
    }

    #[test]
    fn insert_before_head_becomes_head() {
        let mut list: DList<i32> = [2, 3].into();
        list.cursor_front_mut().insert(1);
        assert_eq!(list.front(), Some(&1));
        assert_links(&list);
    }

    #[test]
    fn erase_tail_moves_cursor_to_null() {
        let mut list: DList<i32> = [1, 2, 3].into();
        let mut cursor = list.cursor_back_mut();
        assert_eq!(cursor.erase(), Some(3));
        assert!(cursor.is_null());
        assert_eq!(cursor.erase(), None);
        assert_eq!(cursor.insert(9), None);
        assert_eq!(list.back(), Some(&2));
        assert_links(&list);
    }

    #[test]
    fn erase_only_node_empties_list() {
        let mut list: DList<i32> = [7].into();
        assert_eq!(list.cursor_front_mut().erase(), Some(7));
        assert!(list.is_empty());
        assert_links(&list);
    }

    #[test]
    fn backward_cursor_movement() {
        let mut list: DList<i32> = [1, 2, 3, 4].into();
        let mut cursor = list.cursor_front_mut();
        cursor.advance(10);
        assert!(cursor.is_null());
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&mut 4));
        cursor.retreat(2);
        assert_eq!(cursor.current(), Some(&mut 2));
        cursor.retreat(5);
        assert!(cursor.is_null());
    }

    #[test]
    fn nth_from_both_ends() {
        let list: DList<usize> = (0..9).collect();
        for i in 0..9 {
            assert_eq!(list.nth(i), Some(&i));
        }
        assert_eq!(list.nth(9), None);
    }

    #[test]
    fn iter_is_double_ended() {
        let mut list: DList<i32> = [1, 2, 3, 4].into();
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [4, 3, 2, 1]);
        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.len(), 2);
        for v in list.iter_mut().rev() {
            *v *= 2;
        }
        assert_eq!(list.into_iter().rev().collect::<Vec<_>>(), [8, 6, 4, 2]);
    }

    #[test]
    fn iter_mut_ends_meet_once() {
        let mut list: DList<i32> = [1, 2, 3].into();
        let mut iter = list.iter_mut();
        let a = iter.next();
        let b = iter.next_back();
        let c = iter.next();
        assert_eq!((a, b, c), (Some(&mut 1), Some(&mut 3), Some(&mut 2)));
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn take_and_clone() {
        let source = TrackingSource::new();
        let ledger = DropLedger::new();
        let mut list = tracked(&source);
        list.extend((0..3).map(|i| ledger.counter(i)));
        let moved = list.take();
        assert!(list.is_empty());
        assert_links(&list);
        let copy = moved.clone();
        assert_eq!(moved, copy);
        assert_links(&copy);
        drop(moved);
        drop(copy);
        drop(list);
        assert_eq!(ledger.dropped(), 6);
        source.assert_no_leaks();
    }

    #[test]
    fn failed_push_back_leaves_links_intact() {
        let source = TrackingSource::new();
        let mut list = tracked(&source);
        list.extend([1, 2]);
        source.fail_after(0);
        assert!(list.try_push_back(3).is_err());
        assert!(list.try_push_front(0).is_err());
        assert_eq!(list.to_string(), "{ 1, 2 }");
        assert_links(&list);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Clone, Debug)]
        enum Op {
            PushFront(u8),
            PushBack(u8),
            PopFront,
            PopBack,
            Insert(usize, u8),
            Erase(usize),
        }

        fn any_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => any::<u8>().prop_map(Op::PushFront),
                3 => any::<u8>().prop_map(Op::PushBack),
                1 => Just(Op::PopFront),
                1 => Just(Op::PopBack),
                2 => (0usize..12, any::<u8>()).prop_map(|(i, v)| Op::Insert(i, v)),
                2 => (0usize..12).prop_map(Op::Erase),
            ]
        }

        proptest! {
            #[test]
            fn adjacency_holds_after_every_mutation(
                ops in proptest::collection::vec(any_op(), 0..64),
            ) {
                let source = TrackingSource::new();
                let mut list = tracked::<u8>(&source);
                let mut model: VecDeque<u8> = VecDeque::new();

                for op in ops {
                    match op {
                        Op::PushFront(v) => {
                            list.push_front(v);
                            model.push_front(v);
                        }
                        Op::PushBack(v) => {
                            list.push_back(v);
                            model.push_back(v);
                        }
                        Op::PopFront => prop_assert_eq!(list.pop_front(), model.pop_front()),
                        Op::PopBack => prop_assert_eq!(list.pop_back(), model.pop_back()),
                        Op::Insert(i, v) => {
                            let inserted = list.cursor_front_mut().advance(i).insert(v).is_some();
                            prop_assert_eq!(inserted, i < model.len());
                            if i < model.len() {
                                model.insert(i, v);
                            }
                        }
                        Op::Erase(i) => {
                            let erased = list.cursor_front_mut().advance(i).erase();
                            prop_assert_eq!(erased, model.remove(i));
                        }
                    }
                    assert_links(&list);
                    prop_assert_eq!(source.live_blocks(), model.len());
                    prop_assert!(list.iter().eq(model.iter()));
                    prop_assert!(list.iter().rev().eq(model.iter().rev()));
                }
            }
        }
    }
}
