//! List node layouts.

use std::ptr::{self, NonNull};

use corral_core::{Link, Node};

/// Node of a singly-linked list.
pub struct SNode<T> {
    pub(crate) next: Link<SNode<T>>,
    pub(crate) value: T,
}

// SAFETY: value_ptr projects to the `value` field without reading the node.
unsafe impl<T> Node for SNode<T> {
    type Value = T;

    unsafe fn value_ptr(node: NonNull<Self>) -> NonNull<T> {
        // SAFETY: node points to storage for an SNode (caller contract).
        unsafe { NonNull::new_unchecked(ptr::addr_of_mut!((*node.as_ptr()).value)) }
    }
}

/// Node of a doubly-linked list.
pub struct DNode<T> {
    pub(crate) prev: Link<DNode<T>>,
    pub(crate) next: Link<DNode<T>>,
    pub(crate) value: T,
}

// SAFETY: value_ptr projects to the `value` field without reading the node.
unsafe impl<T> Node for DNode<T> {
    type Value = T;

    unsafe fn value_ptr(node: NonNull<Self>) -> NonNull<T> {
        // SAFETY: node points to storage for a DNode (caller contract).
        unsafe { NonNull::new_unchecked(ptr::addr_of_mut!((*node.as_ptr()).value)) }
    }
}
