//! The node contract shared by node allocators and linked containers.

use std::ptr::NonNull;

/// A link to a neighbouring node; `None` is the chain boundary.
pub type Link<N> = Option<NonNull<N>>;

/// A heap node holding one value plus container-managed link fields.
///
/// Node allocators construct only the value; the owning container writes
/// the links itself, before or after construction.
///
/// # Safety
///
/// [`value_ptr`](Node::value_ptr) must return a pointer to the `Value`
/// field inside the node's own allocation, without reading the node.
pub unsafe trait Node: Sized {
    /// The element type stored in the node.
    type Value;

    /// Locate the value slot of `node`.
    ///
    /// # Safety
    ///
    /// `node` must point to storage allocated for `Self` (the node itself
    /// may still be uninitialized).
    unsafe fn value_ptr(node: NonNull<Self>) -> NonNull<Self::Value>;
}
