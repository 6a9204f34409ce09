//! Node-based linked lists over a pluggable node allocator.
//!
//! Every element lives in its own heap node obtained from a
//! [`NodeAllocator`](corral_core::NodeAllocator). The allocator records the
//! chain's boundaries (head, and tail for the doubly-linked list); the
//! list records the count and owns the links.
//!
//! ```text
//! SList:  head ─► [v|next] ─► [v|next] ─► [v|next] ─► ∅
//!
//! DList:  ∅ ◄─ [prev|v|next] ◄─► [prev|v|next] ◄─► [prev|v|next] ─► ∅
//!               ▲ head                              ▲ tail
//! ```
//!
//! Positions inside a list are cursors ([`slist::CursorMut`],
//! [`dlist::CursorMut`]) that sit either on a node or on the null position
//! past the end. Mutations at the null position return `None` rather than
//! touching memory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod dlist;
pub mod node;
pub mod slist;

pub use dlist::DList;
pub use node::{DNode, SNode};
pub use slist::SList;
