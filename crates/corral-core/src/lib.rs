//! Allocator contracts and shared types for the Corral containers.
//!
//! This is the leaf crate of the workspace. It defines how every container
//! obtains and returns storage, and nothing about the containers
//! themselves:
//!
//! ```text
//! MemorySource (raw bytes: System, or an instrumented test source)
//! ├── StdAllocator<T>       → ContiguousAllocator<T>  (buffers of N × T)
//! └── StdNodeAllocator<N>   → NodeAllocator<N>        (one node at a time)
//! ```
//!
//! Allocators separate *acquiring* storage from *constructing* values in
//! it. Containers call `allocate`, then `construct` into each slot they
//! fill, and must hand the exact element count back to `deallocate`.
//! Allocators also carry the container's current resource (the buffer
//! start, or the head/tail of a node chain) but never its size
//! bookkeeping: count and capacity belong to the container.
//!
//! Allocation failure surfaces as [`AllocError`]. Fallible container
//! operations (`try_*`) return it with the container untouched; the
//! infallible ones route it through [`AllocError::handle`], which never
//! returns.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod allocator;
pub mod config;
pub mod display;
pub mod error;
pub mod node;
pub mod source;

// Public re-exports for the primary API surface.
pub use allocator::{ContiguousAllocator, NodeAllocator, StdAllocator, StdNodeAllocator};
pub use config::{ArrayConfig, GrowthPolicy};
pub use display::{fmt_sequence, Sequence};
pub use error::{AllocError, ConfigError};
pub use node::{Link, Node};
pub use source::{MemorySource, System};
