//! Corral: allocator-aware containers with explicit object lifetimes.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Corral sub-crates. For most users, adding `corral` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use corral::prelude::*;
//!
//! // Growable array with a custom growth policy.
//! let config = ArrayConfig::new(GrowthPolicy::PlusHalf).with_initial_capacity(2);
//! let mut array: DynArray<i32> = DynArray::with_config(config).unwrap();
//! array.extend([1, 2, 3]);
//! assert_eq!(array.capacity(), 3);
//! assert_eq!(array.at(7), None);
//!
//! // Singly-linked list edited through a cursor.
//! let mut list: SList<i32> = [1, 2, 3, 4].into();
//! list.cursor_front_mut().advance(3).insert_after(99);
//! assert_eq!(list.to_string(), "{ 1, 2, 3, 4, 99 }");
//!
//! // Block deque with four slots per block.
//! let mut deque: BlockDeque<i32, 4> = (0..9).collect();
//! deque.pop_front();
//! assert_eq!(deque[0], 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `corral-core` | Memory sources, allocator traits, errors, growth configuration |
//! | [`array`] | `corral-array` | Growable contiguous array |
//! | [`list`] | `corral-list` | Singly- and doubly-linked lists, cursors |
//! | [`deque`] | `corral-deque` | Block-chunked deque |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Memory sources, allocator contracts, and shared configuration (`corral-core`).
///
/// Implement [`alloc::MemorySource`] to redirect where containers get their
/// bytes; implement [`alloc::ContiguousAllocator`] or
/// [`alloc::NodeAllocator`] to take over typed allocation entirely.
pub use corral_core as alloc;

/// Growable contiguous array (`corral-array`).
pub use corral_array as array;

/// Linked lists (`corral-list`).
///
/// [`list::SList`] and [`list::DList`], their node types, and the
/// position cursors in [`list::slist`] and [`list::dlist`].
pub use corral_list as list;

/// Block-chunked deque (`corral-deque`).
pub use corral_deque as deque;

/// Common imports for typical Corral usage.
///
/// ```rust
/// use corral::prelude::*;
/// ```
pub mod prelude {
    // Allocation
    pub use corral_core::{
        AllocError, ContiguousAllocator, MemorySource, NodeAllocator, StdAllocator,
        StdNodeAllocator, System,
    };

    // Configuration
    pub use corral_core::{ArrayConfig, ConfigError, GrowthPolicy};

    // Containers
    pub use corral_array::DynArray;
    pub use corral_deque::BlockDeque;
    pub use corral_list::{DList, SList};
}
