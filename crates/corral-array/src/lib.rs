//! Growable contiguous array over a pluggable allocator.
//!
//! [`DynArray`] keeps one buffer obtained from a
//! [`ContiguousAllocator`](corral_core::ContiguousAllocator):
//!
//! ```text
//! buffer: [ live 0 | live 1 | ... | live len-1 | uninit ... | uninit ]
//!           └────────────── len ──────────────┘
//!           └──────────────────────── capacity ──────────────────────┘
//! ```
//!
//! Appends that find the array full grow it under a
//! [`GrowthPolicy`](corral_core::GrowthPolicy): a new buffer is allocated,
//! live elements are moved across in index order, and only then is the
//! old buffer released (with its old capacity). A failed allocation
//! therefore leaves the array exactly as it was.
//!
//! ```
//! use corral_array::DynArray;
//!
//! let mut words: DynArray<&str> = ["alpha", "beta", "gamma", "delta"].into();
//! words.erase(1..3);
//! assert_eq!(words.to_string(), "{ alpha, delta }");
//! assert_eq!(words.at(5), None);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
pub mod iter;

pub use array::DynArray;
pub use iter::IntoIter;
