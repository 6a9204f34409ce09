//! Block-chunked double-ended queue.
//!
//! A [`BlockDeque`] stores its elements in fixed-size [`Block`]s held in a
//! [`DList`](corral_list::DList). Pushing at either end fills the end
//! block and links a fresh one when it is full; popping releases a block
//! as soon as its last live slot is taken.
//!
//! ```text
//!            offset
//!              ▼
//! block 0: [ · · · a ]   block 1: [ b c d e ]   block 2: [ f · · · ]
//!
//! index i ─► block (offset + i) / SIZE, slot (offset + i) % SIZE
//! ```
//!
//! ```
//! use corral_deque::BlockDeque;
//!
//! let mut deque: BlockDeque<u32, 4> = BlockDeque::new();
//! deque.extend(0..9);
//! deque.push_front(100);
//! assert_eq!(deque[0], 100);
//! assert_eq!(deque.at(9), Some(&8));
//! assert_eq!(deque.pop_back(), Some(8));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod block;
pub mod deque;

pub use block::{Block, BlockNode};
pub use deque::{BlockDeque, DEFAULT_BLOCK_SIZE};
