//! # Intrinsic Collections
//!
//! Capacity-bounded containers whose nodes live in index arenas instead of
//! individually allocated boxes.
//!
//! This crate provides an unbalanced binary search tree, `IntrinsicTree`, and a
//! singly linked list with slot recycling, `HeaplessStraightList`. Links are
//! small integer indices, so a tree of `u8`-indexed nodes spends three bytes per
//! node on structure.
//!
//! ## Key Features
//!
//! * **Fixed Capacity:** Every container is sized once. Inserting into a full
//!   container returns [`Error::CapacityExceeded`] instead of growing.
//! * **Dense Tree Storage:** Tree slots are kept contiguous. Removing a node
//!   moves the last slot into the hole and re-points its neighbours, so the
//!   element array is always a plain slice.
//! * **Two Storage Strategies:** `BinaryTree` reserves its arrays on the heap
//!   once; `HeaplessBinaryTree` keeps them inline via `heapless::Vec`.
//! * **No Recursion:** All four traversal orders use explicit stacks, so a
//!   degenerate, list-shaped tree is as safe to walk as a balanced one.
//! * **Compile-Time Safety:** Inline capacities that do not fit the index type
//!   are rejected during the build.
//!
//! ## Capacity Constraints
//!
//! The index type `I` bounds the capacity: its maximum value is reserved as the
//! "no link" sentinel, so `u8` addresses at most 255 slots and `u16` at most
//! 65 535.
//!
//! ## Examples
//!
//! ### BinaryTree
//!
//! ```rust
//! use intrinsic_collections::BinaryTree;
//!
//! let mut tree: BinaryTree<i32> = BinaryTree::with_capacity(8);
//! for v in [7, 3, 9, 1, 5] {
//!     tree.insert(v).unwrap();
//! }
//!
//! assert_eq!(tree.min(), Ok(&1));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
//!
//! tree.remove(&3).unwrap();
//! assert_eq!(tree.contains(&3), Ok(false));
//! ```
//!
//! ### HeaplessBinaryTree
//!
//! ```rust
//! # #[cfg(feature = "heapless")]
//! # {
//! use intrinsic_collections::{Error, HeaplessBinaryTree};
//!
//! let mut tree: HeaplessBinaryTree<u32, 2, u8> = HeaplessBinaryTree::new();
//! tree.insert(1).unwrap();
//! tree.insert(2).unwrap();
//!
//! assert_eq!(tree.insert(3), Err(Error::CapacityExceeded { capacity: 2 }));
//! # }
//! ```
//!
//! ### HeaplessStraightList
//!
//! ```rust
//! use intrinsic_collections::HeaplessStraightList;
//!
//! let mut list: HeaplessStraightList<&str, 4> = HeaplessStraightList::new();
//! list.push_back("b").unwrap();
//! list.push_front("a").unwrap();
//!
//! assert_eq!(list.pop_front(), Some("a"));
//! // The vacated slot is handed out again.
//! list.push_back("c").unwrap();
//! assert_eq!(list.high_water_mark(), 2);
//! ```

// --- Module Declarations ---

pub mod arena;
pub mod error;
pub mod lists;
pub mod trees;
pub mod utils;

// --- Re-exports ---

pub use arena::{AnyArena, HeapArena};
#[cfg(feature = "heapless")]
pub use arena::HeaplessArena;
pub use error::{Error, Result};
pub use lists::straight_list::HeaplessStraightList;
pub use trees::binary_tree::{BinaryTree, CompareFn, IntrinsicTree};
#[cfg(feature = "heapless")]
pub use trees::binary_tree::HeaplessBinaryTree;
pub use trees::traverse::{InOrder, LevelOrder, Order, PostOrder, PreOrder};
pub use utils::index_type::IndexType;
