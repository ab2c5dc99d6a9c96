//! # tessera-collections
//!
//! Containers whose storage comes from a [`MemoryResource`].
//!
//! [`ForwardList`] is a singly-linked list that takes one node-sized block
//! from its resource per element. Copy and move respect resource identity:
//! lists on equal resources share storage freely, lists on different
//! resources never release each other's nodes.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_collections::prelude::*;
//! use tessera_memory::pool::BlockPool;
//!
//! let pool = BlockPool::new();
//! let mut a = ForwardList::new_in(&pool);
//! a.push_front("x")?;
//!
//! let mut b = ForwardList::new_in(&pool);
//! assert_eq!(b.move_from(&mut a)?, MoveOutcome::Transferred);
//! assert!(a.is_empty());
//! assert_eq!(b.front()?, &"x");
//! # Ok::<(), ListError>(())
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured diagnostics through `tracing`
//!
//! [`MemoryResource`]: tessera_memory::resource::MemoryResource

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]
// Nodes are raw allocations from a memory resource; unsafe blocks carry SAFETY comments
#![allow(unsafe_code)]

pub mod error;
pub mod forward_list;

pub use crate::error::{ListError, ListResult};
pub use crate::forward_list::ForwardList;

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::error::{ListError, ListResult};
    pub use crate::forward_list::{CursorMut, ForwardList, MoveOutcome};
}
