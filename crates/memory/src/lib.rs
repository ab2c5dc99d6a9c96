//! # tessera-memory
//!
//! Memory resources for the tessera containers.
//!
//! This crate provides:
//! - [`MemoryResource`](resource::MemoryResource), the raw allocation
//!   capability every container draws its storage from
//! - [`SystemResource`](resource::SystemResource), the process allocator and
//!   the default resource
//! - [`BlockPool`](pool::BlockPool), a first-fit pool that recycles released
//!   blocks before growing from its parent
//! - [`TrackedResource`](resource::TrackedResource), a counting wrapper for
//!   leak checks
//!
//! ## Quick Start
//!
//! ```rust
//! use core::alloc::Layout;
//! use tessera_memory::prelude::*;
//!
//! let pool = BlockPool::with_config(BlockPoolConfig::production().with_name("nodes"));
//! let layout = Layout::new::<[u64; 4]>();
//!
//! let block = pool.allocate(layout)?;
//! assert_eq!(pool.active_blocks(), 1);
//! unsafe { pool.deallocate(block.cast(), layout)? };
//! assert_eq!(pool.free_blocks(), 1);
//! # Ok::<(), tessera_memory::MemoryError>(())
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured diagnostics through `tracing`
//!
//! ## Architecture
//!
//! - Standalone error handling via [`error`] module
//! - Single-threaded: pools use `RefCell` and are `!Sync`
//! - Resources are passed around as `&dyn MemoryResource`; lifetimes keep
//!   every consumer inside the lifetime of the resource it borrows

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]
// Resources hand out raw memory; unsafe blocks carry SAFETY comments
#![allow(unsafe_code)]
// Addresses are compared and stored as `usize` on purpose
#![allow(clippy::cast_ptr_alignment)]

// Error types
pub mod error;

// Core modules
pub mod pool;
pub mod resource;

pub use crate::error::{AllocError, AllocResult, MemoryError, MemoryResult, Result};

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::error::{AllocError, AllocResult, MemoryError, MemoryResult};
    pub use crate::pool::{BlockInfo, BlockPool, BlockPoolConfig, BlockPoolStats, BlockState};
    pub use crate::resource::{
        MemoryResource, SystemResource, TrackedResource, default_resource, same_resource,
    };
}
