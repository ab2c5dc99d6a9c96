//! Reuse-before-grow block pool
//!
//! [`BlockPool`] serves raw requests out of blocks it has already reserved
//! from a parent resource and only grows when no free block fits.

mod block;
mod block_pool;
mod config;
mod stats;

pub use block::{BlockInfo, BlockState};
pub use block_pool::BlockPool;
pub use config::BlockPoolConfig;
pub use stats::BlockPoolStats;
