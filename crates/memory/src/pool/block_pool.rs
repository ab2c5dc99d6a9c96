//! First-fit block pool
//!
//! # Safety
//!
//! This module implements a single-threaded reuse-before-grow resource:
//! - Every block is obtained from the parent resource with the exact layout
//!   of the request that first needed it
//! - Blocks are kept in an address-ordered registry and are never returned to
//!   the parent before the pool is dropped
//! - Interior mutability goes through a `RefCell`; the pool is `!Sync`
//!
//! ## Invariants
//!
//! - Every address handed out and not yet returned to the parent has exactly
//!   one registry entry
//! - A free block is only reused for a request it fits in size and alignment
//! - A double release is reported without touching the registry
//! - `stats` counters always agree with a full scan of the registry

use core::alloc::Layout;
use core::cell::RefCell;
use core::fmt;
use core::ptr::{self, NonNull};
use std::collections::BTreeMap;

#[cfg(feature = "logging")]
use tracing::{debug, info, trace, warn};

use super::block::{Block, BlockInfo, BlockState};
use super::{BlockPoolConfig, BlockPoolStats};
use crate::error::{AllocError, AllocResult};
use crate::resource::{MemoryResource, dangling_for, default_resource};

#[derive(Debug, Default)]
struct Registry {
    /// Blocks keyed by address, ascending
    blocks: BTreeMap<usize, Block>,
    stats: BlockPoolStats,
}

/// Memory resource that recycles released blocks before asking its parent
///
/// `allocate` scans free blocks in ascending address order and hands out the
/// first one whose recorded size and alignment both cover the request. Only
/// when none fits does it forward the request to the parent. `deallocate`
/// marks the block free and keeps the bytes; they go back to the parent when
/// the pool is dropped.
///
/// Two pools are equal only if they are the same pool.
///
/// # Teardown
///
/// Dropping the pool returns every block to the parent, including blocks
/// still marked active. All consumers must release their storage before the
/// pool is dropped. Containers that borrow the pool (`&'p BlockPool`) cannot
/// outlive it, which rules out the usual way of breaking this rule.
///
/// # Examples
///
/// ```rust
/// use core::alloc::Layout;
/// use tessera_memory::prelude::*;
///
/// let pool = BlockPool::new();
/// let layout = Layout::from_size_align(100, 8)?;
///
/// let first = pool.allocate(layout)?;
/// unsafe { pool.deallocate(first.cast(), layout)? };
///
/// let second = pool.allocate(layout)?;
/// assert_eq!(first.cast::<u8>(), second.cast::<u8>());
/// assert_eq!(pool.block_count(), 1);
/// # unsafe { pool.deallocate(second.cast(), layout)? };
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct BlockPool<'p> {
    parent: &'p dyn MemoryResource,
    registry: RefCell<Registry>,
    config: BlockPoolConfig,
}

impl BlockPool<'static> {
    /// Creates a pool backed by the system resource
    pub fn new() -> Self {
        Self::with_config(BlockPoolConfig::default())
    }

    /// Creates a pool backed by the system resource with custom configuration
    pub fn with_config(config: BlockPoolConfig) -> Self {
        BlockPool::with_parent_and_config(default_resource(), config)
    }
}

impl Default for BlockPool<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> BlockPool<'p> {
    /// Creates a pool that grows from `parent`
    pub fn with_parent(parent: &'p dyn MemoryResource) -> Self {
        Self::with_parent_and_config(parent, BlockPoolConfig::default())
    }

    /// Creates a pool that grows from `parent` with custom configuration
    pub fn with_parent_and_config(parent: &'p dyn MemoryResource, config: BlockPoolConfig) -> Self {
        #[cfg(feature = "logging")]
        debug!(pool = %config.name, "block pool created");

        Self {
            parent,
            registry: RefCell::new(Registry::default()),
            config,
        }
    }

    /// The resource new blocks come from
    pub fn parent(&self) -> &'p dyn MemoryResource {
        self.parent
    }

    pub fn config(&self) -> &BlockPoolConfig {
        &self.config
    }

    /// Total number of blocks reserved from the parent
    pub fn block_count(&self) -> usize {
        self.registry.borrow().stats.total_blocks
    }

    /// Number of blocks currently handed out
    pub fn active_blocks(&self) -> usize {
        self.registry.borrow().stats.active_blocks
    }

    /// Number of blocks waiting for reuse
    pub fn free_blocks(&self) -> usize {
        self.registry.borrow().stats.free_blocks()
    }

    /// Cumulative bytes reserved from the parent
    pub fn reserved_bytes(&self) -> usize {
        self.registry.borrow().stats.reserved_bytes
    }

    /// Bytes of the blocks currently handed out
    pub fn active_bytes(&self) -> usize {
        self.registry.borrow().stats.active_bytes
    }

    /// Reserved bytes sitting in free blocks
    pub fn free_bytes(&self) -> usize {
        self.registry.borrow().stats.free_bytes()
    }

    pub fn stats(&self) -> BlockPoolStats {
        self.registry.borrow().stats
    }

    /// Whether `ptr` is the address of a registered block
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.registry
            .borrow()
            .blocks
            .contains_key(&(ptr.as_ptr() as usize))
    }

    /// Details of the block registered at `ptr`
    pub fn block_info(&self, ptr: NonNull<u8>) -> Option<BlockInfo> {
        self.registry
            .borrow()
            .blocks
            .get(&(ptr.as_ptr() as usize))
            .map(Block::info)
    }

    /// Every registered block in ascending address order
    pub fn blocks(&self) -> Vec<BlockInfo> {
        self.registry.borrow().blocks.values().map(Block::info).collect()
    }

    /// Emits the summary and every block record as `info` events
    #[cfg(feature = "logging")]
    pub fn log_statistics(&self) {
        let registry = self.registry.borrow();
        info!(pool = %self.config.name, stats = %registry.stats, "block pool statistics");
        for block in registry.blocks.values() {
            info!(pool = %self.config.name, block = %block.info(), "block");
        }
    }

    /// Marks the first fitting free block active
    fn reuse(&self, layout: Layout) -> Option<NonNull<[u8]>> {
        let mut guard = self.registry.borrow_mut();
        let registry = &mut *guard;

        let block = registry.blocks.values_mut().find(|b| b.fits(layout))?;
        block.state = BlockState::Active;
        registry.stats.active_blocks += 1;
        registry.stats.active_bytes += block.layout.size();
        registry.stats.reuse_count += 1;

        #[cfg(feature = "logging")]
        trace!(
            pool = %self.config.name,
            address = block.ptr.as_ptr() as usize,
            requested = layout.size(),
            block_size = block.layout.size(),
            "reused block"
        );

        Some(NonNull::slice_from_raw_parts(block.ptr, block.layout.size()))
    }

    /// Reserves a new block from the parent
    fn grow(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        // The registry is not borrowed while the parent runs
        let region = self.parent.allocate(layout)?;
        let ptr = region.cast::<u8>();
        let address = ptr.as_ptr() as usize;

        let mut registry = self.registry.borrow_mut();
        let previous = registry.blocks.insert(address, Block::new(ptr, layout));
        debug_assert!(previous.is_none(), "parent returned a registered address");
        registry.stats.total_blocks += 1;
        registry.stats.active_blocks += 1;
        registry.stats.reserved_bytes += layout.size();
        registry.stats.active_bytes += layout.size();
        registry.stats.grow_count += 1;

        #[cfg(feature = "logging")]
        trace!(
            pool = %self.config.name,
            address,
            size = layout.size(),
            align = layout.align(),
            "allocated new block"
        );

        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }
}

// SAFETY: BlockPool hands out regions obtained from `parent`.
// - A reused block satisfies the request: its recorded size and alignment are
//   both at least the requested ones and its address honours the recorded
//   alignment
// - A block is handed to at most one consumer: only free blocks are reused and
//   reuse flips them active under the registry borrow
// - Regions stay valid until the pool is dropped
unsafe impl MemoryResource for BlockPool<'_> {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        if layout.size() == 0 {
            return Ok(NonNull::slice_from_raw_parts(dangling_for(layout), 0));
        }

        let region = match self.reuse(layout) {
            Some(region) => region,
            None => self.grow(layout)?,
        };

        if let Some(pattern) = self.config.alloc_pattern {
            // SAFETY: the region is exclusively ours until returned to the caller.
            unsafe { ptr::write_bytes(region.cast::<u8>().as_ptr(), pattern, region.len()) };
        }

        Ok(region)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) -> AllocResult<()> {
        if layout.size() == 0 {
            return Ok(());
        }

        let address = ptr.as_ptr() as usize;
        let mut guard = self.registry.borrow_mut();
        let registry = &mut *guard;

        let Some(block) = registry.blocks.get_mut(&address) else {
            #[cfg(feature = "logging")]
            {
                if self.config.warn_on_unknown {
                    warn!(
                        pool = %self.config.name,
                        address,
                        size = layout.size(),
                        align = layout.align(),
                        "ignoring release of unknown pointer"
                    );
                }
            }
            return Ok(());
        };

        if block.state == BlockState::Free {
            return Err(AllocError::double_free(address, block.layout));
        }

        if let Some(pattern) = self.config.dealloc_pattern {
            // SAFETY: the caller no longer references the block (deallocate contract)
            // and the block spans `block.layout.size()` bytes reserved by the pool.
            unsafe { ptr::write_bytes(block.ptr.as_ptr(), pattern, block.layout.size()) };
        }

        block.state = BlockState::Free;
        registry.stats.active_blocks -= 1;
        registry.stats.active_bytes -= block.layout.size();

        #[cfg(feature = "logging")]
        trace!(pool = %self.config.name, address, "released block");

        Ok(())
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        ptr::eq(self.identity(), other.identity())
    }
}

impl fmt::Debug for BlockPool<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockPool")
            .field("name", &self.config.name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Drop for BlockPool<'_> {
    fn drop(&mut self) {
        let parent = self.parent;
        let registry = self.registry.get_mut();

        #[cfg(feature = "logging")]
        {
            debug!(pool = %self.config.name, stats = %registry.stats, "dropping block pool");
            if registry.stats.active_blocks > 0 {
                warn!(
                    pool = %self.config.name,
                    active_blocks = registry.stats.active_blocks,
                    "block pool dropped while blocks are still handed out"
                );
            }
        }

        for block in core::mem::take(&mut registry.blocks).into_values() {
            // SAFETY: the block came from `parent.allocate(block.layout)` and was never
            // returned before. Consumers must have released it (documented precondition).
            let released = unsafe { parent.deallocate(block.ptr, block.layout) };

            #[cfg(feature = "logging")]
            {
                if let Err(err) = &released {
                    warn!(pool = %self.config.name, error = %err, "parent refused block");
                }
            }
            let _ = released;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::TrackedResource;

    fn layout(size: usize, align: usize) -> Layout {
        Layout::from_size_align(size, align).unwrap()
    }

    #[test]
    fn test_reuse_returns_same_address() {
        let pool = BlockPool::new();
        let l = layout(100, 8);

        let first = pool.allocate(l).unwrap();
        unsafe { pool.deallocate(first.cast(), l).unwrap() };
        let second = pool.allocate(l).unwrap();

        assert_eq!(first.cast::<u8>(), second.cast::<u8>());
        assert_eq!(pool.block_count(), 1);
        assert_eq!(pool.stats().reuse_count, 1);

        unsafe { pool.deallocate(second.cast(), l).unwrap() };
    }

    #[test]
    fn test_smaller_request_reuses_larger_block() {
        let pool = BlockPool::new();
        let big = layout(128, 16);
        let small = layout(32, 8);

        let a = pool.allocate(big).unwrap();
        unsafe { pool.deallocate(a.cast(), big).unwrap() };

        let b = pool.allocate(small).unwrap();
        assert_eq!(a.cast::<u8>(), b.cast::<u8>());
        // Slice length reports the real block capacity
        assert_eq!(b.len(), 128);

        unsafe { pool.deallocate(b.cast(), small).unwrap() };
        assert_eq!(pool.free_blocks(), 1);
    }

    #[test]
    fn test_stricter_alignment_grows() {
        let pool = BlockPool::new();
        let loose = layout(64, 8);
        let strict = layout(64, 64);

        let a = pool.allocate(loose).unwrap();
        unsafe { pool.deallocate(a.cast(), loose).unwrap() };

        let b = pool.allocate(strict).unwrap();
        assert_eq!(pool.block_count(), 2);
        assert_eq!(b.cast::<u8>().as_ptr() as usize % 64, 0);

        unsafe { pool.deallocate(b.cast(), strict).unwrap() };
    }

    #[test]
    fn test_double_free_leaves_registry_unchanged() {
        let pool = BlockPool::new();
        let l = layout(48, 8);

        let ptr = pool.allocate(l).unwrap().cast::<u8>();
        unsafe { pool.deallocate(ptr, l).unwrap() };
        let before = pool.blocks();

        let err = unsafe { pool.deallocate(ptr, l) }.unwrap_err();
        assert!(err.is_double_free());
        assert_eq!(pool.blocks(), before);
    }

    #[test]
    fn test_unknown_pointer_is_ignored() {
        let pool = BlockPool::new();
        let mut local = 0u64;
        let foreign = NonNull::from(&mut local).cast::<u8>();

        unsafe { pool.deallocate(foreign, Layout::new::<u64>()).unwrap() };
        assert_eq!(pool.block_count(), 0);
    }

    #[test]
    fn test_zero_sized_requests_are_not_registered() {
        let pool = BlockPool::new();
        let l = layout(0, 8);

        let ptr = pool.allocate(l).unwrap();
        assert_eq!(ptr.len(), 0);
        unsafe { pool.deallocate(ptr.cast(), l).unwrap() };
        assert_eq!(pool.block_count(), 0);
    }

    #[test]
    fn test_fill_patterns() {
        let pool = BlockPool::with_config(BlockPoolConfig::debug());
        let l = layout(16, 8);

        let ptr = pool.allocate(l).unwrap().cast::<u8>();
        let bytes = unsafe { core::slice::from_raw_parts(ptr.as_ptr(), 16) };
        assert!(bytes.iter().all(|&b| b == 0xBB));

        unsafe { pool.deallocate(ptr, l).unwrap() };
        let bytes = unsafe { core::slice::from_raw_parts(ptr.as_ptr(), 16) };
        assert!(bytes.iter().all(|&b| b == 0xDD));
    }

    #[test]
    fn test_drop_returns_everything_to_parent() {
        let parent = TrackedResource::new(crate::resource::SystemResource::new());
        {
            let pool = BlockPool::with_parent(&parent);
            let a = pool.allocate(layout(32, 8)).unwrap();
            let _b = pool.allocate(layout(64, 8)).unwrap();
            unsafe { pool.deallocate(a.cast(), layout(32, 8)).unwrap() };
            assert_eq!(parent.allocation_count(), 2);
            // `_b` is intentionally still active when the pool goes away
        }
        assert_eq!(parent.deallocation_count(), 2);
        assert!(!parent.has_leaks());
    }

    #[test]
    fn test_identity_equality() {
        let a = BlockPool::new();
        let b = BlockPool::new();
        assert!(a.is_equal(&a));
        assert!(!a.is_equal(&b));
        assert!(!a.is_equal(default_resource()));
    }

    #[test]
    fn test_free_bytes_and_utilization() {
        let pool = BlockPool::new();
        let l = layout(40, 8);
        let a = pool.allocate(l).unwrap();
        let b = pool.allocate(l).unwrap();
        unsafe { pool.deallocate(a.cast(), l).unwrap() };

        assert_eq!(pool.active_bytes(), 40);
        assert_eq!(pool.free_bytes(), 40);
        assert!((pool.stats().utilization() - 0.5).abs() < f64::EPSILON);

        unsafe { pool.deallocate(b.cast(), l).unwrap() };
    }
}
