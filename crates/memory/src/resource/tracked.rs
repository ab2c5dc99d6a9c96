//! Tracked memory resource
//!
//! Wraps another resource and counts every request that passes through it.
//! Containers and pools are tested against it to check that each allocation is
//! matched by exactly one deallocation.
//!
//! ## Invariants
//!
//! - Every successful allocation is recorded with its size
//! - Every successful deallocation reduces the current byte count to match
//! - Failed requests only bump their failure counter

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use super::MemoryResource;
use crate::error::AllocResult;

/// Snapshot of the counters kept by [`TrackedResource`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingStats {
    pub allocation_count: usize,
    pub deallocation_count: usize,
    pub failed_allocations: usize,
    pub failed_deallocations: usize,
    pub current_bytes: usize,
    pub peak_bytes: usize,
}

/// A wrapper resource that tracks usage statistics
///
/// Single-threaded: counters live in [`Cell`]s, matching the resources it
/// wraps.
#[derive(Debug)]
pub struct TrackedResource<R> {
    inner: R,
    stats: Cell<TrackingStats>,
}

impl<R> TrackedResource<R> {
    /// Creates a new TrackedResource wrapping the provided resource
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            stats: Cell::new(TrackingStats::default()),
        }
    }

    /// Gets a reference to the underlying resource
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Consumes the tracker and returns the underlying resource
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns the total bytes currently allocated
    pub fn allocated_bytes(&self) -> usize {
        self.stats.get().current_bytes
    }

    /// Returns the peak bytes allocated
    pub fn peak_allocated_bytes(&self) -> usize {
        self.stats.get().peak_bytes
    }

    /// Returns the total number of allocations performed
    pub fn allocation_count(&self) -> usize {
        self.stats.get().allocation_count
    }

    /// Returns the total number of deallocations performed
    pub fn deallocation_count(&self) -> usize {
        self.stats.get().deallocation_count
    }

    /// Get detailed statistics snapshot
    pub fn stats(&self) -> TrackingStats {
        self.stats.get()
    }

    /// Reset statistics while keeping current allocations
    pub fn reset_stats(&self) {
        let current = self.stats.get().current_bytes;
        self.stats.set(TrackingStats {
            current_bytes: current,
            peak_bytes: current,
            ..TrackingStats::default()
        });
    }

    /// Check if there are any memory leaks (allocations > deallocations)
    pub fn has_leaks(&self) -> bool {
        self.potential_leaks() > 0
    }

    /// Get the number of potentially leaked allocations
    pub fn potential_leaks(&self) -> usize {
        let stats = self.stats.get();
        stats
            .allocation_count
            .saturating_sub(stats.deallocation_count)
    }

    fn update(&self, f: impl FnOnce(&mut TrackingStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

// SAFETY: TrackedResource forwards every request to `inner`.
// - Pointers and layouts are passed through untouched
// - Statistics are side effects only
unsafe impl<R: MemoryResource> MemoryResource for TrackedResource<R> {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        match self.inner.allocate(layout) {
            Ok(ptr) => {
                self.update(|s| {
                    s.allocation_count += 1;
                    s.current_bytes += layout.size();
                    s.peak_bytes = s.peak_bytes.max(s.current_bytes);
                });
                Ok(ptr)
            }
            Err(err) => {
                self.update(|s| s.failed_allocations += 1);
                Err(err)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) -> AllocResult<()> {
        // SAFETY: the caller's contract for `deallocate` carries over to `inner`.
        match unsafe { self.inner.deallocate(ptr, layout) } {
            Ok(()) => {
                self.update(|s| {
                    s.deallocation_count += 1;
                    s.current_bytes = s.current_bytes.saturating_sub(layout.size());
                });
                Ok(())
            }
            Err(err) => {
                self.update(|s| s.failed_deallocations += 1);
                Err(err)
            }
        }
    }
}
