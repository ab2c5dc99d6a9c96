//! System memory resource
//!
//! Provides a resource that wraps the system's default memory allocator.
//! It is the default parent of every [`BlockPool`] and the default resource
//! of every container that is not given one explicitly.
//!
//! [`BlockPool`]: crate::pool::BlockPool

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::NonNull;
use std::alloc::System;

use super::MemoryResource;
use crate::error::{AllocError, AllocResult};

/// Wrapper for the system's default allocator
///
/// Stateless: every `SystemResource` compares equal to every other one, so
/// storage obtained through one instance may be released through another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemResource;

static SYSTEM: SystemResource = SystemResource;

impl SystemResource {
    /// Creates a new SystemResource
    #[inline]
    pub const fn new() -> Self {
        SystemResource
    }
}

/// The process-wide default resource
#[inline]
pub fn default_resource() -> &'static dyn MemoryResource {
    &SYSTEM
}

// SAFETY: Delegates to `std::alloc::System`.
// - Non-zero layouts are passed through unchanged, so size and alignment hold
// - Zero-sized layouts never reach `System` and never get released to it
unsafe impl MemoryResource for SystemResource {
    #[inline]
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        if layout.size() == 0 {
            // Well-aligned dangling pointer for zero-sized requests
            let ptr = dangling_for(layout);
            return Ok(NonNull::slice_from_raw_parts(ptr, 0));
        }

        // SAFETY: layout has non-zero size, checked above.
        let ptr = unsafe { System.alloc(layout) };

        match NonNull::new(ptr) {
            Some(non_null) => Ok(NonNull::slice_from_raw_parts(non_null, layout.size())),
            None => Err(AllocError::allocation_failed_with_layout(layout)),
        }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) -> AllocResult<()> {
        if layout.size() == 0 {
            return Ok(());
        }

        // SAFETY: caller guarantees ptr came from `System.alloc` with this layout.
        unsafe { System.dealloc(ptr.as_ptr(), layout) };
        Ok(())
    }

    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        other.is_system()
    }

    fn is_system(&self) -> bool {
        true
    }
}

/// Dangling pointer aligned for `layout`
#[inline]
pub(crate) fn dangling_for(layout: Layout) -> NonNull<u8> {
    // SAFETY: alignment is a non-zero power of two, so the address is non-null.
    unsafe { NonNull::new_unchecked(core::ptr::without_provenance_mut(layout.align())) }
}
