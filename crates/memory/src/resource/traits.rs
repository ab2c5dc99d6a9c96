//! Memory resource capability
//!
//! A memory resource hands out raw, untyped storage for a [`Layout`] and takes
//! it back later. Containers hold a `&dyn MemoryResource` so the same container
//! type can draw from the system allocator, a [`BlockPool`], or any other
//! conforming implementation chosen at runtime.
//!
//! # Safety
//!
//! [`MemoryResource`] is an unsafe trait. Implementors promise that:
//! - a successful `allocate` returns a region of at least `layout.size()`
//!   bytes aligned to at least `layout.align()`, exclusively owned by the caller
//!   until it is passed back to `deallocate`;
//! - `deallocate` accepts any pointer previously returned by `allocate` on
//!   this resource (or on a resource it compares equal to) together with the
//!   same layout;
//! - `is_equal` is an equivalence relation: storage from one resource may be
//!   released through any resource it compares equal to.
//!
//! [`BlockPool`]: crate::pool::BlockPool

use core::alloc::Layout;
use core::ptr::{self, NonNull};

use crate::error::AllocResult;

/// Raw allocation capability shared by every container in the workspace
///
/// # Safety
///
/// See the module documentation for the contract implementors must uphold.
pub unsafe trait MemoryResource {
    /// Allocates a region described by `layout`
    ///
    /// Zero-sized layouts yield a well-aligned dangling pointer that must
    /// still be passed back to `deallocate`.
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>>;

    /// Returns a region to the resource
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - `ptr` came from `allocate` on this resource or one equal to it
    /// - `layout` is the layout used for that allocation
    /// - no reference into the region outlives this call
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) -> AllocResult<()>;

    /// Address of the object that actually owns the storage
    ///
    /// Wrappers that only forward, such as `&R`, report the identity of what
    /// they forward to, so a pool and a reference to it share one identity.
    fn identity(&self) -> *const () {
        ptr::from_ref(self).cast()
    }

    /// Whether storage from `self` may be released through `other`
    ///
    /// Defaults to identity: two resources are equal only if they are the
    /// same object.
    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        ptr::eq(self.identity(), other.identity())
    }

    /// True for resources that forward straight to the process allocator
    fn is_system(&self) -> bool {
        false
    }
}

/// Compares two resources the way allocator-aware containers need it
///
/// Checks identity first, then asks both sides so an asymmetric
/// implementation cannot make `a == b` disagree with `b == a`.
#[inline]
pub fn same_resource(a: &dyn MemoryResource, b: &dyn MemoryResource) -> bool {
    ptr::eq(a.identity(), b.identity()) || (a.is_equal(b) && b.is_equal(a))
}

// SAFETY: Forwarding to the referenced resource.
// - Every method delegates to `R` with the same arguments
// - Identity forwards too, so `&pool` and `pool` are the same resource
unsafe impl<R: MemoryResource + ?Sized> MemoryResource for &R {
    #[inline]
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) -> AllocResult<()> {
        // SAFETY: caller upholds the contract for `R::deallocate`.
        unsafe { (**self).deallocate(ptr, layout) }
    }

    #[inline]
    fn identity(&self) -> *const () {
        (**self).identity()
    }

    #[inline]
    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        (**self).is_equal(other)
    }

    #[inline]
    fn is_system(&self) -> bool {
        (**self).is_system()
    }
}
