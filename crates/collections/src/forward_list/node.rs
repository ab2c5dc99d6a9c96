//! List nodes and their storage
//!
//! # Safety
//!
//! A node lives in storage obtained from the list's memory resource with
//! `Node::<T>::LAYOUT`. It is created initialised and read out exactly once
//! before its storage goes back to the same resource.

use core::alloc::Layout;
use core::ptr::NonNull;

use tessera_memory::{AllocResult, resource::MemoryResource};

pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) next: Link<T>,
}

impl<T> Node<T> {
    pub(crate) const LAYOUT: Layout = Layout::new::<Node<T>>();

    /// Allocates a node from `resource` and moves `value` into it
    ///
    /// On failure `value` is dropped and nothing was allocated.
    pub(crate) fn create(
        resource: &dyn MemoryResource,
        value: T,
        next: Link<T>,
    ) -> AllocResult<NonNull<Node<T>>> {
        let region = resource.allocate(Self::LAYOUT)?;
        let ptr = region.cast::<Node<T>>();

        // SAFETY: Initialising fresh storage.
        // - region spans at least LAYOUT.size() bytes aligned to LAYOUT.align()
        // - nobody else refers to it yet, so write() does not drop stale data
        unsafe { ptr.as_ptr().write(Node { value, next }) };

        Ok(ptr)
    }

    /// Moves the value out and returns the storage to `resource`
    ///
    /// The value is handed back even if the resource rejects the release.
    ///
    /// # Safety
    ///
    /// - `ptr` came from [`Node::create`] on `resource` (or one equal to it)
    /// - the node is unlinked and not read again after this call
    pub(crate) unsafe fn destroy(
        resource: &dyn MemoryResource,
        ptr: NonNull<Node<T>>,
    ) -> (T, AllocResult<()>) {
        // SAFETY: ptr points to an initialised node nobody else reads (caller contract).
        let node = unsafe { ptr.as_ptr().read() };

        // SAFETY: storage came from `resource` with LAYOUT and is no longer referenced.
        let released = unsafe { resource.deallocate(ptr.cast(), Self::LAYOUT) };

        (node.value, released)
    }
}
