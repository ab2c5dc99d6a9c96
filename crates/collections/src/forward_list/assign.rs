//! Resource-aware copy and move
//!
//! Whether storage can be shared between two lists depends only on
//! [`same_resource`]: equal resources may release each other's nodes, unequal
//! ones may not. Every assignment below branches on that one question.

use tessera_memory::resource::{MemoryResource, same_resource};

use super::{ForwardList, allocation_failure};
use crate::error::ListResult;

/// What [`ForwardList::move_from`] actually did
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Resources were equal; nodes changed owner and the source is empty
    Transferred,
    /// Resources differed; the destination got a copy and the source is intact
    Copied,
}

impl<'r, T: Clone> ForwardList<'r, T> {
    /// Deep copy on the same resource, order preserved
    pub fn try_clone(&self) -> ListResult<Self> {
        self.try_clone_in(self.resource)
    }

    /// Deep copy on another resource, order preserved
    ///
    /// On failure every node allocated so far is released again.
    pub fn try_clone_in<'s>(
        &self,
        resource: &'s dyn MemoryResource,
    ) -> ListResult<ForwardList<'s, T>> {
        ForwardList::from_iter_in(self.iter().cloned(), resource)
    }

    /// Copy assignment
    ///
    /// With equal resources the current nodes are destroyed first and the
    /// copy is rebuilt on the same resource, so a pool hands the freed blocks
    /// straight back. If that rebuild fails the list is left empty.
    ///
    /// With unequal resources a complete copy is built on `source`'s resource
    /// and then swapped in together with that resource: afterwards
    /// `self.resource()` is the resource that produced `self`'s nodes. If the
    /// copy fails `self` is unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> ListResult<()> {
        if same_resource(self.resource, source.resource) {
            self.clear();
            if let Err(err) = self.append_all(source.iter().cloned()) {
                self.clear();
                return Err(err);
            }
        } else {
            let mut copy = source.try_clone()?;
            self.swap(&mut copy);
        }
        Ok(())
    }

    /// Move assignment
    ///
    /// With equal resources the nodes change owner in O(1) and `source` is
    /// left empty.
    ///
    /// With unequal resources the nodes cannot change owner, so `self` gets a
    /// deep copy on its own resource and `source` keeps its contents. Callers
    /// that need the source emptied can `clear` it on [`MoveOutcome::Copied`].
    pub fn move_from(&mut self, source: &mut ForwardList<'_, T>) -> ListResult<MoveOutcome> {
        if same_resource(self.resource, source.resource) {
            self.clear();
            self.head = source.head.take();
            self.len = core::mem::take(&mut source.len);
            Ok(MoveOutcome::Transferred)
        } else {
            *self = source.try_clone_in(self.resource)?;
            Ok(MoveOutcome::Copied)
        }
    }
}

impl<T: Clone> Clone for ForwardList<'_, T> {
    /// Aborts via `handle_alloc_error` if the resource is exhausted
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|err| allocation_failure::<T>(&err))
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_clone_from(source) {
            allocation_failure::<T>(&err);
        }
    }
}
