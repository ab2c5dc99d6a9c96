//! Singly-linked list over a pluggable memory resource
//!
//! # Safety
//!
//! `ForwardList` owns a chain of raw nodes:
//! - every node was allocated from `resource` and is released to the resource
//!   the list holds at the moment of release
//! - the resource field only changes together with the nodes it produced
//!   (`swap`, unequal-resource `clone_from`)
//! - `len` always equals the number of nodes reachable from `head`
//!
//! ## Invariants
//!
//! - each node creation makes exactly one `allocate` call and each node
//!   destruction exactly one `deallocate` call
//! - a failed insert leaves `head` and `len` as they were; a failed release
//!   is reported after the node is already unlinked

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use tessera_memory::resource::{MemoryResource, default_resource};

#[cfg(feature = "logging")]
use tracing::error;

use crate::error::{ListError, ListResult};

mod assign;
mod cursor;
mod iter;
mod node;

pub use assign::MoveOutcome;
pub use cursor::CursorMut;
pub use iter::{IntoIter, Iter, IterMut};

use node::{Link, Node};

/// A singly-linked list whose nodes live in a [`MemoryResource`]
///
/// Every insert takes one node-sized block from the resource; every erase,
/// `clear`, and the destructor hand it back. The list borrows its resource for
/// `'r`, so it can never outlive the pool its nodes come from.
///
/// Iteration runs from the front: the most recently pushed-to-front element
/// comes first.
///
/// # Examples
///
/// ```rust
/// use tessera_collections::ForwardList;
/// use tessera_memory::pool::BlockPool;
///
/// let pool = BlockPool::new();
/// let mut list = ForwardList::new_in(&pool);
/// for i in 1..=3 {
///     list.push_front(i)?;
/// }
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// assert_eq!(list.pop_front()?, 3);
/// assert_eq!(pool.active_blocks(), 2);
/// # Ok::<(), tessera_collections::ListError>(())
/// ```
pub struct ForwardList<'r, T> {
    head: Link<T>,
    len: usize,
    resource: &'r dyn MemoryResource,
    marker: PhantomData<T>,
}

impl<T> ForwardList<'static, T> {
    /// Creates an empty list on the default (system) resource
    pub fn new() -> Self {
        ForwardList::new_in(default_resource())
    }
}

impl<T> Default for ForwardList<'static, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, T> ForwardList<'r, T> {
    /// Creates an empty list drawing nodes from `resource`
    pub fn new_in(resource: &'r dyn MemoryResource) -> Self {
        Self {
            head: None,
            len: 0,
            resource,
            marker: PhantomData,
        }
    }

    /// Builds a list on `resource` holding the items in iteration order
    pub fn from_iter_in<I>(iter: I, resource: &'r dyn MemoryResource) -> ListResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new_in(resource);
        list.append_all(iter)?;
        Ok(list)
    }

    /// The resource nodes are allocated from
    pub fn resource(&self) -> &'r dyn MemoryResource {
        self.resource
    }

    /// Number of elements, kept as a counter
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front(&self) -> ListResult<&T> {
        match self.head {
            // SAFETY: head points to a live node owned by this list.
            Some(node) => Ok(unsafe { &(*node.as_ptr()).value }),
            None => Err(ListError::empty_container("front")),
        }
    }

    pub fn front_mut(&mut self) -> ListResult<&mut T> {
        match self.head {
            // SAFETY: head is live and `&mut self` makes the access exclusive.
            Some(node) => Ok(unsafe { &mut (*node.as_ptr()).value }),
            None => Err(ListError::empty_container("front_mut")),
        }
    }

    /// Prepends `value`
    ///
    /// Fails only if the resource cannot provide a node; the list is unchanged
    /// in that case.
    pub fn push_front(&mut self, value: T) -> ListResult<()> {
        let node = Node::create(self.resource, value, self.head)?;
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Removes the first element and returns it
    ///
    /// A release error from the resource is reported after the node has been
    /// unlinked; the value is dropped in that case.
    pub fn pop_front(&mut self) -> ListResult<T> {
        let node = self
            .unlink_front()
            .ok_or_else(|| ListError::empty_container("pop_front"))?;

        // SAFETY: node was just unlinked from this list.
        let (value, released) = unsafe { Node::destroy(self.resource, node) };
        released?;
        Ok(value)
    }

    /// Drops every element and returns all node storage to the resource
    pub fn clear(&mut self) {
        while let Some(node) = self.unlink_front() {
            // SAFETY: node was just unlinked from this list.
            drop(unsafe { self.release(node) });
        }
    }

    /// Cursor on the before-begin sentinel
    ///
    /// `insert_after` there prepends, `erase_after` there removes the front.
    pub fn before_begin(&mut self) -> CursorMut<'_, 'r, T> {
        CursorMut::before_begin(self)
    }

    /// Cursor on the first element, or on the end marker if the list is empty
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, 'r, T> {
        let mut cursor = CursorMut::before_begin(self);
        cursor.move_next();
        cursor
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head, self.len)
    }

    /// Exchanges contents and resources with `other`
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Detaches the first node without releasing it
    fn unlink_front(&mut self) -> Option<NonNull<Node<T>>> {
        let node = self.head?;
        // SAFETY: node is live; reading its link does not move the value.
        self.head = unsafe { (*node.as_ptr()).next };
        self.len -= 1;
        Some(node)
    }

    /// Releases an unlinked node, logging a resource that refuses it
    ///
    /// # Safety
    ///
    /// `node` belongs to this list and has been unlinked.
    unsafe fn release(&self, node: NonNull<Node<T>>) -> T {
        // SAFETY: forwarded caller contract.
        let (value, released) = unsafe { Node::destroy(self.resource, node) };

        #[cfg(feature = "logging")]
        {
            if let Err(err) = &released {
                error!(error = %err, "memory resource refused a list node");
            }
        }
        let _ = released;

        value
    }

    /// Appends every item after the current last node
    ///
    /// On failure the items appended so far stay in the list; `len` matches.
    fn append_all<I>(&mut self, iter: I) -> ListResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tail: *mut Link<T> = &raw mut self.head;

        // SAFETY: Walking and extending the chain through raw links.
        // - every link reached is either `self.head` or the `next` field of a
        //   live node owned by this list
        // - no reference into the chain exists while `&mut self` is held
        unsafe {
            while let Some(node) = *tail {
                tail = &raw mut (*node.as_ptr()).next;
            }

            for value in iter {
                let node = Node::create(self.resource, value, None)?;
                *tail = Some(node);
                tail = &raw mut (*node.as_ptr()).next;
                self.len += 1;
            }
        }

        Ok(())
    }
}

impl<T> Drop for ForwardList<'_, T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for ForwardList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq<ForwardList<'_, T>> for ForwardList<'_, T> {
    fn eq(&self, other: &ForwardList<'_, T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ForwardList<'_, T> {}

impl<T> FromIterator<T> for ForwardList<'static, T> {
    /// Collects on the default resource; aborts via `handle_alloc_error` if
    /// the system allocator is exhausted
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        if let Err(err) = list.append_all(iter) {
            allocation_failure::<T>(&err);
        }
        list
    }
}

impl<T> Extend<T> for ForwardList<'_, T> {
    /// Appends at the back, keeping iteration order
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.append_all(iter) {
            allocation_failure::<T>(&err);
        }
    }
}

/// Out-of-memory on an infallible path
#[cold]
fn allocation_failure<T>(_err: &ListError) -> ! {
    #[cfg(feature = "logging")]
    error!(error = %_err, "list node allocation failed");

    std::alloc::handle_alloc_error(Node::<T>::LAYOUT)
}
