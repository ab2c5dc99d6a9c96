//! Positional editing of a [`ForwardList`]
//!
//! A singly-linked list can only splice *after* a position, so the cursor
//! knows three kinds of place: the before-begin sentinel, an element, and the
//! end marker past the last element.

use core::fmt;
use core::ptr::NonNull;

use super::node::{Link, Node};
use super::ForwardList;
use crate::error::{ListError, ListResult};

enum Position<T> {
    BeforeBegin,
    At(NonNull<Node<T>>),
    End,
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> From<Link<T>> for Position<T> {
    fn from(link: Link<T>) -> Self {
        link.map_or(Self::End, Self::At)
    }
}

/// A cursor that can insert and erase after its position
///
/// Holds the list mutably, so the node it points at cannot be removed from
/// under it: `erase_after` only ever removes the successor.
///
/// # Examples
///
/// ```rust
/// use tessera_collections::ForwardList;
///
/// let mut list: ForwardList<'_, i32> = [1, 3].into_iter().collect();
///
/// let mut cursor = list.cursor_front_mut();
/// cursor.insert_after(2)?;
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.erase_after().is_err()); // 3 is last
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
/// # Ok::<(), tessera_collections::ListError>(())
/// ```
pub struct CursorMut<'a, 'r, T> {
    list: &'a mut ForwardList<'r, T>,
    position: Position<T>,
}

impl<'a, 'r, T> CursorMut<'a, 'r, T> {
    pub(super) fn before_begin(list: &'a mut ForwardList<'r, T>) -> Self {
        Self {
            list,
            position: Position::BeforeBegin,
        }
    }

    pub fn is_before_begin(&self) -> bool {
        matches!(self.position, Position::BeforeBegin)
    }

    /// Past the last element; nothing can be inserted or erased after it
    pub fn is_end(&self) -> bool {
        matches!(self.position, Position::End)
    }

    /// Steps to the next position; the end marker is a fixed point
    pub fn move_next(&mut self) {
        self.position = match self.position {
            Position::BeforeBegin => self.list.head.into(),
            // SAFETY: the node is live while the cursor borrows the list.
            Position::At(node) => unsafe { (*node.as_ptr()).next }.into(),
            Position::End => Position::End,
        };
    }

    /// Element under the cursor, `None` on the sentinel or the end marker
    pub fn current(&mut self) -> Option<&mut T> {
        match self.position {
            // SAFETY: the node is live and the cursor has exclusive access.
            Position::At(node) => Some(unsafe { &mut (*node.as_ptr()).value }),
            _ => None,
        }
    }

    /// Element right after the cursor
    pub fn peek_next(&mut self) -> Option<&mut T> {
        let link = self.next_link()?;
        // SAFETY: link points into the list and any node it holds is live.
        unsafe { (*link.as_ptr()).map(|node| &mut (*node.as_ptr()).value) }
    }

    /// Links a new node holding `value` right after the cursor
    ///
    /// On the before-begin sentinel this prepends. The cursor does not move;
    /// the new element is returned.
    pub fn insert_after(&mut self, value: T) -> ListResult<&mut T> {
        let link = self
            .next_link()
            .ok_or_else(|| ListError::invalid_position("insert_after"))?;

        // SAFETY: link points into the list; `Link` is `Copy`.
        let successor = unsafe { *link.as_ptr() };
        let node = Node::create(self.list.resource, value, successor)?;

        // SAFETY: link still points into the list; nothing was unlinked since.
        unsafe { *link.as_ptr() = Some(node) };
        self.list.len += 1;

        // SAFETY: node was just created and is owned by the list.
        Ok(unsafe { &mut (*node.as_ptr()).value })
    }

    /// Unlinks the successor and hands back its value
    pub fn remove_after(&mut self) -> ListResult<T> {
        self.unlink_after("remove_after").and_then(|node| {
            // SAFETY: node was just unlinked from the list.
            let (value, released) = unsafe { Node::destroy(self.list.resource, node) };
            released?;
            Ok(value)
        })
    }

    /// Destroys the successor and returns the new one
    ///
    /// Fails with [`ListError::InvalidPosition`] when there is no successor:
    /// on the last element, on the end marker, or on the sentinel of an empty
    /// list. The list is unchanged in that case.
    pub fn erase_after(&mut self) -> ListResult<Option<&mut T>> {
        let node = self.unlink_after("erase_after")?;
        // SAFETY: node was just unlinked from the list.
        let (value, released) = unsafe { Node::destroy(self.list.resource, node) };
        drop(value);
        released?;
        Ok(self.peek_next())
    }

    fn unlink_after(&mut self, operation: &'static str) -> ListResult<NonNull<Node<T>>> {
        let link = self
            .next_link()
            .ok_or_else(|| ListError::invalid_position(operation))?;

        // SAFETY: link points into the list; a linked node is live.
        unsafe {
            let node = (*link.as_ptr()).ok_or_else(|| ListError::invalid_position(operation))?;
            *link.as_ptr() = (*node.as_ptr()).next;
            self.list.len -= 1;
            Ok(node)
        }
    }

    /// The link that holds the successor, `None` on the end marker
    fn next_link(&mut self) -> Option<NonNull<Link<T>>> {
        match self.position {
            Position::BeforeBegin => Some(NonNull::from(&mut self.list.head)),
            // SAFETY: the node is live while the cursor borrows the list.
            Position::At(node) => Some(unsafe { NonNull::from(&mut (*node.as_ptr()).next) }),
            Position::End => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position: &dyn fmt::Debug = match self.position {
            Position::BeforeBegin => &"before-begin",
            // SAFETY: the node is live while the cursor borrows the list.
            Position::At(node) => unsafe { &(*node.as_ptr()).value },
            Position::End => &"end",
        };
        f.debug_struct("CursorMut")
            .field("position", position)
            .field("list", &self.list)
            .finish()
    }
}
