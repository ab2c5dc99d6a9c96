//! Block records kept by the pool registry

use core::alloc::Layout;
use core::fmt;
use core::ptr::NonNull;

/// Whether a block is currently handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Exactly one consumer holds the address
    Active,
    /// No consumer holds it; bytes stay reserved for reuse
    Free,
}

/// One allocation obtained from the parent resource
#[derive(Debug)]
pub(crate) struct Block {
    pub(crate) ptr: NonNull<u8>,
    /// Layout requested when the block was first obtained from the parent
    pub(crate) layout: Layout,
    pub(crate) state: BlockState,
}

impl Block {
    pub(crate) fn new(ptr: NonNull<u8>, layout: Layout) -> Self {
        Self {
            ptr,
            layout,
            state: BlockState::Active,
        }
    }

    /// First-fit predicate: free, large enough, aligned at least as strictly
    #[inline]
    pub(crate) fn fits(&self, layout: Layout) -> bool {
        self.state == BlockState::Free
            && self.layout.size() >= layout.size()
            && self.layout.align() >= layout.align()
    }

    pub(crate) fn info(&self) -> BlockInfo {
        BlockInfo {
            address: self.ptr.as_ptr() as usize,
            size: self.layout.size(),
            align: self.layout.align(),
            state: self.state,
        }
    }
}

/// Read-only view of a block for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub address: usize,
    pub size: usize,
    pub align: usize,
    pub state: BlockState,
}

impl BlockInfo {
    pub fn is_active(&self) -> bool {
        self.state == BlockState::Active
    }
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}: {} bytes, align {}, {}",
            self.address,
            self.size,
            self.align,
            if self.is_active() { "active" } else { "free" }
        )
    }
}
