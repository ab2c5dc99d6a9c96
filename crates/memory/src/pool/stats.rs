//! Block pool statistics

use core::fmt;

/// Point-in-time counters of a [`BlockPool`](super::BlockPool)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockPoolStats {
    /// Blocks ever obtained from the parent and not yet returned
    pub total_blocks: usize,
    /// Blocks currently handed out
    pub active_blocks: usize,
    /// Bytes reserved from the parent across all blocks
    pub reserved_bytes: usize,
    /// Bytes of the blocks currently handed out
    pub active_bytes: usize,
    /// Requests served from a free block
    pub reuse_count: usize,
    /// Requests forwarded to the parent
    pub grow_count: usize,
}

impl BlockPoolStats {
    pub fn free_blocks(&self) -> usize {
        self.total_blocks - self.active_blocks
    }

    /// Reserved bytes held by free blocks, ready for reuse
    pub fn free_bytes(&self) -> usize {
        self.reserved_bytes - self.active_bytes
    }

    /// Fraction of reserved bytes currently handed out, 0.0 for an empty pool
    pub fn utilization(&self) -> f64 {
        if self.reserved_bytes == 0 {
            0.0
        } else {
            self.active_bytes as f64 / self.reserved_bytes as f64
        }
    }

    /// Share of requests served without touching the parent
    pub fn reuse_ratio(&self) -> f64 {
        let requests = self.reuse_count + self.grow_count;
        if requests == 0 {
            0.0
        } else {
            self.reuse_count as f64 / requests as f64
        }
    }
}

impl fmt::Display for BlockPoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blocks: {} total, {} active, {} free; reserved: {} bytes ({} active)",
            self.total_blocks,
            self.active_blocks,
            self.free_blocks(),
            self.reserved_bytes,
            self.active_bytes
        )
    }
}
