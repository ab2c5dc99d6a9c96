//! Error types for tessera-memory
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use core::alloc::Layout;
use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::error;

// ============================================================================
// Main Error Types
// ============================================================================

/// Memory resource errors
///
/// None of these are transient: every variant reports either an exhausted
/// parent allocator or a violation of the allocate/deallocate protocol, so
/// there is no retry classification.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    // --- Allocation Errors ---
    #[error("Memory allocation failed: {size} bytes with {align} byte alignment")]
    AllocationFailed { size: usize, align: usize },

    #[error("Invalid memory layout: {reason}")]
    InvalidLayout { reason: String },

    // --- Pool Errors ---
    #[error("Double deallocation detected at {address:#x} ({size} bytes, align {align})")]
    DoubleFree {
        address: usize,
        size: usize,
        align: usize,
    },
}

impl MemoryError {
    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailed { .. } => "MEM:ALLOC:FAILED",
            Self::InvalidLayout { .. } => "MEM:ALLOC:LAYOUT",
            Self::DoubleFree { .. } => "MEM:POOL:DOUBLE_FREE",
        }
    }

    /// Returns `true` for the pool protocol violation
    #[must_use]
    pub fn is_double_free(&self) -> bool {
        matches!(self, Self::DoubleFree { .. })
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create allocation failed error
    pub fn allocation_failed(size: usize, align: usize) -> Self {
        #[cfg(feature = "logging")]
        error!(size, align, "memory allocation failed");

        Self::AllocationFailed { size, align }
    }

    /// Create allocation failed error from layout
    pub fn allocation_failed_with_layout(layout: Layout) -> Self {
        Self::allocation_failed(layout.size(), layout.align())
    }

    /// Create invalid layout error
    pub fn invalid_layout(reason: &str) -> Self {
        Self::InvalidLayout {
            reason: reason.to_string(),
        }
    }

    /// Create double free error for the block registered at `address`
    pub fn double_free(address: usize, layout: Layout) -> Self {
        #[cfg(feature = "logging")]
        error!(
            address,
            size = layout.size(),
            align = layout.align(),
            "double deallocation detected"
        );

        Self::DoubleFree {
            address,
            size: layout.size(),
            align: layout.align(),
        }
    }
}

impl From<core::alloc::LayoutError> for MemoryError {
    fn from(err: core::alloc::LayoutError) -> Self {
        Self::invalid_layout(&err.to_string())
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for memory operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;

/// Aliases used by the resource layer
pub type AllocError = MemoryError;
pub type AllocResult<T> = MemoryResult<T>;

// ============================================================================
// Tests
// ============================================================================
