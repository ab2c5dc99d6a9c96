//! Error types for tessera-collections

use tessera_memory::MemoryError;
use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::debug;

/// Container errors
///
/// List-level variants are reported before anything is changed, so the list
/// is exactly as it was before the failing call.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("{operation} called on an empty list")]
    EmptyContainer { operation: &'static str },

    #[error("{operation} needs a position with a successor")]
    InvalidPosition { operation: &'static str },

    /// The memory resource refused a request
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

impl ListError {
    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyContainer { .. } => "LIST:EMPTY",
            Self::InvalidPosition { .. } => "LIST:POSITION",
            Self::Memory(err) => err.code(),
        }
    }

    /// Create empty container error
    pub fn empty_container(operation: &'static str) -> Self {
        #[cfg(feature = "logging")]
        debug!(operation, "operation on empty list");

        Self::EmptyContainer { operation }
    }

    /// Create invalid position error
    pub fn invalid_position(operation: &'static str) -> Self {
        #[cfg(feature = "logging")]
        debug!(operation, "position has no successor");

        Self::InvalidPosition { operation }
    }
}

/// Result type for container operations
pub type ListResult<T> = core::result::Result<T, ListError>;
