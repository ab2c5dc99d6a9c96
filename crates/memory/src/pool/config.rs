//! Block pool configuration

use std::borrow::Cow;

/// Configuration for [`BlockPool`](super::BlockPool)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPoolConfig {
    /// Name attached to every diagnostic the pool emits
    pub name: Cow<'static, str>,

    /// Fill pattern byte for handed-out memory (for debugging)
    pub alloc_pattern: Option<u8>,
    /// Fill pattern byte for released memory (for debugging)
    pub dealloc_pattern: Option<u8>,

    /// Emit a warning when asked to release an address the pool never handed out
    pub warn_on_unknown: bool,
}

impl Default for BlockPoolConfig {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("block-pool"),
            alloc_pattern: if cfg!(debug_assertions) {
                Some(0xBB)
            } else {
                None
            },
            dealloc_pattern: if cfg!(debug_assertions) {
                Some(0xDD)
            } else {
                None
            },
            warn_on_unknown: true,
        }
    }
}

impl BlockPoolConfig {
    /// Production configuration - no fill patterns
    #[must_use]
    pub fn production() -> Self {
        Self {
            alloc_pattern: None,
            dealloc_pattern: None,
            ..Self::default()
        }
    }

    /// Debug configuration - poison memory on both edges
    #[must_use]
    pub fn debug() -> Self {
        Self {
            alloc_pattern: Some(0xBB),
            dealloc_pattern: Some(0xDD),
            ..Self::default()
        }
    }

    /// Performance configuration - minimal overhead, silent on foreign pointers
    #[must_use]
    pub fn performance() -> Self {
        Self {
            alloc_pattern: None,
            dealloc_pattern: None,
            warn_on_unknown: false,
            ..Self::default()
        }
    }

    /// Sets the diagnostic name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}
