//! Memory resources
//!
//! - [`MemoryResource`]: the capability containers allocate through
//! - [`SystemResource`]: the process allocator, default for everything
//! - [`TrackedResource`]: counting wrapper used to find leaks

mod system;
mod tracked;
mod traits;

pub use system::{SystemResource, default_resource};
pub(crate) use system::dangling_for;
pub use tracked::{TrackedResource, TrackingStats};
pub use traits::{MemoryResource, same_resource};
