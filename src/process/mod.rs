//! Process handle resolution
//!
//! Turns a process id into a read-capable handle, either scoped to a single
//! operation or kept in a bounded cache.

pub mod cache;
pub mod handle;
pub mod resolver;

pub use cache::{HandleCache, SharedHandle};
pub use handle::ProcessHandle;
pub use resolver::HandleResolver;
