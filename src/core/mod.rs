//! Core module containing the fundamental types of Remote-Memory
//!
//! Addresses, read requests, element widths and the error type used
//! throughout the crate.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, ByteOrder, ElementWidth, MemoryError, MemoryResult, ProcessId, ReadRequest,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
