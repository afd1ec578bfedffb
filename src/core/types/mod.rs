//! Core type definitions
//!
//! Address wrapper, read requests, element widths and the error type shared
//! by the resolver, the reader and the packer.

mod address;
mod error;
mod request;
mod width;

// Re-export all public types
pub use address::Address;
pub use error::{MemoryError, MemoryResult};
pub use request::ReadRequest;
pub use width::{ByteOrder, ElementWidth};

/// OS-assigned process identifier
pub type ProcessId = u32;
