//! Remote-Memory: read byte ranges out of another process's address space
//!
//! Given a process id, a virtual address and a length, the crate copies that
//! many bytes from the target into a local buffer, optionally regrouping them
//! into 8, 16 or 32-bit values. Windows, Linux and macOS are supported; other
//! targets compile but fail every open with
//! [`MemoryError::PlatformUnsupported`].
//!
//! ```no_run
//! use remote_memory::{read_memory, read_memory_with_data_size, ElementWidth};
//!
//! # fn main() -> remote_memory::MemoryResult<()> {
//! let bytes = read_memory(1234, 0x7ff6_1000_0000u64, 16)?;
//! let words = read_memory_with_data_size(1234, 0x7ff6_1000_0000u64, 16, ElementWidth::B32)?;
//! assert_eq!(words.len(), bytes.len() / 4);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod memory;
mod platform;
pub mod process;

// Re-export main types from core module
pub use core::types::{
    Address, ByteOrder, ElementWidth, MemoryError, MemoryResult, ProcessId, ReadRequest,
};
pub use core::{AUTHORS, VERSION};
pub use memory::{pack, MemoryReader, ReaderOptions, RemoteMemory};
pub use process::{HandleResolver, ProcessHandle};

/// Reads `length` bytes from process `pid` starting at `address`.
///
/// The handle is opened for this call only. On success the vector holds
/// exactly `length` bytes.
pub fn read_memory(
    pid: ProcessId,
    address: impl Into<Address>,
    length: usize,
) -> MemoryResult<Vec<u8>> {
    RemoteMemory::new().read_memory(pid, address, length)
}

/// Reads `length` bytes and groups them into values of `data_size` bytes in
/// native byte order. Trailing bytes short of a full value are dropped.
pub fn read_memory_with_data_size(
    pid: ProcessId,
    address: impl Into<Address>,
    length: usize,
    data_size: ElementWidth,
) -> MemoryResult<Vec<u32>> {
    RemoteMemory::new().read_memory_with_data_size(pid, address, length, data_size)
}
