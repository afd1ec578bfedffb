//! Cross-process memory reads
//!
//! - [`reader`] copies exact byte ranges out of a target process
//! - [`packer`] groups those bytes into 8, 16 or 32-bit values
//! - [`RemoteMemory`] ties both to handle resolution and configuration

pub mod packer;
pub mod reader;

pub use packer::{pack, pack_with_order};
pub use reader::{MemoryReader, ReaderOptions};

use crate::config::Config;
use crate::core::types::{Address, ElementWidth, MemoryResult, ProcessId, ReadRequest};
use crate::process::HandleResolver;
use tracing::debug;

/// Entry point for reads: resolver + reader, configured once
#[derive(Default)]
pub struct RemoteMemory {
    resolver: HandleResolver,
    reader: MemoryReader,
}

impl RemoteMemory {
    /// Scoped handles and default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from configuration, enabling the handle cache if
    /// requested
    pub fn from_config(config: &Config) -> Self {
        let resolver = if config.cache.enabled {
            HandleResolver::cached(config.cache.max_entries)
        } else {
            HandleResolver::scoped()
        };
        RemoteMemory {
            resolver,
            reader: MemoryReader::new(ReaderOptions::from(&config.reader)),
        }
    }

    pub fn resolver(&self) -> &HandleResolver {
        &self.resolver
    }

    pub fn reader(&self) -> &MemoryReader {
        &self.reader
    }

    /// Reads `length` raw bytes from `pid` at `address`
    pub fn read_memory(
        &self,
        pid: ProcessId,
        address: impl Into<Address>,
        length: usize,
    ) -> MemoryResult<Vec<u8>> {
        let address = address.into();
        self.resolver
            .with_handle(pid, |handle| self.reader.read(handle, address, length))
    }

    /// Reads `length` bytes and groups them into `data_size`-byte values.
    ///
    /// Trailing bytes that do not fill a whole value are dropped.
    pub fn read_memory_with_data_size(
        &self,
        pid: ProcessId,
        address: impl Into<Address>,
        length: usize,
        data_size: ElementWidth,
    ) -> MemoryResult<Vec<u32>> {
        let bytes = self.read_memory(pid, address, length)?;
        Ok(pack(&bytes, data_size))
    }

    /// Executes a [`ReadRequest`], returning its packed values
    pub fn read(&self, request: &ReadRequest) -> MemoryResult<Vec<u32>> {
        debug!(%request, "reading");
        self.read_memory_with_data_size(request.pid, request.address, request.length, request.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let memory = RemoteMemory::from_config(&Config::default());
        assert!(memory.resolver().cache().is_none());
        assert_eq!(
            memory.reader().options().max_read_size,
            Config::default().reader.max_read_size
        );
    }

    #[test]
    fn test_from_config_with_cache() {
        let mut config = Config::default();
        config.cache.enabled = true;
        config.cache.max_entries = 3;

        let memory = RemoteMemory::from_config(&config);
        assert_eq!(memory.resolver().cache().unwrap().max_entries(), 3);
    }

    #[cfg(any(windows, target_os = "linux", target_os = "macos"))]
    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_read_request() {
        let memory = RemoteMemory::new();
        let data: [u8; 8] = [1, 0, 0, 0, 2, 0, 0, 0];
        let request = ReadRequest::new(std::process::id(), data.as_ptr(), 8)
            .with_width(ElementWidth::B32);

        let values = memory.read(&request).unwrap();
        assert_eq!(
            values,
            vec![
                u32::from_ne_bytes([1, 0, 0, 0]),
                u32::from_ne_bytes([2, 0, 0, 0])
            ]
        );
    }
}
