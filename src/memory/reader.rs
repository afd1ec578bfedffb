//! Exact-length reads of foreign process memory
//!
//! The reader owns the completion loop: it keeps asking the platform for the
//! remainder of the range until every byte is copied or a fault stops it.
//! The platform decides what a raw failure *means*; the reader decides what
//! to *do* about it.

use crate::config::ReaderConfig;
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId, ReadRequest};
use crate::platform::ReadFault;
use crate::process::ProcessHandle;
use std::io;
use tracing::{trace, warn};

/// Limits applied to every read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Largest accepted request in bytes, unlimited when `None`
    pub max_read_size: Option<usize>,
    /// Consecutive interrupted attempts tolerated before giving up
    pub max_interrupt_retries: u32,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions::from(&ReaderConfig::default())
    }
}

impl From<&ReaderConfig> for ReaderOptions {
    fn from(config: &ReaderConfig) -> Self {
        ReaderOptions {
            max_read_size: config.max_read_size,
            max_interrupt_retries: config.max_interrupt_retries,
        }
    }
}

/// Reads exact byte ranges through a [`ProcessHandle`]. Holds no bytes
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    options: ReaderOptions,
}

impl MemoryReader {
    /// Create a new memory reader
    pub fn new(options: ReaderOptions) -> Self {
        MemoryReader { options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Reads exactly `length` bytes starting at `address`.
    ///
    /// A zero-length read returns an empty vector without touching the
    /// target. The returned bytes reflect the target's memory at some instant
    /// during the call; a page the target unmaps concurrently may fail the
    /// read.
    pub fn read(
        &self,
        handle: &ProcessHandle,
        address: Address,
        length: usize,
    ) -> MemoryResult<Vec<u8>> {
        self.read_with(handle.pid(), address, length, |cursor, buf| {
            handle.read_at(cursor, buf)
        })
    }

    /// Validates the range, allocates the buffer and runs the completion
    /// loop over `attempt`, one platform read per call.
    pub(crate) fn read_with<F>(
        &self,
        pid: ProcessId,
        address: Address,
        length: usize,
        attempt: F,
    ) -> MemoryResult<Vec<u8>>
    where
        F: FnMut(Address, &mut [u8]) -> Result<usize, ReadFault>,
    {
        if length == 0 {
            return Ok(Vec::new());
        }
        if let Some(limit) = self.options.max_read_size {
            if length > limit {
                return Err(MemoryError::ReadTooLarge {
                    requested: length,
                    limit,
                });
            }
        }
        ReadRequest::new(pid, address, length).end()?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(length)
            .map_err(|err| MemoryError::Io(io::Error::new(io::ErrorKind::OutOfMemory, err)))?;
        buffer.resize(length, 0);

        self.fill(pid, address, &mut buffer, attempt)?;
        Ok(buffer)
    }

    /// Fills `buffer` from `address`, looping until it is full
    fn fill<F>(
        &self,
        pid: ProcessId,
        address: Address,
        buffer: &mut [u8],
        mut attempt: F,
    ) -> MemoryResult<()>
    where
        F: FnMut(Address, &mut [u8]) -> Result<usize, ReadFault>,
    {
        let requested = buffer.len();
        let mut done = 0;
        let mut interrupts = 0;

        while done < requested {
            // Cannot overflow: the whole range was checked against u64 already
            let cursor = Address::new(address.as_u64() + done as u64);

            match attempt(cursor, &mut buffer[done..]) {
                Ok(0) => {
                    trace!(pid, %cursor, "read made no progress");
                    return Err(MemoryError::short_read(address, requested, done));
                }
                Ok(read) => {
                    done += read.min(requested - done);
                    interrupts = 0;
                }
                Err(ReadFault::Interrupted) => {
                    interrupts += 1;
                    if interrupts > self.options.max_interrupt_retries {
                        warn!(
                            pid,
                            %cursor,
                            attempts = interrupts,
                            "giving up after repeated interrupted reads"
                        );
                        return Err(MemoryError::short_read(address, requested, done));
                    }
                }
                Err(ReadFault::Unmapped) if done > 0 => {
                    return Err(MemoryError::short_read(address, requested, done));
                }
                Err(fault) => return Err(fault.into_error(pid, cursor)),
            }
        }

        Ok(())
    }
}
