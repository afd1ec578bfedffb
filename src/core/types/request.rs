//! Read request value object

use super::address::Address;
use super::error::{MemoryError, MemoryResult};
use super::width::ElementWidth;
use super::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single read: which process, where, how many bytes, and how to group them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub pid: ProcessId,
    pub address: Address,
    pub length: usize,
    #[serde(default)]
    pub width: ElementWidth,
}

impl ReadRequest {
    /// Creates an ungrouped request
    pub fn new(pid: ProcessId, address: impl Into<Address>, length: usize) -> Self {
        ReadRequest {
            pid,
            address: address.into(),
            length,
            width: ElementWidth::B8,
        }
    }

    /// Sets the element width
    pub fn with_width(mut self, width: ElementWidth) -> Self {
        self.width = width;
        self
    }

    /// One past the last byte of the request.
    ///
    /// Fails when `address + length` does not fit in the address
    /// representation.
    pub fn end(&self) -> MemoryResult<Address> {
        u64::try_from(self.length)
            .ok()
            .and_then(|length| self.address.checked_add(length))
            .ok_or_else(|| {
                MemoryError::invalid_address(
                    self.address,
                    format!("range of {} bytes overflows the address space", self.length),
                )
            })
    }

    /// Number of values the request yields
    pub fn value_count(&self) -> usize {
        self.length / self.width.bytes()
    }
}

impl fmt::Display for ReadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid {} @ {} [{} bytes, {}]",
            self.pid, self.address, self.length, self.width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_end() {
        let request = ReadRequest::new(1, 0x1000u64, 0x20);
        assert_eq!(request.end().unwrap(), Address::new(0x1020));

        let zero = ReadRequest::new(1, u64::MAX, 0);
        assert_eq!(zero.end().unwrap(), Address::new(u64::MAX));
    }

    #[test]
    fn test_request_end_overflow() {
        let request = ReadRequest::new(1, u64::MAX - 3, 8);
        assert!(matches!(
            request.end(),
            Err(MemoryError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_value_count_truncates() {
        let request = ReadRequest::new(1, 0u64, 7).with_width(ElementWidth::B32);
        assert_eq!(request.value_count(), 1);

        let request = ReadRequest::new(1, 0u64, 5).with_width(ElementWidth::B16);
        assert_eq!(request.value_count(), 2);

        let request = ReadRequest::new(1, 0u64, 5);
        assert_eq!(request.value_count(), 5);
    }

    #[test]
    fn test_request_display() {
        let request = ReadRequest::new(42, 0x10u64, 8).with_width(ElementWidth::B16);
        assert_eq!(
            request.to_string(),
            "pid 42 @ 0x0000000000000010 [8 bytes, 16-bit]"
        );
    }
}
