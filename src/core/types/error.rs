//! Error types for cross-process memory reads

use super::address::Address;
use super::ProcessId;
use thiserror::Error;

/// Main error type for memory operations
///
/// Every variant is recoverable: after any of them the caller may keep
/// issuing reads.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    #[error("Permission denied for process {pid}: {reason}")]
    PermissionDenied { pid: ProcessId, reason: String },

    #[error("Platform unsupported: {0}")]
    PlatformUnsupported(String),

    #[error("Invalid memory address {address}: {reason}")]
    InvalidAddress { address: Address, reason: String },

    #[error("Short read at {address}: requested {requested} bytes, got {read}")]
    ShortRead {
        address: Address,
        requested: usize,
        read: usize,
    },

    #[error("Handle for process {pid} is no longer valid")]
    HandleInvalid { pid: ProcessId },

    #[error("Invalid data type size: {0} (expected 1, 2 or 4)")]
    InvalidDataTypeSize(u32),

    #[error("Read of {requested} bytes exceeds the configured limit of {limit}")]
    ReadTooLarge { requested: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a permission denied error for a process
    pub fn permission_denied(pid: ProcessId, reason: impl Into<String>) -> Self {
        MemoryError::PermissionDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates an invalid address error
    pub fn invalid_address(address: Address, reason: impl Into<String>) -> Self {
        MemoryError::InvalidAddress {
            address,
            reason: reason.into(),
        }
    }

    /// Creates a short read error
    pub fn short_read(address: Address, requested: usize, read: usize) -> Self {
        MemoryError::ShortRead {
            address,
            requested,
            read,
        }
    }

    /// Creates the error returned on targets without a backend
    pub fn platform_unsupported() -> Self {
        MemoryError::PlatformUnsupported(std::env::consts::OS.to_string())
    }

    /// Whether the handle used for the failed operation must be discarded
    pub fn invalidates_handle(&self) -> bool {
        matches!(self, MemoryError::HandleInvalid { .. })
    }
}
