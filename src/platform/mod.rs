//! Platform backends for opening processes and reading their memory
//!
//! Exactly one backend is compiled in, selected by target OS. Each backend
//! exposes the same surface:
//!
//! - `RawProcess::open(pid)` acquires a read-capable reference and releases it
//!   on `Drop`.
//! - `RawProcess::read_at(address, buf)` performs one read attempt and
//!   classifies the outcome into a [`ReadFault`] when no bytes were copied.
//!
//! Which raw error codes count as "interrupted, retry" and which as "faulted"
//! is decided here, per platform, and nowhere else.

use crate::core::types::{Address, MemoryError, ProcessId};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::RawProcess;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use self::linux::RawProcess;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use self::macos::RawProcess;

#[cfg(not(any(windows, target_os = "linux", target_os = "macos")))]
mod unsupported;
#[cfg(not(any(windows, target_os = "linux", target_os = "macos")))]
pub use self::unsupported::RawProcess;

/// Why a single read attempt copied no bytes.
#[derive(Debug)]
pub enum ReadFault {
    /// The call was interrupted before completing; retrying at the same
    /// address is safe.
    Interrupted,
    /// The byte at the requested address is not mapped or not readable.
    Unmapped,
    /// The target process no longer exists.
    ProcessGone,
    /// The caller lacks the right to read the target.
    Denied(String),
    /// No cross-process read mechanism is available on this system.
    Unsupported,
    /// Anything else the platform reported.
    Os(std::io::Error),
}

impl ReadFault {
    /// Converts a fault that is not handled by the completion loop into the
    /// public error type.
    pub fn into_error(self, pid: ProcessId, address: Address) -> MemoryError {
        match self {
            ReadFault::Unmapped => MemoryError::invalid_address(address, "not mapped or not readable"),
            ReadFault::ProcessGone => MemoryError::HandleInvalid { pid },
            ReadFault::Denied(reason) => MemoryError::permission_denied(pid, reason),
            ReadFault::Unsupported => MemoryError::platform_unsupported(),
            ReadFault::Os(err) => MemoryError::Io(err),
            ReadFault::Interrupted => MemoryError::Io(std::io::Error::from(
                std::io::ErrorKind::Interrupted,
            )),
        }
    }
}

/// Number of bytes from `address` up to the next page boundary, capped at
/// `len`.
///
/// Backends whose read primitive is all-or-nothing use this to retry a failed
/// read on just the first page, so a readable prefix is still copied and the
/// fault is reported at the page that actually holds it.
#[cfg_attr(not(any(windows, target_os = "macos")), allow(dead_code))]
pub fn page_span(address: Address, len: usize, page_size: u64) -> usize {
    let next = address
        .checked_add(1)
        .and_then(|next| next.align_up(page_size))
        .map(|boundary| boundary.as_u64() - address.as_u64())
        .unwrap_or(u64::MAX - address.as_u64() + 1);
    usize::try_from(next).map_or(len, |span| span.min(len))
}
