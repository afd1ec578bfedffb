//! Owned, read-only process handle with RAII semantics

use crate::core::types::{Address, MemoryResult, ProcessId};
use crate::platform::{RawProcess, ReadFault};
use std::fmt;
use tracing::debug;

/// Read-capable reference to one process's address space.
///
/// The underlying OS resource (Windows `HANDLE`, Linux `/proc/<pid>/mem`
/// descriptor, Mach task port) is released when the value is dropped, on
/// every exit path. The handle is deliberately not `Clone`.
pub struct ProcessHandle {
    pid: ProcessId,
    raw: RawProcess,
}

impl ProcessHandle {
    /// Opens a process for reading.
    ///
    /// Fails with `ProcessNotFound`, `PermissionDenied` or
    /// `PlatformUnsupported`. Nothing is leaked on failure.
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let raw = RawProcess::open(pid)?;
        debug!(pid, "opened process handle");
        Ok(ProcessHandle { pid, raw })
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// One platform read attempt at `address`
    pub(crate) fn read_at(&self, address: Address, buf: &mut [u8]) -> Result<usize, ReadFault> {
        self.raw.read_at(address, buf)
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        debug!(pid = self.pid, "closing process handle");
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("raw", &self.raw)
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle(pid={})", self.pid)
    }
}
