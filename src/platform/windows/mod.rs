//! Windows backend: `OpenProcess` + `ReadProcessMemory`
//!
//! `ReadProcessMemory` is never interrupted, so this backend never reports
//! [`ReadFault::Interrupted`]. A failed call may still have copied a prefix;
//! when it copied nothing the read is retried up to the next page boundary to
//! find out whether the first page is readable at all.

mod error_codes;
mod handle;
mod kernel32;

use self::error_codes::ErrorCode;
use self::handle::Handle;
use self::kernel32::page_size;
use super::{page_span, ReadFault};
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use tracing::trace;
use winapi::um::winnt::{PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

/// Read-capable Windows process handle
#[derive(Debug)]
pub struct RawProcess {
    handle: Handle,
}

impl RawProcess {
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        match kernel32::open_process(pid, PROCESS_VM_READ | PROCESS_QUERY_INFORMATION) {
            Ok(raw) => Ok(RawProcess {
                handle: Handle::new(raw),
            }),
            // OpenProcess reports unknown pids (and pid 0) as a bad parameter
            Err(ErrorCode::InvalidParameter) => Err(MemoryError::ProcessNotFound(pid)),
            Err(ErrorCode::AccessDenied) => Err(MemoryError::permission_denied(
                pid,
                "OpenProcess(PROCESS_VM_READ) denied",
            )),
            Err(code) => Err(MemoryError::Io(code.to_io_error())),
        }
    }

    pub fn read_at(&self, address: Address, buf: &mut [u8]) -> Result<usize, ReadFault> {
        let Some(remote) = address.to_usize() else {
            return Err(ReadFault::Unmapped);
        };

        match self.read_raw(remote, buf) {
            Ok(read) => Ok(read),
            Err((code, copied)) if code.is_unreadable_memory() => {
                if copied > 0 {
                    return Ok(copied);
                }
                let span = page_span(address, buf.len(), page_size());
                if span < buf.len() {
                    if let Ok(read) = self.read_raw(remote, &mut buf[..span]) {
                        return Ok(read);
                    }
                }
                if unsafe { kernel32::process_has_exited(self.handle.raw()) } {
                    Err(ReadFault::ProcessGone)
                } else {
                    Err(ReadFault::Unmapped)
                }
            }
            Err((ErrorCode::AccessDenied, _)) => {
                Err(ReadFault::Denied(ErrorCode::AccessDenied.to_string()))
            }
            Err((ErrorCode::InvalidHandle, _)) => Err(ReadFault::ProcessGone),
            Err((code, _)) => Err(ReadFault::Os(code.to_io_error())),
        }
    }

    fn read_raw(&self, remote: usize, buf: &mut [u8]) -> Result<usize, (ErrorCode, usize)> {
        let result = unsafe { kernel32::read_process_memory(self.handle.raw(), remote, buf) };
        trace!(address = remote, len = buf.len(), ?result, "ReadProcessMemory");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_self_and_read() {
        let process = RawProcess::open(std::process::id()).unwrap();
        let data: [u8; 4] = [1, 2, 3, 4];
        let mut buf = [0u8; 4];
        let read = process.read_at(Address::from(data.as_ptr()), &mut buf).unwrap();
        assert_eq!(read, 4);
        assert_eq!(buf, data);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_pid_zero() {
        assert!(matches!(
            RawProcess::open(0),
            Err(MemoryError::ProcessNotFound(0))
        ));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_null_page_is_unmapped() {
        let process = RawProcess::open(std::process::id()).unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(
            process.read_at(Address::null(), &mut buf),
            Err(ReadFault::Unmapped)
        ));
    }
}
