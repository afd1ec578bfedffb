//! Linux backend: `process_vm_readv` with a `/proc/<pid>/mem` fallback

use super::ReadFault;
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use libc::{c_void, iovec, pid_t};
use std::fs::{self, File};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::Path;
use tracing::{debug, trace};

/// Read-capable reference to a Linux process.
///
/// `process_vm_readv` addresses the target by pid; the `/proc/<pid>/mem`
/// descriptor is opened eagerly so permission problems surface at resolve
/// time and so reads still work where the syscall is unavailable or filtered.
///
/// A pid alone does not pin a process, so the start time recorded at open is
/// compared after every syscall read. A mismatch means the pid now names a
/// different process and the bytes are discarded.
#[derive(Debug)]
pub struct RawProcess {
    pid: pid_t,
    mem: Option<File>,
    start_time: Option<u64>,
}

/// Next step after `process_vm_readv` failed
#[derive(Debug)]
enum SyscallFailure {
    /// Retry the same range through the `/proc/<pid>/mem` descriptor
    Pread,
    Fault(ReadFault),
}

impl RawProcess {
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let raw_pid = match pid_t::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return Err(MemoryError::ProcessNotFound(pid)),
        };

        // Signal 0 only checks existence. EPERM still means the process exists.
        if unsafe { libc::kill(raw_pid, 0) } == -1
            && io::Error::last_os_error().raw_os_error() == Some(libc::ESRCH)
        {
            return Err(MemoryError::ProcessNotFound(pid));
        }

        let mem = match File::open(format!("/proc/{raw_pid}/mem")) {
            Ok(file) => Some(file),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Err(MemoryError::permission_denied(
                    pid,
                    format!("cannot open /proc/{raw_pid}/mem: {err}"),
                ));
            }
            // Zombies and kernel threads have no address space left to read
            Err(err) if err.raw_os_error() == Some(libc::ESRCH) => {
                debug!(pid, "process has no address space");
                return Err(MemoryError::ProcessNotFound(pid));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if Path::new("/proc/self/mem").exists() {
                    // procfs is there, so the process exited after the probe
                    return Err(MemoryError::ProcessNotFound(pid));
                }
                None
            }
            Err(err) => return Err(MemoryError::Io(err)),
        };

        let start_time = match mem {
            Some(_) => match read_start_time(raw_pid) {
                Some(start) => Some(start),
                None => return Err(MemoryError::ProcessNotFound(pid)),
            },
            None => None,
        };

        Ok(RawProcess {
            pid: raw_pid,
            mem,
            start_time,
        })
    }

    pub fn read_at(&self, address: Address, buf: &mut [u8]) -> Result<usize, ReadFault> {
        let Some(remote) = address.to_usize() else {
            return Err(ReadFault::Unmapped);
        };

        let local_iov = iovec {
            iov_base: buf.as_mut_ptr() as *mut c_void,
            iov_len: buf.len(),
        };
        let remote_iov = iovec {
            iov_base: remote as *mut c_void,
            iov_len: buf.len(),
        };

        let result = unsafe { libc::process_vm_readv(self.pid, &local_iov, 1, &remote_iov, 1, 0) };
        if result >= 0 {
            trace!(pid = self.pid, %address, read = result, "process_vm_readv");
            if !self.is_same_process() {
                debug!(pid = self.pid, "pid was reused by another process");
                return Err(ReadFault::ProcessGone);
            }
            return Ok(result as usize);
        }

        match classify_syscall_error(io::Error::last_os_error(), self.mem.is_some()) {
            SyscallFailure::Pread => self.pread(address, buf),
            SyscallFailure::Fault(fault) => Err(fault),
        }
    }

    /// Whether the pid still names the process opened, as far as procfs
    /// can tell
    fn is_same_process(&self) -> bool {
        match self.start_time {
            Some(start) => read_start_time(self.pid) == Some(start),
            None => true,
        }
    }

    fn pread(&self, address: Address, buf: &mut [u8]) -> Result<usize, ReadFault> {
        let Some(mem) = &self.mem else {
            return Err(ReadFault::Unsupported);
        };

        match mem.read_at(buf, address.as_u64()) {
            // The target's address space is gone once the process has exited
            Ok(0) => Err(ReadFault::ProcessGone),
            Ok(read) => {
                trace!(pid = self.pid, %address, read, "pread /proc/pid/mem");
                Ok(read)
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Err(ReadFault::Interrupted),
            Err(err) => match err.raw_os_error() {
                Some(libc::EIO) | Some(libc::EFAULT) => Err(ReadFault::Unmapped),
                Some(libc::ESRCH) => Err(ReadFault::ProcessGone),
                Some(libc::EACCES) | Some(libc::EPERM) => Err(ReadFault::Denied(err.to_string())),
                _ => Err(ReadFault::Os(err)),
            },
        }
    }
}

fn classify_syscall_error(err: io::Error, has_mem: bool) -> SyscallFailure {
    match err.raw_os_error() {
        Some(libc::EINTR) => SyscallFailure::Fault(ReadFault::Interrupted),
        Some(libc::EFAULT) | Some(libc::EIO) => SyscallFailure::Fault(ReadFault::Unmapped),
        Some(libc::ESRCH) => SyscallFailure::Fault(ReadFault::ProcessGone),
        Some(libc::EPERM) | Some(libc::ENOSYS) if has_mem => SyscallFailure::Pread,
        Some(libc::EPERM) => SyscallFailure::Fault(ReadFault::Denied(err.to_string())),
        Some(libc::ENOSYS) => SyscallFailure::Fault(ReadFault::Unsupported),
        _ => SyscallFailure::Fault(ReadFault::Os(err)),
    }
}

fn read_start_time(pid: pid_t) -> Option<u64> {
    let stat = fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    parse_start_time(&stat)
}

/// Field 22 of `/proc/<pid>/stat`, in clock ticks since boot
fn parse_start_time(stat: &str) -> Option<u64> {
    // The command name may hold spaces and parentheses; fields resume after
    // the last ')'
    let fields = &stat[stat.rfind(')')? + 1..];
    fields.split_whitespace().nth(19)?.parse().ok()
}
