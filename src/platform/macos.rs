//! macOS backend: Mach task ports + `mach_vm_read_overwrite`

use super::{page_span, ReadFault};
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use libc::{c_int, pid_t};
use mach2::kern_return::{
    kern_return_t, KERN_ABORTED, KERN_INVALID_ADDRESS, KERN_INVALID_ARGUMENT,
    KERN_PROTECTION_FAILURE, KERN_SUCCESS,
};
use mach2::mach_port::mach_port_deallocate;
use mach2::port::{mach_port_name_t, MACH_PORT_NULL};
use mach2::traps::{mach_task_self, task_for_pid};
use mach2::vm::mach_vm_read_overwrite;
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};
use std::io;
use tracing::{debug, trace};

const KERN_TERMINATED: kern_return_t = 37;
const MACH_SEND_INVALID_DEST: kern_return_t = 0x1000_0003;
const MACH_SEND_INTERRUPTED: kern_return_t = 0x1000_0007;
const MACH_RCV_INTERRUPTED: kern_return_t = 0x1000_4005;

/// Mach task port for a process, deallocated on drop unless it is our own
#[derive(Debug)]
pub struct RawProcess {
    task: mach_port_name_t,
    owned: bool,
}

impl RawProcess {
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let raw_pid = match pid_t::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return Err(MemoryError::ProcessNotFound(pid)),
        };

        if raw_pid == unsafe { libc::getpid() } {
            return Ok(RawProcess {
                task: unsafe { mach_task_self() },
                owned: false,
            });
        }

        if unsafe { libc::kill(raw_pid, 0) } == -1
            && io::Error::last_os_error().raw_os_error() == Some(libc::ESRCH)
        {
            return Err(MemoryError::ProcessNotFound(pid));
        }

        let mut task: mach_port_name_t = MACH_PORT_NULL;
        let result = unsafe { task_for_pid(mach_task_self(), raw_pid as c_int, &mut task) };
        if result != KERN_SUCCESS {
            // task_for_pid does not distinguish causes; the probe above
            // already ruled out a missing process
            return Err(MemoryError::permission_denied(
                pid,
                format!("task_for_pid failed with kern_return {result}"),
            ));
        }

        Ok(RawProcess { task, owned: true })
    }

    pub fn read_at(&self, address: Address, buf: &mut [u8]) -> Result<usize, ReadFault> {
        match self.read_raw(address, buf) {
            KERN_SUCCESS => Ok(buf.len()),
            KERN_INVALID_ADDRESS | KERN_PROTECTION_FAILURE => {
                // All-or-nothing: try the first page alone to salvage a readable prefix
                let span = page_span(address, buf.len(), page_size());
                if span < buf.len() && self.read_raw(address, &mut buf[..span]) == KERN_SUCCESS {
                    return Ok(span);
                }
                Err(ReadFault::Unmapped)
            }
            KERN_ABORTED | MACH_SEND_INTERRUPTED | MACH_RCV_INTERRUPTED => {
                Err(ReadFault::Interrupted)
            }
            MACH_SEND_INVALID_DEST | KERN_TERMINATED | KERN_INVALID_ARGUMENT => {
                Err(ReadFault::ProcessGone)
            }
            other => Err(ReadFault::Os(io::Error::new(
                io::ErrorKind::Other,
                format!("mach_vm_read_overwrite failed with kern_return {other}"),
            ))),
        }
    }

    fn read_raw(&self, address: Address, buf: &mut [u8]) -> kern_return_t {
        let mut read_len: mach_vm_size_t = 0;
        let result = unsafe {
            mach_vm_read_overwrite(
                self.task,
                address.as_u64() as mach_vm_address_t,
                buf.len() as mach_vm_size_t,
                buf.as_mut_ptr() as mach_vm_address_t,
                &mut read_len,
            )
        };
        trace!(%address, len = buf.len(), read = read_len, result, "mach_vm_read_overwrite");
        if result == KERN_SUCCESS && read_len != buf.len() as mach_vm_size_t {
            return KERN_INVALID_ADDRESS;
        }
        result
    }
}

impl Drop for RawProcess {
    fn drop(&mut self) {
        if self.owned && self.task != MACH_PORT_NULL {
            let result = unsafe { mach_port_deallocate(mach_task_self(), self.task) };
            if result != KERN_SUCCESS {
                debug!(task = self.task, result, "mach_port_deallocate failed");
            }
        }
    }
}

pub fn page_size() -> u64 {
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        size if size > 0 => size as u64,
        _ => 16384,
    }
}
