//! Kernel32.dll bindings for opening processes and reading their memory

use super::error_codes::ErrorCode;
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};
use winapi::um::winnt::HANDLE;

/// Exit code reported for a process that is still running
const STILL_ACTIVE: DWORD = 259;

/// Wrapper for OpenProcess, returning the last error code on failure
pub fn open_process(pid: u32, desired_access: u32) -> Result<HANDLE, ErrorCode> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if handle.is_null() {
        Err(ErrorCode::last_error())
    } else {
        Ok(handle)
    }
}

/// Wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not used afterwards
pub unsafe fn close_handle(handle: HANDLE) -> Result<(), ErrorCode> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(())
    }
}

/// Wrapper for ReadProcessMemory.
///
/// Returns the bytes copied alongside the error code, since a failed call can
/// still have copied a prefix of the range.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ` access
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> Result<usize, (ErrorCode, usize)> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err((ErrorCode::last_error(), bytes_read))
    } else {
        Ok(bytes_read)
    }
}

/// Whether the process behind `handle` has exited.
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn process_has_exited(handle: HANDLE) -> bool {
    let mut exit_code: DWORD = 0;
    GetExitCodeProcess(handle, &mut exit_code) != FALSE && exit_code != STILL_ACTIVE
}

/// System page size
pub fn page_size() -> u64 {
    let mut info: SYSTEM_INFO = unsafe { mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    match info.dwPageSize {
        0 => 4096,
        size => u64::from(size),
    }
}
