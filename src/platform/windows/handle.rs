//! Owned HANDLE with automatic cleanup

use super::kernel32;
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE, closed on drop
#[derive(Debug)]
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    pub fn new(handle: HANDLE) -> Self {
        Handle { handle }
    }

    /// Raw handle, valid for as long as `self` lives
    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            // Nothing useful to do with a close failure during drop
            unsafe {
                let _ = kernel32::close_handle(self.handle);
            }
        }
    }
}

// Process handles are plain kernel object references, usable from any thread
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
