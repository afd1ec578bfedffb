//! Fallback for targets without a cross-process read mechanism

use super::ReadFault;
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};

#[derive(Debug)]
pub struct RawProcess {
    _private: (),
}

impl RawProcess {
    pub fn open(_pid: ProcessId) -> MemoryResult<Self> {
        Err(MemoryError::platform_unsupported())
    }

    pub fn read_at(&self, _address: Address, _buf: &mut [u8]) -> Result<usize, ReadFault> {
        Err(ReadFault::Unsupported)
    }
}
