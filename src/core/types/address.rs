//! Virtual address in a target process, with hex parsing and page arithmetic

use super::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An address in the *target* process's address space.
///
/// Always 64 bits wide, regardless of the pointer width of the reading
/// process, so a 32-bit build can still describe (and reject) addresses in a
/// 64-bit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Aligns the address up to the specified power-of-two boundary.
    ///
    /// Returns `None` when the aligned value does not fit in 64 bits.
    pub const fn align_up(&self, alignment: u64) -> Option<Self> {
        if alignment == 0 {
            return Some(*self);
        }
        match self.0.checked_add(alignment - 1) {
            Some(value) => Some(Address(value & !(alignment - 1))),
            None => None,
        }
    }

    /// Adds a byte count, failing on overflow of the address representation
    pub const fn checked_add(&self, bytes: u64) -> Option<Self> {
        match self.0.checked_add(bytes) {
            Some(value) => Some(Address(value)),
            None => None,
        }
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the address as a native pointer-sized integer, if it fits
    pub fn to_usize(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if let Some(hex) = s.strip_prefix('$') {
            u64::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            // Letters only make sense as hex digits
            u64::from_str_radix(s, 16)
        } else {
            s.parse::<u64>()
        };

        value
            .map(Address::new)
            .map_err(|_| MemoryError::invalid_address(Address::null(), format!("cannot parse {s:?}")))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value as u64)
    }
}

impl<T> From<*const T> for Address {
    fn from(ptr: *const T) -> Self {
        Address::new(ptr as usize as u64)
    }
}

impl<T> From<*mut T> for Address {
    fn from(ptr: *mut T) -> Self {
        Address::new(ptr as usize as u64)
    }
}
