//! Element widths and byte orders used to group raw bytes into values

use super::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many bytes make up one returned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ElementWidth {
    /// Ungrouped bytes, values 0..=255
    #[default]
    B8 = 1,
    /// 16-bit groups
    B16 = 2,
    /// 32-bit groups
    B32 = 4,
}

impl ElementWidth {
    /// Size of one element in bytes
    pub const fn bytes(self) -> usize {
        self as usize
    }

}

impl TryFrom<u32> for ElementWidth {
    type Error = MemoryError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        match size {
            1 => Ok(ElementWidth::B8),
            2 => Ok(ElementWidth::B16),
            4 => Ok(ElementWidth::B32),
            other => Err(MemoryError::InvalidDataTypeSize(other)),
        }
    }
}

impl From<ElementWidth> for u32 {
    fn from(width: ElementWidth) -> Self {
        width as u32
    }
}

impl fmt::Display for ElementWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bytes() * 8)
    }
}

/// Byte order used to assemble multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Order of the running build.
    ///
    /// Every process the supported backends can open runs on the same machine
    /// with the same endianness, so this is also the target's order.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}
