//! Groups raw bytes into fixed-width unsigned values

use crate::core::types::{ByteOrder, ElementWidth};

/// Packs `bytes` into values of `width` bytes in the target's native order.
///
/// A trailing group shorter than `width` is dropped, so the result has
/// `bytes.len() / width` elements.
pub fn pack(bytes: &[u8], width: ElementWidth) -> Vec<u32> {
    pack_with_order(bytes, width, ByteOrder::native())
}

/// Packs `bytes` into values of `width` bytes using an explicit byte order
pub fn pack_with_order(bytes: &[u8], width: ElementWidth, order: ByteOrder) -> Vec<u32> {
    match (width, order) {
        (ElementWidth::B8, _) => bytes.iter().map(|&b| u32::from(b)).collect(),
        (ElementWidth::B16, ByteOrder::Little) => bytes
            .chunks_exact(2)
            .map(|c| u32::from(u16::from_le_bytes([c[0], c[1]])))
            .collect(),
        (ElementWidth::B16, ByteOrder::Big) => bytes
            .chunks_exact(2)
            .map(|c| u32::from(u16::from_be_bytes([c[0], c[1]])))
            .collect(),
        (ElementWidth::B32, ByteOrder::Little) => bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        (ElementWidth::B32, ByteOrder::Big) => bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    }
}
