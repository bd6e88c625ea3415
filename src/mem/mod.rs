//! Memory backend boundary.
//!
//! A [`Memory`] implementation serves byte-range reads at arbitrary target
//! addresses: a flat dump file, a synthetic image, or (elsewhere) a live
//! target. Reads either return exactly the requested bytes or fail with
//! [`Error::MemoryRead`]; there are no partial reads at this boundary.

pub mod dump;
pub mod image;

use bytes::Bytes;

use crate::error::Result;

/// Byte order of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Word size and byte order of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLayout {
    pub byte_order: ByteOrder,
    /// Pointer size in bytes (4 or 8).
    pub pointer_size: u64,
}

impl DataLayout {
    /// Little-endian 64-bit, the common case for kernel dumps.
    pub const LE64: DataLayout = DataLayout {
        byte_order: ByteOrder::Little,
        pointer_size: 8,
    };

    /// Big-endian 64-bit.
    pub const BE64: DataLayout = DataLayout {
        byte_order: ByteOrder::Big,
        pointer_size: 8,
    };
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::LE64
    }
}

/// Read-only access to target memory.
pub trait Memory {
    /// Read exactly `len` bytes at `address`.
    fn read(&self, address: u64, len: u64) -> Result<Bytes>;
}

/// Decode an unsigned integer of up to 8 bytes per the given byte order.
pub(crate) fn decode_uint(bytes: &[u8], order: ByteOrder) -> u64 {
    let mut value: u64 = 0;
    match order {
        ByteOrder::Little => {
            for &b in bytes.iter().rev() {
                value = (value << 8) | u64::from(b);
            }
        }
        ByteOrder::Big => {
            for &b in bytes {
                value = (value << 8) | u64::from(b);
            }
        }
    }
    value
}
