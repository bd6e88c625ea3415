//! Synthetic in-memory target image.
//!
//! A flat byte buffer mapped at a base address, with poke helpers for
//! assembling test fixtures and synthetic targets by hand.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::mem::{ByteOrder, Memory};

/// A contiguous region of fake target memory.
#[derive(Debug, Clone)]
pub struct ImageMemory {
    base: u64,
    bytes: Vec<u8>,
    order: ByteOrder,
}

impl ImageMemory {
    /// Create a zero-filled image of `size` bytes mapped at `base`.
    pub fn new(base: u64, size: usize, order: ByteOrder) -> Self {
        Self {
            base,
            bytes: vec![0; size],
            order,
        }
    }

    /// Lowest mapped address.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// The raw image contents, e.g. for writing out as a dump file.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write raw bytes at a target address.
    ///
    /// # Panics
    /// Panics when the range falls outside the image; fixtures are expected
    /// to size their image up front.
    pub fn put_bytes(&mut self, address: u64, data: &[u8]) {
        let start = usize::try_from(address - self.base).expect("address below image base");
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    /// Write a 32-bit integer at a target address, in the image's byte order.
    pub fn put_u32(&mut self, address: u64, value: u32) {
        let data = match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        self.put_bytes(address, &data);
    }

    /// Write a 64-bit integer (or pointer) at a target address.
    pub fn put_u64(&mut self, address: u64, value: u64) {
        let data = match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        self.put_bytes(address, &data);
    }
}

impl Memory for ImageMemory {
    fn read(&self, address: u64, len: u64) -> Result<Bytes> {
        let unmapped = || Error::MemoryRead {
            address,
            size: len,
            reason: "address range not mapped".to_string(),
        };

        let start = address.checked_sub(self.base).ok_or_else(unmapped)?;
        let end = start.checked_add(len).ok_or_else(unmapped)?;
        if end > self.bytes.len() as u64 {
            return Err(unmapped());
        }
        Ok(Bytes::copy_from_slice(
            &self.bytes[start as usize..end as usize],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_back_poked_values() {
        let mut image = ImageMemory::new(0x1000, 64, ByteOrder::Little);
        image.put_u64(0x1008, 0xfeed);
        let data = image.read(0x1008, 8).unwrap();
        assert_eq!(data.as_ref(), &0xfeed_u64.to_le_bytes());
    }

    #[test]
    fn read_below_base_fails() {
        let image = ImageMemory::new(0x1000, 64, ByteOrder::Little);
        assert!(matches!(
            image.read(0xff0, 8),
            Err(Error::MemoryRead { address: 0xff0, .. })
        ));
    }

    #[test]
    fn read_past_end_fails() {
        let image = ImageMemory::new(0x1000, 64, ByteOrder::Little);
        assert!(image.read(0x1000 + 60, 8).is_err());
    }

    #[test]
    fn big_endian_pokes() {
        let mut image = ImageMemory::new(0, 16, ByteOrder::Big);
        image.put_u32(0, 0x12345678);
        assert_eq!(image.read(0, 4).unwrap().as_ref(), &[0x12, 0x34, 0x56, 0x78]);
    }
}
