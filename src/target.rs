//! The inspected target: memory, types, and data layout in one place.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::mem::{decode_uint, DataLayout, Memory};
use crate::types::{DataType, TypeIndex};

/// A target under inspection.
///
/// Bundles the two external collaborators (type information and memory) with
/// the layout facts needed to decode pointers and integers. Everything here
/// is read-only; repeated queries are safe.
pub struct Target {
    types: Box<dyn TypeIndex>,
    mem: Box<dyn Memory>,
    layout: DataLayout,
}

impl Target {
    pub fn new(types: Box<dyn TypeIndex>, mem: Box<dyn Memory>, layout: DataLayout) -> Self {
        Self { types, mem, layout }
    }

    /// The target's type index.
    pub fn types(&self) -> &dyn TypeIndex {
        &*self.types
    }

    /// The target's data layout.
    pub fn layout(&self) -> DataLayout {
        self.layout
    }

    /// Look up a type by spelling, failing on unknown names.
    pub fn require_type(&self, name: &str) -> Result<&DataType> {
        crate::types::require_type(&*self.types, name)
    }

    /// Read raw bytes from target memory.
    pub fn read_bytes(&self, address: u64, len: u64) -> Result<Bytes> {
        self.mem.read(address, len)
    }

    /// Read an unsigned integer of `size` bytes (at most 8).
    pub fn read_uint(&self, address: u64, size: u64) -> Result<u64> {
        if size == 0 || size > 8 {
            return Err(Error::MemoryRead {
                address,
                size,
                reason: "unsupported integer width".to_string(),
            });
        }
        let bytes = self.read_bytes(address, size)?;
        Ok(decode_uint(&bytes, self.layout.byte_order))
    }

    /// Read a signed integer of `size` bytes, sign-extended to 64 bits.
    pub fn read_int(&self, address: u64, size: u64) -> Result<i64> {
        let raw = self.read_uint(address, size)?;
        let shift = 64 - 8 * size as u32;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Read a pointer at `address`, decoded per the target layout.
    pub fn read_ptr(&self, address: u64) -> Result<u64> {
        self.read_uint(address, self.layout.pointer_size)
    }
}
