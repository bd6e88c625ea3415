//! Typed views of target memory.
//!
//! A [`Value`] pairs a target address with the spelling of the type living
//! there. Values are transient: they are produced on demand during a walk or
//! a member access and hold no bytes themselves; every read goes back to the
//! memory backend.

use bytes::Bytes;

use crate::error::Result;
use crate::target::Target;
use crate::types::path::{locate_field, FieldPath};
use crate::types::canonical;

/// A typed, addressable value in target memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    type_name: String,
    address: u64,
}

impl Value {
    /// A value of type `type_name` at `address`.
    pub fn new(type_name: impl Into<String>, address: u64) -> Self {
        Self {
            type_name: type_name.into(),
            address,
        }
    }

    /// The spelling of this value's type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The value's address in target memory.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Select a (possibly nested) member, returning a new value at the
    /// member's address.
    pub fn member(&self, target: &Target, path: &FieldPath) -> Result<Value> {
        let loc = locate_field(target.types(), &self.type_name, path)?;
        Ok(Value::new(loc.type_name, self.address + loc.offset))
    }

    /// Read this value's bytes (its full declared size).
    pub fn read_bytes(&self, target: &Target) -> Result<Bytes> {
        let size = target.require_type(&self.type_name)?.size;
        target.read_bytes(self.address, size)
    }

    /// Read this value as an unsigned integer of its declared size.
    pub fn read_uint(&self, target: &Target) -> Result<u64> {
        let size = target.require_type(&self.type_name)?.size;
        target.read_uint(self.address, size)
    }

    /// Read this value as an integer, sign-extending when its canonical
    /// type is a signed scalar.
    pub fn read_int(&self, target: &Target) -> Result<i64> {
        let ty = target.require_type(&self.type_name)?;
        let signed = canonical(target.types(), ty)?.is_signed();
        if signed {
            target.read_int(self.address, ty.size)
        } else {
            target.read_uint(self.address, ty.size).map(|v| v as i64)
        }
    }

    /// Read this value as a pointer.
    pub fn read_ptr(&self, target: &Target) -> Result<u64> {
        target.read_ptr(self.address)
    }
}
