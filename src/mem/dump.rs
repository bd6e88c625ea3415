//! Memory-mapped flat dump backend.
//!
//! Serves reads out of a raw dump file (a contiguous capture of target
//! memory) mapped read-only at a configured base address.

use std::fs::File;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use memmap2::Mmap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::mem::Memory;

/// A raw memory dump file, mapped read-only.
pub struct DumpMemory {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    base: u64,
    len: u64,
}

impl DumpMemory {
    /// Open `path` and map it at target address `base`.
    pub fn open<P: AsRef<Path>>(path: P, base: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        debug!(path = %path.display(), base = format_args!("{base:#x}"), size = len, "mapping dump");

        let mmap = if len == 0 {
            None
        } else {
            // Safety: read-only map of a regular file we just opened.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            base,
            len,
        })
    }

    /// Lowest mapped target address.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Size of the dump in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the dump is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Memory for DumpMemory {
    fn read(&self, address: u64, len: u64) -> Result<Bytes> {
        let out_of_range = || Error::MemoryRead {
            address,
            size: len,
            reason: format!(
                "outside dump range {:#x}..{:#x}",
                self.base,
                self.base + self.len
            ),
        };

        let map = self.mmap.as_ref().ok_or_else(out_of_range)?;
        let start = address.checked_sub(self.base).ok_or_else(out_of_range)?;
        let end = start.checked_add(len).ok_or_else(out_of_range)?;
        if end > map.len() as u64 {
            return Err(out_of_range());
        }
        Ok(Bytes::copy_from_slice(
            &map[start as usize..end as usize],
        ))
    }
}
