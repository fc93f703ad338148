//! Read-only byte source abstraction.
//!
//! A `ByteSource` is a finite, randomly-addressable byte sequence of known
//! length, backed either by owned memory or by a memory-mapped file. Sources
//! never mutate, so shared references can be read concurrently.

use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("read of {length} bytes at offset {offset} exceeds source length {len}")]
    OutOfRange { offset: u64, length: usize, len: u64 },
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// A finite, read-only, randomly-addressable byte sequence.
pub trait ByteSource {
    /// Total length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read `length` bytes starting at `offset`. Fails with `OutOfRange`
    /// when the requested range extends past the end of the source.
    fn read(&self, offset: u64, length: usize) -> Result<&[u8]>;

    /// Single byte at `offset`, or `None` past the end.
    fn at(&self, offset: u64) -> Option<u8> {
        self.read(offset, 1).ok().map(|b| b[0])
    }
}

fn checked_slice(data: &[u8], offset: u64, length: usize) -> Result<&[u8]> {
    let end = offset.checked_add(length as u64);
    match end {
        Some(end) if end <= data.len() as u64 => {
            Ok(&data[offset as usize..offset as usize + length])
        }
        _ => Err(SourceError::OutOfRange {
            offset,
            length,
            len: data.len() as u64,
        }),
    }
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8]> {
        checked_slice(self, offset, length)
    }
}

/// Byte source over an owned in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8]> {
        checked_slice(&self.data, offset, length)
    }
}

/// Byte source over a read-only memory-mapped file.
#[derive(Debug)]
pub struct MappedSource {
    mmap: Mmap,
}

impl MappedSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as `self`.
        // Truncation of the underlying file by another process is the usual
        // mmap caveat and out of our control.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }
}

impl ByteSource for MappedSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read(&self, offset: u64, length: usize) -> Result<&[u8]> {
        checked_slice(&self.mmap, offset, length)
    }
}
