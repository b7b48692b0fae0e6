//! Utility helpers for length arithmetic and buffer allocation.

use std::io::{self, Read};

use crate::errors::{MmapEmuError, Result};

/// Bytes remaining in a file of `size` bytes from `offset`, saturating at zero
/// when the offset lies past end of file.
///
/// # Errors
///
/// Returns `MmapEmuError::InvalidArgument` if the remainder does not fit in memory.
pub fn remaining_len(size: u64, offset: u64) -> Result<usize> {
    usize::try_from(size.saturating_sub(offset))
        .map_err(|_| MmapEmuError::InvalidArgument("mapped region exceeds address space"))
}

/// Allocate an empty buffer able to hold exactly `len` bytes.
///
/// # Errors
///
/// Returns `MmapEmuError::OutOfMemory` if the allocation fails.
pub fn alloc_buffer(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| MmapEmuError::OutOfMemory { len })?;
    Ok(buf)
}

/// Read up to `len` bytes from `reader` into `buf`, stopping early at end of file.
/// Returns the number of bytes read; a short count is not an error.
///
/// # Errors
///
/// Propagates any read error other than `Interrupted`.
pub fn read_up_to<R: Read>(reader: &mut R, buf: &mut Vec<u8>, len: usize) -> io::Result<usize> {
    // u64 always holds a usize on supported targets
    reader.take(len as u64).read_to_end(buf)
}
