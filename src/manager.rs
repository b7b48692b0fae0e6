//! High-level API over the process-wide default registry.
//!
//! Provides convenience functions that forward to [`registry::global`](crate::registry::global).

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::errors::Result;
use crate::flags::{MapFlags, MapLength, MmapMode, Protection};
use crate::mmap::MappedBuffer;
use crate::registry::global;

/// Create an emulated mapping in the default registry.
///
/// # Errors
///
/// Returns errors from `Registry::create`.
pub fn mmap(
    length: impl Into<MapLength>,
    prot: Protection,
    flags: MapFlags,
    file: Option<File>,
    offset: u64,
) -> Result<MappedBuffer> {
    global().create(length.into(), prot, flags, file, offset)
}

/// Create an emulated mapping over a raw descriptor in the default registry.
///
/// # Safety
///
/// Same contract as `Registry::create_fd`.
///
/// # Errors
///
/// Returns errors from `Registry::create_fd`.
#[cfg(unix)]
pub unsafe fn mmap_fd(
    length: impl Into<MapLength>,
    prot: Protection,
    flags: MapFlags,
    fd: std::os::unix::io::RawFd,
    offset: u64,
) -> Result<MappedBuffer> {
    global().create_fd(length.into(), prot, flags, fd, offset)
}

/// Open the file at `path` and map all of it in the requested mode.
/// The file is opened for writing only in `ReadWrite` mode.
///
/// # Errors
///
/// Returns `MmapEmuError::Io` if the file cannot be opened, or errors from `Registry::create`.
pub fn map_path<P: AsRef<Path>>(path: P, mode: MmapMode) -> Result<MappedBuffer> {
    let file = OpenOptions::new()
        .read(true)
        .write(mode == MmapMode::ReadWrite)
        .open(path)?;
    global().create(MapLength::ToEnd, mode.into(), MapFlags::empty(), Some(file), 0)
}

/// Flush a mapping from the default registry.
///
/// # Errors
///
/// Returns errors from `Registry::flush`.
pub fn flush(buf: &MappedBuffer) -> Result<()> {
    global().flush(buf)
}

/// Lock a mapping from the default registry. Always succeeds.
///
/// # Errors
///
/// Never fails.
pub fn lock(buf: &MappedBuffer) -> Result<()> {
    global().lock(buf)
}

/// Unlock a mapping from the default registry. Always succeeds.
///
/// # Errors
///
/// Never fails.
pub fn unlock(buf: &MappedBuffer) -> Result<()> {
    global().unlock(buf)
}

/// Flush and release a mapping from the default registry.
///
/// # Errors
///
/// Returns errors from `Registry::unmap`.
pub fn munmap(buf: &MappedBuffer) -> Result<()> {
    global().unmap(buf)
}
