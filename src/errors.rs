//! Crate-specific error types for mmap-emu.

use std::io;
use thiserror::Error;

use crate::registry::MapId;

/// Result alias for mmap-emu operations.
pub type Result<T> = std::result::Result<T, MmapEmuError>;

/// Error type covering handle resolution, filesystem and registry failures.
#[derive(Debug, Error)]
pub enum MmapEmuError {
    /// The file descriptor or handle does not resolve to an open file.
    #[error("invalid file handle: {0}")]
    InvalidHandle(String),

    /// A read-write mapping was requested over a handle that cannot be written.
    #[error("permission denied: {0}")]
    PermissionDenied(#[source] io::Error),

    /// Wrapper for `std::io::Error` raised by seek, read, write, sync, stat or close.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The operation targets a mapping that is not (or no longer) registered.
    #[error("mapping not found: {0}")]
    MappingNotFound(MapId),

    /// The request cannot be expressed as an emulated mapping.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The buffer backing a mapping could not be allocated.
    #[error("out of memory: cannot allocate {len} bytes")]
    OutOfMemory {
        /// Requested buffer length.
        len: usize,
    },
}

impl MmapEmuError {
    /// Whether this error reports a missing registry entry.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MappingNotFound(_))
    }
}
