//! Protection bits, map flags and length requests consumed by the emulation layer.
//!
//! The layer only tests these bits; it never assigns them meaning beyond
//! "read-write requested", "copy-on-write requested" and "anonymous".

use bitflags::bitflags;

bitflags! {
    /// Requested access for a mapping. The empty set means read-only.
    pub struct Protection: u32 {
        /// Writes through the buffer should reach the backing file on flush.
        const RDWR = 1 << 0;
        /// Writes stay private to the buffer and never reach the backing file.
        const COPY = 1 << 1;
        /// Executable mapping. Accepted for compatibility; has no effect here.
        const EXEC = 1 << 2;
    }
}

bitflags! {
    /// Mapping flags.
    pub struct MapFlags: u32 {
        /// The mapping has no backing file.
        const ANON = 1 << 0;
    }
}

/// Access mode for a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmapMode {
    /// Read-only mapping.
    ReadOnly,
    /// Read-write mapping. `flush` writes the buffer back to the file.
    ReadWrite,
    /// Copy-on-Write mapping (private). Writes affect this buffer only; the underlying file remains unchanged.
    CopyOnWrite,
}

impl Protection {
    /// Access mode implied by these bits. `COPY` wins over `RDWR`.
    #[must_use]
    pub fn mode(self) -> MmapMode {
        if self.contains(Self::COPY) {
            MmapMode::CopyOnWrite
        } else if self.contains(Self::RDWR) {
            MmapMode::ReadWrite
        } else {
            MmapMode::ReadOnly
        }
    }
}

impl From<MmapMode> for Protection {
    fn from(mode: MmapMode) -> Self {
        match mode {
            MmapMode::ReadOnly => Protection::empty(),
            MmapMode::ReadWrite => Protection::RDWR,
            MmapMode::CopyOnWrite => Protection::COPY,
        }
    }
}

/// Requested mapping length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLength {
    /// Map exactly this many bytes (fewer if the file ends first).
    Exact(usize),
    /// Map everything from the offset to the end of the file.
    ToEnd,
}

impl From<usize> for MapLength {
    fn from(len: usize) -> Self {
        MapLength::Exact(len)
    }
}
