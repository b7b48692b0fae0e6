//! Builder-style configuration of a mapping request.

use crate::backing::Backing;
use crate::errors::Result;
use crate::flags::{MapFlags, MapLength, MmapMode, Protection};
use crate::mmap::MappedBuffer;
use crate::registry::Registry;

/// Parameters of an emulated mapping.
///
/// Defaults to a read-only, file-backed mapping of the whole file.
///
/// # Examples
///
/// ```no_run
/// use mmap_emu::{MapOptions, MmapMode, Registry};
/// use std::fs::OpenOptions;
///
/// let registry: Registry = Registry::new();
/// let file = OpenOptions::new().read(true).write(true).open("data.bin")?;
///
/// // Map 16 bytes starting at offset 128
/// let mut buf = MapOptions::new()
///     .mode(MmapMode::ReadWrite)
///     .offset(128)
///     .len(16)
///     .map(&registry, file)?;
///
/// buf[..5].copy_from_slice(b"hello");
/// registry.unmap(&buf)?;
/// # Ok::<(), mmap_emu::MmapEmuError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    length: MapLength,
    offset: u64,
    protection: Protection,
    flags: MapFlags,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MapOptions {
    /// Read-only, file-backed, whole file from offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: MapLength::ToEnd,
            offset: 0,
            protection: Protection::empty(),
            flags: MapFlags::empty(),
        }
    }

    /// Map exactly `len` bytes (fewer if the file ends first).
    #[must_use]
    pub fn len(mut self, len: usize) -> Self {
        self.length = MapLength::Exact(len);
        self
    }

    /// Map from the offset to the end of the file.
    #[must_use]
    pub fn to_end(mut self) -> Self {
        self.length = MapLength::ToEnd;
        self
    }

    /// Start the mapping `offset` bytes into the file.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the raw protection bits.
    #[must_use]
    pub fn protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }

    /// Set the protection bits from an access mode.
    #[must_use]
    pub fn mode(mut self, mode: MmapMode) -> Self {
        self.protection = mode.into();
        self
    }

    /// Request an anonymous mapping with no backing file.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.flags |= MapFlags::ANON;
        self
    }

    /// Map `file` into `registry`. The mapping owns `file` until unmap.
    ///
    /// # Errors
    ///
    /// Returns errors from [`Registry::create`].
    pub fn map<F: Backing>(&self, registry: &Registry<F>, file: F) -> Result<MappedBuffer> {
        registry.create(self.length, self.protection, self.flags, Some(file), self.offset)
    }

    /// Create an anonymous mapping in `registry`, regardless of whether
    /// [`MapOptions::anonymous`] was called.
    ///
    /// # Errors
    ///
    /// Returns errors from [`Registry::create`].
    pub fn map_anon<F: Backing>(&self, registry: &Registry<F>) -> Result<MappedBuffer> {
        registry.create(
            self.length,
            self.protection,
            self.flags | MapFlags::ANON,
            None,
            self.offset,
        )
    }

    /// Map a raw file descriptor into `registry`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Registry::create_fd`].
    ///
    /// # Errors
    ///
    /// Returns errors from [`Registry::create_fd`].
    #[cfg(unix)]
    pub unsafe fn map_fd(
        &self,
        registry: &Registry<std::fs::File>,
        fd: std::os::unix::io::RawFd,
    ) -> Result<MappedBuffer> {
        registry.create_fd(self.length, self.protection, self.flags, fd, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_read_only_whole_file() {
        let opts = MapOptions::default();
        assert_eq!(opts, MapOptions::new().to_end().offset(0).mode(MmapMode::ReadOnly));
    }

    #[test]
    fn builder_maps_requested_window() {
        let mut file = tempfile::tempfile().expect("tempfile");
        file.write_all(b"0123456789").expect("write");

        let registry: Registry = Registry::new();
        let buf = MapOptions::new()
            .mode(MmapMode::CopyOnWrite)
            .offset(2)
            .len(5)
            .map(&registry, file)
            .expect("map");
        assert_eq!(buf.as_slice(), b"23456");

        let info = registry.info(buf.id()).expect("info");
        assert_eq!(info.offset, 2);
        assert_eq!(info.mode(), MmapMode::CopyOnWrite);
        assert!(info.file_backed);
    }

    #[test]
    fn map_anon_forces_anonymous() {
        let registry: Registry = Registry::new();
        let buf = MapOptions::new()
            .len(32)
            .mode(MmapMode::ReadWrite)
            .map_anon(&registry)
            .expect("anon");
        assert_eq!(buf.len(), 32);
        assert!(!registry.info(buf.id()).expect("info").file_backed);
    }
}
