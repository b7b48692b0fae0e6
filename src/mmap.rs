//! Creating and releasing emulated mappings.
//!
//! A mapping is materialized eagerly: the whole requested region is read into
//! an owned buffer at creation. The buffer is a snapshot; later writes to the
//! file by other actors are not reflected in it.

use std::fmt;
use std::io::SeekFrom;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use log::{debug, warn};

use crate::backing::Backing;
use crate::errors::{MmapEmuError, Result};
use crate::flags::{MapFlags, MapLength, Protection};
use crate::registry::{MapId, Mapping, Registry};
use crate::utils::{alloc_buffer, read_up_to, remaining_len};

/// Bytes of an emulated mapping, owned by the caller.
///
/// Read and write it directly through `Deref`/`DerefMut`. Writes reach the
/// backing file only when the mapping is flushed or unmapped, and only for
/// read-write mappings. The buffer is always writable in memory; the access
/// mode decides what flush does with it.
///
/// Dropping a buffer does not unmap it. Pass it to [`Registry::unmap`] to
/// release the registry entry and close the backing file.
pub struct MappedBuffer {
    id: MapId,
    data: Vec<u8>,
}

impl MappedBuffer {
    /// Identity of the mapping this buffer belongs to.
    #[must_use]
    pub fn id(&self) -> MapId {
        self.id
    }

    /// Length of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only view of the mapped bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of the mapped bytes.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take the bytes out of the buffer. Intended for use after unmap.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Deref for MappedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for MappedBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for MappedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for MappedBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Debug for MappedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedBuffer")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<F: Backing> Registry<F> {
    /// Create an emulated mapping and register it.
    ///
    /// With [`MapFlags::ANON`] a zero-filled buffer of the requested length is
    /// allocated and `file` is ignored. Otherwise the region starting at
    /// `offset` is read from `file`, which the mapping then owns until unmap.
    ///
    /// For file-backed mappings:
    /// - `Protection::RDWR` is checked with a zero-length write before any data is read.
    /// - [`MapLength::ToEnd`] maps from `offset` to the current end of file.
    /// - A region running past end of file yields a shorter buffer, not an error.
    /// - The handle position is reset to the start of the file once the region is read.
    ///
    /// # Errors
    ///
    /// Returns `MmapEmuError::InvalidHandle` if a file-backed mapping has no file.
    /// Returns `MmapEmuError::PermissionDenied` if `RDWR` is requested over a handle that cannot be written.
    /// Returns `MmapEmuError::InvalidArgument` for an anonymous mapping of `ToEnd` length.
    /// Returns `MmapEmuError::OutOfMemory` if the buffer cannot be allocated.
    /// Returns `MmapEmuError::Io` if seeking, sizing or reading the file fails.
    pub fn create(
        &self,
        length: MapLength,
        prot: Protection,
        flags: MapFlags,
        file: Option<F>,
        offset: u64,
    ) -> Result<MappedBuffer> {
        if flags.contains(MapFlags::ANON) {
            return self.create_anon(length, prot);
        }
        let mut file = file.ok_or_else(|| {
            MmapEmuError::InvalidHandle("file-backed mapping requires a file handle".into())
        })?;
        let data = read_region(&mut file, length, prot, offset)?;
        Ok(self.register_file(file, data, prot, offset))
    }

    fn create_anon(&self, length: MapLength, prot: Protection) -> Result<MappedBuffer> {
        let len = match length {
            MapLength::Exact(len) => len,
            MapLength::ToEnd => {
                return Err(MmapEmuError::InvalidArgument(
                    "anonymous mapping requires an explicit length",
                ))
            }
        };
        let mut data = alloc_buffer(len)?;
        data.resize(len, 0);
        let writable = prot.intersects(Protection::RDWR | Protection::COPY);
        let id = self.insert(Mapping::anonymous(len, writable));
        debug!("mapped anonymous region {id}: len={len}, writable={writable}");
        Ok(MappedBuffer { id, data })
    }

    fn register_file(
        &self,
        file: F,
        data: Vec<u8>,
        prot: Protection,
        offset: u64,
    ) -> MappedBuffer {
        let copy_on_write = prot.contains(Protection::COPY);
        let writable = prot.contains(Protection::RDWR) && !copy_on_write;
        let len = data.len();
        let id = self.insert(Mapping::file_backed(
            file,
            len,
            writable,
            copy_on_write,
            offset,
        ));
        debug!(
            "mapped file region {id}: offset={offset}, len={len}, mode={:?}",
            prot.mode()
        );
        MappedBuffer { id, data }
    }

    /// Flush and release a mapping, closing its backing file.
    ///
    /// An empty buffer always succeeds; its entry, if still registered, is
    /// released without a flush.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Registry::flush`]; the mapping then stays registered.
    /// Returns `MmapEmuError::MappingNotFound` if the mapping is not registered.
    /// Returns `MmapEmuError::Io` if closing the backing file fails; the mapping is released regardless.
    pub fn unmap(&self, buf: &MappedBuffer) -> Result<()> {
        let id = buf.id();
        if buf.is_empty() {
            return match self.remove(id) {
                Ok(mapping) => release(id, mapping),
                Err(_) => Ok(()),
            };
        }
        self.flush(buf)?;
        let mapping = self.remove(id)?;
        release(id, mapping)
    }
}

#[cfg(unix)]
impl Registry<std::fs::File> {
    /// Create an emulated mapping over a raw file descriptor.
    ///
    /// Behaves like [`Registry::create`]. With [`MapFlags::ANON`] the
    /// descriptor is not touched.
    ///
    /// # Safety
    ///
    /// `fd` must be an open descriptor owned by the caller and not used
    /// elsewhere once the mapping exists: on success ownership passes to the
    /// mapping, which closes it on unmap. On failure the descriptor is left
    /// open and remains the caller's.
    ///
    /// # Errors
    ///
    /// Returns `MmapEmuError::InvalidHandle` if `fd` is not an open descriptor.
    /// Otherwise the same errors as [`Registry::create`].
    pub unsafe fn create_fd(
        &self,
        length: MapLength,
        prot: Protection,
        flags: MapFlags,
        fd: std::os::unix::io::RawFd,
        offset: u64,
    ) -> Result<MappedBuffer> {
        use std::mem::ManuallyDrop;
        use std::os::unix::io::FromRawFd;

        if flags.contains(MapFlags::ANON) {
            return self.create(length, prot, flags, None, offset);
        }
        if !crate::backing::is_open_fd(fd) {
            return Err(MmapEmuError::InvalidHandle(format!(
                "descriptor {fd} is not open"
            )));
        }
        // Not closed on the error paths below: the caller still owns `fd` until we register it.
        let mut file = ManuallyDrop::new(std::fs::File::from_raw_fd(fd));
        let data = read_region(&mut *file, length, prot, offset)?;
        Ok(self.register_file(ManuallyDrop::into_inner(file), data, prot, offset))
    }
}

/// Read the mapped region out of `file` and rewind the handle.
fn read_region<F: Backing>(
    file: &mut F,
    length: MapLength,
    prot: Protection,
    offset: u64,
) -> Result<Vec<u8>> {
    if prot.contains(Protection::RDWR) {
        // Zero-length write: fails on handles opened without write access.
        let _probe = file.write(&[]).map_err(MmapEmuError::PermissionDenied)?;
    }
    file.seek(SeekFrom::Start(offset))?;
    let len = match length {
        MapLength::Exact(len) => len,
        MapLength::ToEnd => remaining_len(file.size()?, offset)?,
    };
    let mut data = alloc_buffer(len)?;
    read_up_to(file, &mut data, len)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(data)
}

fn release<F: Backing>(id: MapId, mapping: Arc<Mapping<F>>) -> Result<()> {
    let file = mapping.backing.lock().take();
    debug!("unmapped {id}");
    if let Some(file) = file {
        file.close().map_err(|e| {
            warn!("closing backing file of mapping {id} failed: {e}");
            MmapEmuError::Io(e)
        })?;
    }
    Ok(())
}
