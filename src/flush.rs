//! Writing an emulated mapping back to its file.
//!
//! There is no dirty tracking: a flush rewrites the whole mapped region.

use std::io::SeekFrom;

use log::trace;

use crate::backing::Backing;
use crate::errors::{MmapEmuError, Result};
use crate::mmap::MappedBuffer;
use crate::registry::Registry;

impl<F: Backing> Registry<F> {
    /// Write the buffer's current contents back to the backing file and sync it.
    ///
    /// Anonymous, read-only and copy-on-write mappings have nothing to write
    /// back; flushing them succeeds without touching storage. An empty buffer
    /// always succeeds. The handle position is restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns `MmapEmuError::MappingNotFound` if the mapping is not registered.
    /// Returns `MmapEmuError::Io` if seeking, writing or syncing fails.
    pub fn flush(&self, buf: &MappedBuffer) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let id = buf.id();
        let mapping = self.lookup(id)?;
        if !mapping.writes_back() {
            return Ok(());
        }
        let mut backing = mapping.backing.lock();
        // The handle is only gone if an unmap raced us and won.
        let file = backing.as_mut().ok_or(MmapEmuError::MappingNotFound(id))?;
        write_back(file, mapping.offset, buf)?;
        trace!("flushed {} bytes of mapping {id} at offset {}", buf.len(), mapping.offset);
        Ok(())
    }
}

fn write_back<F: Backing>(file: &mut F, offset: u64, data: &[u8]) -> Result<()> {
    let saved = file.stream_position()?;
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(data)?;
    file.sync()?;
    file.seek(SeekFrom::Start(saved))?;
    Ok(())
}
