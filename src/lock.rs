//! Memory locking entry points.
//!
//! Emulated mappings live in ordinary heap memory and the platform offers no
//! way to pin pages, so locking is accepted and does nothing.

use crate::errors::Result;
use crate::mmap::MappedBuffer;
use crate::registry::Registry;

impl<F> Registry<F> {
    /// Lock the mapping's pages in memory. Always succeeds without effect.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps the signature aligned with native mappings.
    pub fn lock(&self, buf: &MappedBuffer) -> Result<()> {
        log::trace!("lock of mapping {} ignored", buf.id());
        Ok(())
    }

    /// Unlock the mapping's pages. Always succeeds without effect.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` keeps the signature aligned with native mappings.
    pub fn unlock(&self, buf: &MappedBuffer) -> Result<()> {
        log::trace!("unlock of mapping {} ignored", buf.id());
        Ok(())
    }
}
