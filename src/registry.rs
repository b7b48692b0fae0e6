//! Registry of live emulated mappings.
//!
//! The registry is the sole authority on whether a mapping is still alive: an
//! entry exists from successful creation until successful unmap. The table is
//! guarded by a single mutex that is only held for insert, lookup and remove,
//! never across file I/O. Each record guards its own backing handle.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::errors::{MmapEmuError, Result};
use crate::flags::MmapMode;

// Shared by every registry so ids are never reused and never collide across registries.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of an emulated mapping.
///
/// Returned with the buffer at creation and used by every later operation on
/// that mapping. Ids are unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(u64);

impl MapId {
    fn next() -> Self {
        MapId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata kept for one live mapping. The bytes themselves live in the
/// caller's `MappedBuffer`.
pub(crate) struct Mapping<F> {
    // None for anonymous mappings, and once unmap has taken the handle.
    pub(crate) backing: Mutex<Option<F>>,
    pub(crate) file_backed: bool,
    pub(crate) writable: bool,
    pub(crate) copy_on_write: bool,
    pub(crate) offset: u64,
    pub(crate) len: usize,
}

impl<F> Mapping<F> {
    pub(crate) fn anonymous(len: usize, writable: bool) -> Self {
        Self {
            backing: Mutex::new(None),
            file_backed: false,
            writable,
            copy_on_write: false,
            offset: 0,
            len,
        }
    }

    pub(crate) fn file_backed(
        file: F,
        len: usize,
        writable: bool,
        copy_on_write: bool,
        offset: u64,
    ) -> Self {
        Self {
            backing: Mutex::new(Some(file)),
            file_backed: true,
            writable,
            copy_on_write,
            offset,
            len,
        }
    }

    /// Whether flush has anything to propagate to storage.
    pub(crate) fn writes_back(&self) -> bool {
        self.writable && self.file_backed && !self.copy_on_write
    }

    fn info(&self, id: MapId) -> MappingInfo {
        MappingInfo {
            id,
            len: self.len,
            offset: self.offset,
            writable: self.writable,
            copy_on_write: self.copy_on_write,
            file_backed: self.file_backed,
        }
    }
}

/// Snapshot of a live mapping's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingInfo {
    /// Mapping identity.
    pub id: MapId,
    /// Length of the materialized buffer in bytes.
    pub len: usize,
    /// Offset into the backing file where the buffer starts.
    pub offset: u64,
    /// Whether buffer writes are meant to be visible to flush.
    pub writable: bool,
    /// Whether buffer writes are private to the mapping.
    pub copy_on_write: bool,
    /// Whether the mapping has a backing file.
    pub file_backed: bool,
}

impl MappingInfo {
    /// Access mode this mapping behaves as.
    #[must_use]
    pub fn mode(&self) -> MmapMode {
        if self.copy_on_write {
            MmapMode::CopyOnWrite
        } else if self.writable {
            MmapMode::ReadWrite
        } else {
            MmapMode::ReadOnly
        }
    }
}

/// Table of live emulated mappings keyed by [`MapId`].
///
/// Construct one per subsystem (or per test) and pass it down, or use
/// [`global`] for the process-wide default. `F` is the backing handle type.
pub struct Registry<F = File> {
    entries: Mutex<HashMap<MapId, Arc<Mapping<F>>>>,
}

impl<F> Registry<F> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no mapping is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether `id` names a live mapping in this registry.
    #[must_use]
    pub fn contains(&self, id: MapId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Metadata of a live mapping.
    ///
    /// # Errors
    ///
    /// Returns `MmapEmuError::MappingNotFound` if `id` is not registered here.
    pub fn info(&self, id: MapId) -> Result<MappingInfo> {
        Ok(self.lookup(id)?.info(id))
    }

    pub(crate) fn insert(&self, mapping: Mapping<F>) -> MapId {
        let id = MapId::next();
        self.entries.lock().insert(id, Arc::new(mapping));
        log::trace!("registered mapping {id}");
        id
    }

    pub(crate) fn lookup(&self, id: MapId) -> Result<Arc<Mapping<F>>> {
        self.entries
            .lock()
            .get(&id)
            .cloned()
            .ok_or(MmapEmuError::MappingNotFound(id))
    }

    pub(crate) fn remove(&self, id: MapId) -> Result<Arc<Mapping<F>>> {
        let removed = self.entries.lock().remove(&id);
        let mapping = removed.ok_or(MmapEmuError::MappingNotFound(id))?;
        log::trace!("deregistered mapping {id}");
        Ok(mapping)
    }
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("mappings", &self.len())
            .finish()
    }
}

/// The process-wide default registry, created on first use.
pub fn global() -> &'static Registry<File> {
    static GLOBAL: OnceLock<Registry<File>> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
