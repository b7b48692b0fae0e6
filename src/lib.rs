//! # mmap-emu: memory-mapped file I/O without a native mmap
//!
//! This crate emulates memory-mapped file access on platforms that can only
//! perform ordinary buffered reads and writes. A mapping is an owned byte
//! buffer that mirrors a file region, can be read and written in place, and is
//! written back to storage on explicit flush or unmap.
//!
//! ## Features
//!
//! - **Eager materialization**: the whole region is read at creation (snapshot semantics)
//! - **Explicit write-back**: `flush` rewrites the full region and syncs it
//! - **Copy-on-write and read-only modes**: flushing them never touches the file
//! - **Anonymous mappings**: zero-filled buffers with no backing file
//! - **Isolated registries**: one process-wide default, or as many as you construct
//!
//! ## Quick Start
//!
//! ```no_run
//! use mmap_emu::{flush, map_path, munmap, MmapMode};
//!
//! // Map the whole file read-write
//! let mut buf = map_path("data.bin", MmapMode::ReadWrite)?;
//!
//! // Edit it in place
//! buf[..12].copy_from_slice(b"Hello, mmap!");
//!
//! // Push the edit to storage, then release the mapping
//! flush(&buf)?;
//! munmap(&buf)?;
//! # Ok::<(), mmap_emu::MmapEmuError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error types for all operations
//! - [`flags`]: Protection bits, map flags and length requests
//! - [`backing`]: The file handle abstraction mappings read from and write to
//! - [`registry`]: The table of live mappings and their identities
//! - [`mmap`](mod@mmap): Creating and unmapping, and the `MappedBuffer` type
//! - [`flush`](mod@flush): Write-back to storage
//! - [`lock`](mod@lock): No-op page locking
//! - [`options`]: Builder for mapping requests
//! - [`manager`]: Free functions over the default registry
//! - [`utils`]: Length and allocation helpers

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]

pub mod backing;
pub mod errors;
pub mod flags;
pub mod flush;
pub mod lock;
pub mod manager;
pub mod mmap;
pub mod options;
pub mod registry;
pub mod utils;

pub use backing::Backing;
pub use errors::MmapEmuError;
pub use flags::{MapFlags, MapLength, MmapMode, Protection};
pub use manager::{flush, lock, map_path, mmap, munmap, unlock};
#[cfg(unix)]
pub use manager::mmap_fd;
pub use mmap::MappedBuffer;
pub use options::MapOptions;
pub use registry::{global, MapId, MappingInfo, Registry};
