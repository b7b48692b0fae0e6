//! Parity between emulated mappings and native mappings of the same file.
//!
//! Contract: an emulated mapping starts out byte-identical to a native mapping
//! of the same region, and after flush() a fresh native mapping observes the
//! emulated edits.

use memmap2::{Mmap, MmapOptions};
use mmap_emu::{MapOptions, MmapMode, Registry};
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

fn patterned_file(dir: &tempfile::TempDir, name: &str, len: usize) -> PathBuf {
    let path = dir.path().join(name);
    let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(&path, bytes).expect("write pattern");
    path
}

#[test]
fn parity_initial_contents_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = patterned_file(&dir, "window", 3 * 4096);

    let file = File::open(&path).expect("open");
    // SAFETY: the file is not modified while the native mapping is alive.
    let native = unsafe { MmapOptions::new().offset(4096).len(1000).map(&file) }.expect("native map");

    let registry: Registry = Registry::new();
    let emulated = MapOptions::new()
        .offset(4096)
        .len(1000)
        .map(&registry, File::open(&path).expect("open"))
        .expect("emulated map");

    assert_eq!(emulated.as_slice(), &native[..]);
}

#[test]
fn parity_whole_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = patterned_file(&dir, "whole", 10_000);

    let file = File::open(&path).expect("open");
    // SAFETY: the file is not modified while the native mapping is alive.
    let native = unsafe { Mmap::map(&file) }.expect("native map");

    let registry: Registry = Registry::new();
    let emulated = MapOptions::new()
        .map(&registry, File::open(&path).expect("open"))
        .expect("emulated map");

    assert_eq!(emulated.len(), native.len());
    assert_eq!(emulated.as_slice(), &native[..]);
}

#[test]
fn parity_flush_visibility() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = patterned_file(&dir, "flush", 8192);

    let registry: Registry = Registry::new();
    let rw = OpenOptions::new().read(true).write(true).open(&path).expect("open rw");
    let mut emulated = MapOptions::new()
        .mode(MmapMode::ReadWrite)
        .offset(100)
        .len(10)
        .map(&registry, rw)
        .expect("emulated map");
    emulated.copy_from_slice(b"ABCDEFGHIJ");
    registry.flush(&emulated).expect("flush");

    let file = File::open(&path).expect("open");
    // SAFETY: the file is not modified while the native mapping is alive.
    let native = unsafe { Mmap::map(&file) }.expect("native map");
    assert_eq!(&native[100..110], b"ABCDEFGHIJ");
    assert_eq!(native[99], (99 * 7 % 256) as u8);
    assert_eq!(native[110], (110 * 7 % 256) as u8);

    registry.unmap(&emulated).expect("unmap");
}
