//! Many threads mapping, flushing and unmapping distinct files through one registry.

use mmap_emu::{MapOptions, MmapMode, Registry};
use std::fs::{self, OpenOptions};
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 16;
const SIZE: usize = 1024;

#[test]
fn distinct_mappings_across_threads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry: Registry = Registry::new();

    let paths: Vec<_> = (0..THREADS)
        .map(|t| {
            let path = dir.path().join(format!("worker_{t}"));
            fs::write(&path, vec![0u8; SIZE]).expect("seed file");
            path
        })
        .collect();

    thread::scope(|s| {
        for (t, path) in paths.iter().enumerate() {
            let registry = &registry;
            s.spawn(move || {
                for round in 0..ROUNDS {
                    let file = OpenOptions::new()
                        .read(true)
                        .write(true)
                        .open(path)
                        .expect("open");
                    let mut buf = MapOptions::new()
                        .mode(MmapMode::ReadWrite)
                        .map(registry, file)
                        .expect("map");
                    assert!(buf.iter().all(|&b| b == round as u8), "stale contents in worker {t}");
                    buf.fill(round as u8 + 1);
                    registry.flush(&buf).expect("flush");
                    registry.lock(&buf).expect("lock");
                    registry.unmap(&buf).expect("unmap");
                }
            });
        }

        // Anonymous churn alongside the file-backed workers.
        s.spawn(|| {
            for _ in 0..ROUNDS * THREADS {
                let buf = MapOptions::new().len(64).map_anon(&registry).expect("anon");
                registry.unmap(&buf).expect("unmap anon");
            }
        });
    });

    assert!(registry.is_empty());
    for path in &paths {
        let bytes = fs::read(path).expect("read back");
        assert!(bytes.iter().all(|&b| b == ROUNDS as u8));
    }
}
