//! File handles that can back an emulated mapping.

use std::fs::File;
use std::io::{self, Read, Seek, Write};

/// An open, seekable handle the emulation reads from and writes back to.
///
/// Implemented for [`std::fs::File`]. Other implementations let callers back
/// a mapping with anything that behaves like a file.
pub trait Backing: Read + Write + Seek + Send {
    /// Current size of the underlying file in bytes.
    fn size(&self) -> io::Result<u64>;

    /// Force written data down to the storage device.
    fn sync(&mut self) -> io::Result<()>;

    /// Close the handle, reporting any error the platform returns.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

impl Backing for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn close(self) -> io::Result<()> {
        close_file(self)
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn close_file(file: File) -> io::Result<()> {
            use std::os::unix::io::IntoRawFd;
            let fd = file.into_raw_fd();
            // SAFETY: `fd` was just released by the `File`, so nothing else owns or closes it.
            if unsafe { libc::close(fd) } != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    } else {
        fn close_file(file: File) -> io::Result<()> {
            drop(file);
            Ok(())
        }
    }
}

/// Check that a raw descriptor refers to an open file.
#[cfg(unix)]
pub(crate) fn is_open_fd(fd: std::os::unix::io::RawFd) -> bool {
    if fd < 0 {
        return false;
    }
    // SAFETY: F_GETFD only inspects the descriptor table entry.
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}
