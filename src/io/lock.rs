//! Writer lock for a store directory.
//!
//! Every mutating command holds a `StoreLock` across its load, edit and save.
//! The lock is an exclusive `flock` on `.todo.lock`. The file itself is never
//! removed: unlinking it while locked would let the next writer lock a fresh
//! inode while a waiter still locks the old one.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

pub const LOCK_FILE: &str = ".todo.lock";

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("cannot open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("store is busy: {path} is held by another todo process")]
    Busy { path: PathBuf },
}

/// Exclusive hold on a store. Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    // closing the descriptor drops the flock
    _file: File,
}

impl StoreLock {
    /// Take the writer lock of the store in `root`, retrying until `timeout`.
    pub fn acquire(root: &Path, timeout: Duration) -> Result<StoreLock, LockError> {
        let path = root.join(LOCK_FILE);
        let deadline = Instant::now() + timeout;
        loop {
            let file = open_lock_file(&path)?;
            if lock_exclusive(&file).is_ok() && is_current(&file, &path) {
                return Ok(StoreLock { _file: file });
            }
            if Instant::now() >= deadline {
                return Err(LockError::Busy { path });
            }
            thread::sleep(RETRY_INTERVAL);
        }
    }
}

fn open_lock_file(path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|source| LockError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

/// The locked descriptor must still be the file at `path`. A lock taken on
/// an unlinked or replaced file guards nothing.
#[cfg(unix)]
fn is_current(file: &File, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (file.metadata(), std::fs::metadata(path)) {
        (Ok(held), Ok(on_disk)) => held.dev() == on_disk.dev() && held.ino() == on_disk.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_current(_file: &File, _path: &Path) -> bool {
    true
}
