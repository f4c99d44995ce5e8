use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a writer waits for a busy row before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const FIRST_RETRY: Duration = Duration::from_millis(5);
const MAX_RETRY: Duration = Duration::from_millis(100);

/// Advisory lock held while one row document is being replaced.
///
/// flock on Unix, so a TUI session and CLI invocations never interleave a
/// write to the same row. It does not order them: the last writer wins.
/// The lock file stays on disk after release so every writer locks the
/// same inode.
pub struct FileLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is held by another weekflow process (waited {waited_ms} ms)")]
    Timeout { path: PathBuf, waited_ms: u128 },
}

impl FileLock {
    /// Take the lock file at `path`, retrying with a doubling back-off for
    /// up to `timeout`.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockError::CreateError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let start = Instant::now();
        let mut wait = FIRST_RETRY;
        while let Err(e) = try_lock(&file) {
            let waited = start.elapsed();
            if waited >= timeout {
                tracing::warn!(path = %path.display(), error = %e, "lock wait timed out");
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited_ms: waited.as_millis(),
                });
            }
            std::thread::sleep(wait.min(timeout - waited));
            wait = (wait * 2).min(MAX_RETRY);
        }

        Ok(FileLock { _file: file })
    }

    pub fn acquire_default(path: &Path) -> Result<Self, LockError> {
        Self::acquire(path, DEFAULT_LOCK_TIMEOUT)
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("1.lock");
        let lock = FileLock::acquire_default(&path).unwrap();
        drop(lock);
        assert!(path.exists());
        assert!(FileLock::acquire(&path, Duration::ZERO).is_ok());
    }

    #[test]
    fn waiter_and_newcomer_contend_for_one_lock() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("1.lock");
        let first = FileLock::acquire_default(&path).unwrap();

        let (acquired_tx, acquired_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter_path = path.clone();
        let waiter = thread::spawn(move || {
            let lock = FileLock::acquire(&waiter_path, Duration::from_secs(5)).unwrap();
            acquired_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(lock);
        });

        thread::sleep(Duration::from_millis(30));
        drop(first);
        acquired_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // The waiter holds the row now, so a third writer must wait
        let third = FileLock::acquire(&path, Duration::from_millis(100));
        assert!(matches!(third, Err(LockError::Timeout { .. })));

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(FileLock::acquire(&path, Duration::ZERO).is_ok());
    }

    #[test]
    fn busy_row_times_out() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("1.lock");
        let _held = FileLock::acquire_default(&path).unwrap();
        let second = FileLock::acquire(&path, Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[test]
    fn rows_lock_independently() {
        let tmp = TempDir::new().unwrap();
        let _one = FileLock::acquire_default(&tmp.path().join("1.lock")).unwrap();
        assert!(FileLock::acquire(&tmp.path().join("2.lock"), Duration::ZERO).is_ok());
    }
}
