//! RAII guard for a held PID file claim.

use crate::error::{PidfileError, Result};
use crate::pid::Pid;
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keeps the exclusive lock on a claimed PID file.
///
/// When dropped, the lock is released and the file handle closed. The PID
/// file stays on disk with this process's id in it; the next claimant
/// recognizes it as stale once this process has exited.
/// If unlocking fails during drop, a warning is logged but no panic occurs.
#[derive(Debug)]
#[must_use = "dropping the guard releases the lock on the PID file"]
pub struct OwnershipGuard {
    /// Path to the PID file.
    path: PathBuf,

    /// The process id written into the file.
    pid: Pid,

    /// The locked handle; `None` once released manually.
    file: Option<File>,
}

impl OwnershipGuard {
    pub(super) fn new(path: PathBuf, pid: Pid, file: File) -> Self {
        Self {
            path,
            pid,
            file: Some(file),
        }
    }

    /// Get the path to the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The process id recorded by this claim.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Manually release the lock, reporting any unlock failure.
    pub fn release(mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => unlock(&file, &self.path),
            None => Ok(()),
        }
    }
}

fn unlock(file: &File, path: &Path) -> Result<()> {
    FileExt::unlock(file).map_err(|source| PidfileError::LockFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "released PID file lock");
    Ok(())
}

impl Drop for OwnershipGuard {
    fn drop(&mut self) {
        // Closing the handle releases the lock regardless of the unlock outcome.
        if let Some(file) = self.file.take()
            && let Err(e) = unlock(&file, &self.path)
        {
            warn!("{}", e);
        }
    }
}
