//! Claim acquisition: the read, check, lock, and write sequence.

use super::guard::OwnershipGuard;
use super::read::{decode, load_from, read_marker};
use super::status::MarkerStatus;
use crate::error::{PidfileError, Result};
use crate::liveness::{LivenessOracle, SignalProbe};
use crate::pid::Pid;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Settings applied when a claim creates or writes a PID file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOptions {
    /// Permission bits for a newly created PID file (before the umask).
    pub mode: u32,

    /// Create missing parent directories of the PID file.
    pub create_parent_dirs: bool,

    /// `fsync` the PID file after writing the claim.
    pub sync: bool,
}

impl Default for ClaimOptions {
    fn default() -> Self {
        Self {
            mode: 0o644,
            create_parent_dirs: false,
            sync: true,
        }
    }
}

/// Claims PID files on behalf of the current process.
///
/// The liveness oracle and the source of the current process id are
/// injectable so the claim logic can be exercised with fabricated owners.
#[derive(Debug, Clone)]
pub struct ClaimManager<O = SignalProbe> {
    oracle: O,
    current_pid: fn() -> Pid,
    options: ClaimOptions,
}

impl ClaimManager<SignalProbe> {
    /// A manager using the null-signal probe and the real process id.
    pub fn new() -> Self {
        Self {
            oracle: SignalProbe,
            current_pid: Pid::current,
            options: ClaimOptions::default(),
        }
    }
}

impl Default for ClaimManager<SignalProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: LivenessOracle> ClaimManager<O> {
    /// Replace the liveness oracle.
    pub fn with_oracle<P: LivenessOracle>(self, oracle: P) -> ClaimManager<P> {
        ClaimManager {
            oracle,
            current_pid: self.current_pid,
            options: self.options,
        }
    }

    /// Replace the function reporting the claiming process id.
    pub fn with_current_pid(mut self, current_pid: fn() -> Pid) -> Self {
        self.current_pid = current_pid;
        self
    }

    /// Replace the claim options.
    pub fn with_options(mut self, options: ClaimOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ClaimOptions {
        &self.options
    }

    /// Claim `path` for the current process and release the lock right away.
    ///
    /// On success the file contains the current process id. The lock is held
    /// only while writing; afterwards the claim is protected solely by later
    /// claimants finding this process alive. Use [`ClaimManager::claim`] to
    /// keep the lock for as long as the claim matters.
    ///
    /// # Errors
    ///
    /// * `OwnerActive` - the file names a running process
    /// * `LockUnavailable` - another process holds the lock right now
    /// * `ActivityCheckFailed` - the recorded owner's liveness is unknown
    /// * `MarkerReadFailed` / `MarkerParseFailed` - unreadable or malformed file
    /// * `MarkerOpenFailed` / `LockFailed` / `MarkerWriteFailed` - I/O failures
    ///
    /// Only a `MarkerWriteFailed` can leave the file modified.
    pub fn ensure_ownership<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let guard = self.claim(path)?;
        drop(guard);
        Ok(())
    }

    /// Claim `path` for the current process and keep the lock.
    ///
    /// Same checks and errors as [`ClaimManager::ensure_ownership`]. The
    /// returned guard holds the exclusive lock until it is dropped or
    /// released; the file itself is never removed.
    pub fn claim<P: AsRef<Path>>(&self, path: P) -> Result<OwnershipGuard> {
        let path = path.as_ref();

        let seen = read_marker(path)?;
        debug!(path = %path.display(), owner = ?seen, "read PID file");
        if let Some(owner) = seen {
            self.ensure_inactive(path, owner)?;
        }

        let mut file = self.open(path)?;
        lock_exclusive(&file, path)?;
        debug!(path = %path.display(), "locked PID file");

        // Dropping `file` on any early return closes it and releases the lock.
        let current = decode(path, &load_from(&mut file, path)?)?;
        if current != seen
            && let Some(owner) = current
        {
            debug!(path = %path.display(), %owner, "PID file changed before lock, re-checking");
            self.ensure_inactive(path, owner)?;
        }

        let pid = (self.current_pid)();
        write_claim(&mut file, path, pid, self.options.sync)?;
        info!(path = %path.display(), %pid, previous = ?current, "claimed PID file");

        Ok(OwnershipGuard::new(path.to_path_buf(), pid, file))
    }

    /// Report the state of `path` without locking or modifying it.
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> Result<MarkerStatus> {
        super::status::inspect_with(&self.oracle, path.as_ref())
    }

    fn ensure_inactive(&self, path: &Path, owner: Pid) -> Result<()> {
        match self.oracle.is_active(owner) {
            Ok(true) => Err(PidfileError::OwnerActive {
                path: path.to_path_buf(),
                pid: owner,
            }),
            Ok(false) => {
                warn!(path = %path.display(), %owner, "reclaiming stale PID file");
                Ok(())
            }
            Err(source) => Err(PidfileError::ActivityCheckFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn open(&self, path: &Path) -> Result<File> {
        let open_failed = |source| PidfileError::MarkerOpenFailed {
            path: path.to_path_buf(),
            source,
        };

        if self.options.create_parent_dirs
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(open_failed)?;
        }

        // No truncation here: a claim that fails to lock must leave the content intact.
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(self.options.mode)
            .open(path)
            .map_err(open_failed)
    }
}

/// Take the exclusive lock without blocking.
fn lock_exclusive(file: &File, path: &Path) -> Result<()> {
    file.try_lock_exclusive()
        .map_err(|e| classify_lock_error(path, e))
}

/// Contention means another claimant; every other lock error is a failure.
pub(super) fn classify_lock_error(path: &Path, e: std::io::Error) -> PidfileError {
    if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
        PidfileError::LockUnavailable {
            path: path.to_path_buf(),
        }
    } else {
        PidfileError::LockFailed {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Replace the file content with `pid` in decimal, no trailing newline.
fn write_claim(file: &mut File, path: &Path, pid: Pid, sync: bool) -> Result<()> {
    let write = |file: &mut File| -> std::io::Result<()> {
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(pid.to_string().as_bytes())?;
        if sync {
            file.sync_all()?;
        }
        Ok(())
    };

    write(file).map_err(|source| PidfileError::MarkerWriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Claim `path` with the default [`ClaimManager`], releasing the lock at once.
///
/// See [`ClaimManager::ensure_ownership`].
pub fn ensure_ownership<P: AsRef<Path>>(path: P) -> Result<()> {
    ClaimManager::new().ensure_ownership(path)
}

/// Claim `path` with the default [`ClaimManager`] and keep the lock.
///
/// See [`ClaimManager::claim`].
pub fn claim<P: AsRef<Path>>(path: P) -> Result<OwnershipGuard> {
    ClaimManager::new().claim(path)
}
