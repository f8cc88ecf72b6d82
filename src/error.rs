//! Error types for pidclaim.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Every variant names the PID file involved and keeps the underlying cause as
//! its `source`.

use crate::exit_codes;
use crate::liveness::LivenessError;
use crate::pid::Pid;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for PID file claims.
///
/// Each variant maps to a specific exit code for the `pidclaim` binary.
#[derive(Error, Debug)]
pub enum PidfileError {
    /// The PID file names a process that is still running.
    #[error("process {pid} recorded in '{}' is still running", path.display())]
    OwnerActive { path: PathBuf, pid: Pid },

    /// Another process holds the exclusive lock on the PID file.
    #[error("PID file '{}' is locked by another process", path.display())]
    LockUnavailable { path: PathBuf },

    /// The liveness of the recorded owner could not be determined.
    #[error(
        "could not determine whether the owner of '{}' is running: {source}",
        path.display()
    )]
    ActivityCheckFailed {
        path: PathBuf,
        #[source]
        source: LivenessError,
    },

    /// The PID file exists but could not be read.
    #[error("failed to read PID file '{}': {source}", path.display())]
    MarkerReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PID file content is not a process id.
    #[error(
        "failed to parse PID file '{}': {content:?} is not a process id",
        path.display()
    )]
    MarkerParseFailed {
        path: PathBuf,
        content: String,
        #[source]
        source: MarkerFormatError,
    },

    /// The PID file could not be opened or created.
    #[error("failed to open PID file '{}': {source}", path.display())]
    MarkerOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Locking failed for a reason other than contention.
    #[error("failed to lock PID file '{}': {source}", path.display())]
    LockFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The claim could not be written after the lock was taken.
    #[error("failed to write PID file '{}': {source}", path.display())]
    MarkerWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PidfileError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PidfileError::OwnerActive { .. } | PidfileError::LockUnavailable { .. } => {
                exit_codes::ALREADY_RUNNING
            }
            PidfileError::ActivityCheckFailed { .. } => exit_codes::ACTIVITY_UNKNOWN,
            PidfileError::LockFailed { .. } => exit_codes::LOCK_FAILURE,
            PidfileError::MarkerReadFailed { .. }
            | PidfileError::MarkerParseFailed { .. }
            | PidfileError::MarkerOpenFailed { .. }
            | PidfileError::MarkerWriteFailed { .. } => exit_codes::USER_ERROR,
        }
    }

    /// Whether the error means some other live process owns the PID file.
    pub fn is_already_running(&self) -> bool {
        matches!(
            self,
            PidfileError::OwnerActive { .. } | PidfileError::LockUnavailable { .. }
        )
    }

    /// The PID file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            PidfileError::OwnerActive { path, .. }
            | PidfileError::LockUnavailable { path }
            | PidfileError::ActivityCheckFailed { path, .. }
            | PidfileError::MarkerReadFailed { path, .. }
            | PidfileError::MarkerParseFailed { path, .. }
            | PidfileError::MarkerOpenFailed { path, .. }
            | PidfileError::LockFailed { path, .. }
            | PidfileError::MarkerWriteFailed { path, .. } => path,
        }
    }
}

/// Why PID file content could not be decoded.
#[derive(Error, Debug)]
pub enum MarkerFormatError {
    /// The content is not a decimal `i32`.
    #[error(transparent)]
    NotANumber(#[from] ParseIntError),

    /// The file is longer than any process id could be.
    #[error("content is longer than {max} bytes")]
    TooLong { max: usize },
}

/// Result type alias for pidclaim operations.
pub type Result<T> = std::result::Result<T, PidfileError>;
