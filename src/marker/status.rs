//! Read-only inspection of a PID file.

use super::read::{decode, load};
use crate::error::{PidfileError, Result};
use crate::liveness::{LivenessOracle, SignalProbe};
use crate::pid::Pid;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// State of a PID file as seen by a would-be claimant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MarkerStatus {
    /// No file at the path.
    Absent,
    /// The file exists but records no process id.
    Empty,
    /// The recorded process is running.
    Active { pid: Pid },
    /// The recorded process is gone; a claim would succeed.
    Stale { pid: Pid },
}

impl MarkerStatus {
    /// The recorded process id, if any.
    pub fn pid(&self) -> Option<Pid> {
        match self {
            MarkerStatus::Active { pid } | MarkerStatus::Stale { pid } => Some(*pid),
            MarkerStatus::Absent | MarkerStatus::Empty => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MarkerStatus::Active { .. })
    }
}

impl fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerStatus::Absent => write!(f, "absent"),
            MarkerStatus::Empty => write!(f, "empty"),
            MarkerStatus::Active { pid } => write!(f, "active (pid {})", pid),
            MarkerStatus::Stale { pid } => write!(f, "stale (pid {})", pid),
        }
    }
}

/// Report the state of the PID file at `path` using the null-signal probe.
///
/// Neither locks nor modifies the file. The answer can be out of date as soon
/// as it is returned.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<MarkerStatus> {
    inspect_with(&SignalProbe, path.as_ref())
}

pub(super) fn inspect_with<O: LivenessOracle + ?Sized>(
    oracle: &O,
    path: &Path,
) -> Result<MarkerStatus> {
    let Some(content) = load(path)? else {
        return Ok(MarkerStatus::Absent);
    };
    let Some(pid) = decode(path, &content)? else {
        return Ok(MarkerStatus::Empty);
    };

    match oracle.is_active(pid) {
        Ok(true) => Ok(MarkerStatus::Active { pid }),
        Ok(false) => Ok(MarkerStatus::Stale { pid }),
        Err(source) => Err(PidfileError::ActivityCheckFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
