//! pidclaim: single-instance process guard built on a PID file.
//!
//! A process that must not run twice calls [`ensure_ownership`] (or the
//! holding variant [`claim`]) once at startup with the path of its PID file.
//! The call either records the current process id in the file or reports
//! why it refused to:
//!
//! - the file names a process that is still running ([`PidfileError::OwnerActive`])
//! - another process holds the file's advisory lock right now
//!   ([`PidfileError::LockUnavailable`])
//! - the recorded owner's liveness could not be determined, or the file is
//!   unreadable or malformed
//!
//! # Known limitations
//!
//! Liveness is probed with the null signal, so a process id that the kernel
//! has recycled for an unrelated process reads as "still running". The lock
//! is advisory: writers that bypass this crate are not stopped.

pub mod error;
pub mod exit_codes;
pub mod liveness;
pub mod marker;
pub mod pid;

pub use error::{MarkerFormatError, PidfileError, Result};
pub use liveness::{LivenessError, LivenessOracle, SignalProbe};
pub use marker::{
    ClaimManager, ClaimOptions, MarkerStatus, OwnershipGuard, claim, ensure_ownership, inspect,
    read_marker,
};
pub use pid::Pid;
