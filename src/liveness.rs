//! Process liveness probing.
//!
//! The claim logic only needs one question answered: is the process named in
//! a PID file still alive? [`SignalProbe`] answers it with `kill(pid, 0)`,
//! which performs the permission and existence checks of a real signal
//! without delivering anything to the target.
//!
//! The answer is tri-state. "Gone" (`ESRCH`) and "alive" are definite;
//! anything else (typically `EPERM`, a live process owned by another user on
//! some systems) is reported as an error so callers never mistake an
//! unanswerable probe for an absent owner.

use crate::pid::Pid;
use nix::errno::Errno;
use nix::sys::signal::kill;
use thiserror::Error;

/// Reasons the liveness of a process could not be determined.
#[derive(Error, Debug)]
pub enum LivenessError {
    /// The id can never name a process (zero or negative).
    #[error("invalid process id {0}: must be a positive integer")]
    InvalidPid(Pid),

    /// The probe failed for a reason other than "no such process".
    #[error("failed to probe process {pid}: {source}")]
    Probe {
        pid: Pid,
        #[source]
        source: Errno,
    },
}

/// Decides whether a process id currently names a live process.
pub trait LivenessOracle {
    /// `Ok(true)` if alive, `Ok(false)` if definitely gone, `Err` if unknown.
    fn is_active(&self, pid: Pid) -> Result<bool, LivenessError>;
}

impl<T: LivenessOracle + ?Sized> LivenessOracle for &T {
    fn is_active(&self, pid: Pid) -> Result<bool, LivenessError> {
        (**self).is_active(pid)
    }
}

/// Null-signal liveness probe.
///
/// A recycled process id reads as alive: once the original owner has exited
/// and been reaped, the kernel may hand its id to an unrelated process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalProbe;

impl LivenessOracle for SignalProbe {
    fn is_active(&self, pid: Pid) -> Result<bool, LivenessError> {
        // kill(0, ..) and kill(-n, ..) address process groups, never a single process.
        if !pid.is_valid() {
            return Err(LivenessError::InvalidPid(pid));
        }

        match kill(nix::unistd::Pid::from_raw(pid.as_raw()), None) {
            Ok(()) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(source) => Err(LivenessError::Probe { pid, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn current_process_is_active() {
        assert!(SignalProbe.is_active(Pid::current()).unwrap());
    }

    #[test]
    fn unused_pid_is_inactive() {
        // Above the largest pid_max Linux accepts (2^22).
        assert!(!SignalProbe.is_active(Pid::from_raw(999_999_999)).unwrap());
    }

    #[test]
    fn reaped_child_is_inactive() {
        let mut child = Command::new("true").spawn().expect("failed to spawn `true`");
        let pid = Pid::from_raw(child.id() as i32);
        child.wait().unwrap();

        assert!(!SignalProbe.is_active(pid).unwrap());
    }

    #[test]
    fn non_positive_pids_are_rejected() {
        for raw in [0, -1, i32::MIN] {
            let err = SignalProbe.is_active(Pid::from_raw(raw)).unwrap_err();
            assert!(matches!(err, LivenessError::InvalidPid(p) if p.as_raw() == raw));
        }
    }

    #[test]
    fn foreign_process_is_active_or_unknown() {
        // pid 1 always exists; unprivileged callers get EPERM.
        match SignalProbe.is_active(Pid::from_raw(1)) {
            Ok(active) => assert!(active),
            Err(LivenessError::Probe { pid, source }) => {
                assert_eq!(pid, Pid::from_raw(1));
                assert_eq!(source, Errno::EPERM);
            }
            Err(other) => panic!("unexpected probe error: {other}"),
        }
    }

    #[test]
    fn probe_error_message_names_the_pid() {
        let err = LivenessError::Probe {
            pid: Pid::from_raw(77),
            source: Errno::EPERM,
        };
        assert!(err.to_string().contains("process 77"));
    }
}
