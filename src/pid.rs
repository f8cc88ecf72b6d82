//! Owner identifier recorded in a PID file.

use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// An operating-system process id (`pid_t`).
///
/// Any `i32` can be represented so that malformed markers (zero, negative)
/// survive parsing and are rejected by the liveness check instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Pid(i32);

impl Pid {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// The id of the calling process.
    pub fn current() -> Self {
        Self(nix::unistd::getpid().as_raw())
    }

    /// Whether this id can name a process at all (strictly positive).
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl FromStr for Pid {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_matches_std_process_id() {
        assert_eq!(Pid::current().as_raw() as u32, std::process::id());
        assert!(Pid::current().is_valid());
    }

    #[test]
    fn parses_decimal_text() {
        assert_eq!("4242".parse::<Pid>().unwrap(), Pid::from_raw(4242));
        assert_eq!("-7".parse::<Pid>().unwrap(), Pid::from_raw(-7));
        assert!("12ab".parse::<Pid>().is_err());
        assert!("".parse::<Pid>().is_err());
        assert!("99999999999".parse::<Pid>().is_err());
    }

    #[test]
    fn non_positive_ids_are_invalid() {
        assert!(!Pid::from_raw(0).is_valid());
        assert!(!Pid::from_raw(-1).is_valid());
        assert!(Pid::from_raw(1).is_valid());
    }

    #[test]
    fn displays_and_serializes_as_plain_number() {
        let pid = Pid::from_raw(31337);
        assert_eq!(pid.to_string(), "31337");
        assert_eq!(serde_json::to_string(&pid).unwrap(), "31337");
    }
}
