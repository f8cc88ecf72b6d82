//! Exit code constants for the pidclaim CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or malformed PID file, I/O failure)
//! - 2: Another live process owns the PID file
//! - 3: The recorded owner's liveness could not be determined
//! - 4: Lock acquisition failure other than contention

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable or malformed PID file, or I/O failure.
pub const USER_ERROR: i32 = 1;

/// The PID file names a running process, or its lock is held right now.
pub const ALREADY_RUNNING: i32 = 2;

/// The liveness probe could not decide whether the recorded owner is running.
pub const ACTIVITY_UNKNOWN: i32 = 3;

/// Lock acquisition failure: the lock call itself failed.
pub const LOCK_FAILURE: i32 = 4;
