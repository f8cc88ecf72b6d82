//! PID file claims.
//!
//! A PID file (the "marker") holds the decimal process id of the process
//! that currently owns some resource slot, with no surrounding whitespace.
//!
//! # Claiming
//!
//! [`ensure_ownership`] and [`claim`] run the same sequence:
//! 1. Read the marker. A missing or empty file is no claim; malformed content
//!    is an error and the file is left alone.
//! 2. Ask the [`LivenessOracle`](crate::liveness::LivenessOracle) about the
//!    recorded id. A running owner, or an unanswerable probe, aborts the claim.
//! 3. Open (or create) the file without truncating it and take an exclusive,
//!    non-blocking `flock`. Contention aborts with `LockUnavailable`.
//! 4. Re-read the content under the lock. A claimant that finished between
//!    steps 1 and 3 is caught here and re-checked.
//! 5. Truncate and write the current process id.
//!
//! The liveness check is a pre-filter; the lock is what serializes racing
//! claimants. Nothing is written unless every check passed.
//!
//! # Lock lifetime
//!
//! [`ensure_ownership`] closes the file as soon as the id is written, so a
//! later claimant relies solely on the liveness probe to see that the owner
//! is still running. [`claim`] keeps the lock in an [`OwnershipGuard`]
//! instead, so a concurrent claimant is refused even if the probe is fooled
//! by a recycled process id.
//!
//! Marker files are never deleted, not even when a guard is dropped:
//! unlinking a locked file would let the next claimant lock a fresh inode
//! while the previous holder is still running.

mod claim;
mod guard;
mod read;
mod status;


// Re-export public API
pub use claim::{ClaimManager, ClaimOptions, claim, ensure_ownership};
pub use guard::OwnershipGuard;
pub use read::read_marker;
pub use status::{MarkerStatus, inspect};
