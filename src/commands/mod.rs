//! Command implementations for pidclaim.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command returns the process exit code on success;
//! claim failures propagate as `PidfileError` so `main` can map them.

use crate::cli::{Command, RunArgs, StatusArgs};
use anyhow::{Context, Result, anyhow};
use pidclaim::{ClaimManager, exit_codes};
use std::process;
use tracing::debug;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Status(args) => cmd_status(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn cmd_status(args: StatusArgs) -> Result<i32> {
    let status = pidclaim::inspect(&args.path)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string(&status).context("failed to serialize status")?
        );
    } else {
        println!("{}: {}", args.path.display(), status);
    }

    Ok(if status.is_active() {
        exit_codes::ALREADY_RUNNING
    } else {
        exit_codes::SUCCESS
    })
}

fn cmd_run(args: RunArgs) -> Result<i32> {
    let (program, program_args) = args
        .program
        .split_first()
        .ok_or_else(|| anyhow!("no program given"))?;

    let manager = ClaimManager::new().with_options(args.claim_options());
    let guard = manager.claim(&args.path)?;
    debug!(pid = %guard.pid(), program = ?program, "running under claim");

    let status = process::Command::new(program)
        .args(program_args)
        .status()
        .map_err(|e| anyhow!("failed to run '{}': {}", program.to_string_lossy(), e))?;

    guard.release()?;

    // Killed by a signal: no exit code to forward.
    Ok(status.code().unwrap_or(exit_codes::USER_ERROR))
}
