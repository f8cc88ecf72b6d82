//! CLI argument parsing for pidclaim.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use pidclaim::ClaimOptions;
use std::ffi::OsString;
use std::path::PathBuf;

/// pidclaim: run a program as the single instance recorded in a PID file.
///
/// A PID file records the process id of the current owner. A new claimant
/// takes over only if the recorded process is gone and nobody holds the
/// file's lock.
#[derive(Parser, Debug)]
#[command(name = "pidclaim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log every claim decision to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for pidclaim.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show who owns a PID file.
    ///
    /// Exits with 2 if the recorded process is running, 0 otherwise.
    Status(StatusArgs),

    /// Claim a PID file, then run a program while holding the claim.
    ///
    /// Refuses to start the program if another live process owns the file.
    /// Exits with the program's exit code.
    Run(RunArgs),
}

/// Arguments for the `status` command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the PID file.
    pub path: PathBuf,

    /// Print the status as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the PID file.
    pub path: PathBuf,

    /// Permission bits (octal) for a newly created PID file.
    #[arg(long, value_parser = parse_mode, default_value = "644")]
    pub mode: u32,

    /// Create missing parent directories of the PID file.
    #[arg(long)]
    pub create_dirs: bool,

    /// Skip the fsync after writing the PID file.
    #[arg(long)]
    pub no_sync: bool,

    /// Program to run and its arguments, after `--`.
    #[arg(last = true, required = true, value_name = "PROGRAM")]
    pub program: Vec<OsString>,
}

impl RunArgs {
    /// The claim options selected by the flags.
    pub fn claim_options(&self) -> ClaimOptions {
        ClaimOptions {
            mode: self.mode,
            create_parent_dirs: self.create_dirs,
            sync: !self.no_sync,
        }
    }
}

/// Parse an octal permission mode such as `644` or `0o600`.
fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|e| format!("invalid octal mode '{}': {}", s, e))?;
    if mode > 0o7777 {
        return Err(format!("mode '{}' is out of range", s));
    }
    Ok(mode)
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["pidclaim", "status", "/run/app.pid", "--json"]).unwrap();
        match cli.command {
            Command::Status(args) => {
                assert_eq!(args.path, PathBuf::from("/run/app.pid"));
                assert!(args.json);
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn parse_run_with_program() {
        let cli = Cli::try_parse_from([
            "pidclaim",
            "-v",
            "run",
            "/run/app.pid",
            "--mode",
            "600",
            "--create-dirs",
            "--",
            "server",
            "--port",
            "8080",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(
                    args.program,
                    vec![
                        OsString::from("server"),
                        OsString::from("--port"),
                        OsString::from("8080")
                    ]
                );
                let options = args.claim_options();
                assert_eq!(options.mode, 0o600);
                assert!(options.create_parent_dirs);
                assert!(options.sync);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn run_defaults_match_claim_defaults() {
        let cli = Cli::try_parse_from(["pidclaim", "run", "app.pid", "--", "true"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.claim_options(), ClaimOptions::default()),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_a_program() {
        assert!(Cli::try_parse_from(["pidclaim", "run", "app.pid"]).is_err());
    }

    #[test]
    fn parse_mode_accepts_octal_forms() {
        assert_eq!(parse_mode("644").unwrap(), 0o644);
        assert_eq!(parse_mode("0o600").unwrap(), 0o600);
        assert_eq!(parse_mode("0640").unwrap(), 0o640);
        assert!(parse_mode("999").is_err());
        assert!(parse_mode("77777").is_err());
    }
}
