//! pidclaim: run a program as the single instance recorded in a PID file.
//!
//! This is the main entry point for the `pidclaim` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cli;
mod commands;

use cli::Cli;
use pidclaim::{PidfileError, exit_codes};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(exit_codes::USER_ERROR as u8)),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            let code = err
                .downcast_ref::<PidfileError>()
                .map_or(exit_codes::USER_ERROR, PidfileError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`); `--verbose` forces `debug`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
