//! CLI entrypoint for `poseidonos-cli`.
//!
//! The binary delegates to [`pos_cli::run`], which loads configuration,
//! parses the command line, and exchanges one request with the daemon.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    pos_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
