//! Runtime helpers for the CLI entrypoints.

use std::process::ExitCode;

/// Maps a daemon status code onto the process exit code.
///
/// Codes that fit in a byte pass through; anything else, such as the
/// five-digit failure classes the daemon reports, becomes a generic failure.
pub(crate) fn exit_code_from_status(status: i32) -> ExitCode {
    match u8::try_from(status) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
