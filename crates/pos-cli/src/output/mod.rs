//! Presentation of requests and daemon replies.
//!
//! Replies are printed either as the daemon's JSON (`--json`) or as a short
//! human summary. `--debug` additionally echoes the request and the full
//! reply on stderr. Nothing here modifies the reply it renders.

mod render;

use std::io::Write;

use pos_messages::{Command, Response};
use tracing::info;

use crate::AppError;
use crate::telemetry::REQUEST_TARGET;

/// Display flags, fixed once the command line has been parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DisplayConfig {
    /// Echo requests and replies on stderr.
    pub(crate) debug: bool,
    /// Print replies as raw JSON.
    pub(crate) raw: bool,
}

/// A reply together with the exact text it was decoded from.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    raw: String,
    response: Response,
}

impl Reply {
    /// Decodes a reply read from the daemon.
    pub(crate) fn received(raw: String) -> Result<Self, AppError> {
        let response = Response::from_json(&raw).map_err(AppError::MalformedResponse)?;
        Ok(Self { raw, response })
    }

    /// Wraps a reply built by the CLI itself.
    pub(crate) fn synthesised(response: Response) -> Result<Self, AppError> {
        let raw = response.to_json().map_err(AppError::EncodeResponse)?;
        Ok(Self { raw, response })
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) const fn response(&self) -> &Response {
        &self.response
    }
}

/// Records the serialised request, echoing it on stderr in debug mode.
///
/// The event is logged at `info` under [`REQUEST_TARGET`], below the default
/// `warn` filter; `--log-filter warn,pos_cli::request=info` surfaces it.
pub(crate) fn trace_request<E: Write>(
    serialized: &str,
    display: DisplayConfig,
    stderr: &mut E,
) -> Result<(), AppError> {
    info!(target: REQUEST_TARGET, request = serialized, "request to PoseidonOS");
    if display.debug {
        writeln!(stderr, "Request to PoseidonOS:\n{serialized}").map_err(AppError::Render)?;
    }
    Ok(())
}

/// Echoes the undecoded reply on stderr in debug mode.
pub(crate) fn trace_response<E: Write>(
    raw: &str,
    display: DisplayConfig,
    stderr: &mut E,
) -> Result<(), AppError> {
    if display.debug {
        writeln!(stderr, "Response from PoseidonOS:\n{}", raw.trim_end())
            .map_err(AppError::Render)?;
    }
    Ok(())
}

/// Prints `reply` and returns the status code it carries.
pub(crate) fn render_response<W: Write>(
    command: &Command,
    reply: &Reply,
    display: DisplayConfig,
    stdout: &mut W,
) -> Result<i32, AppError> {
    if display.raw {
        writeln!(stdout, "{}", reply.raw().trim_end()).map_err(AppError::Render)?;
    } else {
        stdout
            .write_all(render::summary(command, reply.response()).as_bytes())
            .map_err(AppError::Render)?;
    }
    stdout.flush().map_err(AppError::Render)?;
    Ok(reply.response().code())
}
