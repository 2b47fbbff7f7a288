//! Local start-up of the PoseidonOS daemon.
//!
//! `system start` never talks to the control socket: the daemon is not
//! running yet. Instead the start script shipped next to the CLI is executed
//! and its exit status is turned into a locally built [`Response`].
//!
//! The script's standard streams are detached. A daemon it leaves running in
//! the background must not keep `system start` waiting on an inherited pipe.

use std::io;
use std::path::PathBuf;
use std::process::{self, ExitStatus, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use pos_config::Config;
use pos_messages::{CommandId, Response, Status};
use thiserror::Error;
use tracing::{debug, info};

/// Status code reported when the daemon could not be launched.
pub(crate) const START_FAILURE_CODE: i32 = 11000;

/// Location of the start script relative to the directory of the CLI binary.
const START_SCRIPT: &str = "../script/start_poseidonos.sh";

#[derive(Debug, Error)]
pub(crate) enum LaunchError {
    #[error("cannot locate the running executable: {0}")]
    CurrentExecutable(io::Error),
    #[error("executable path {} is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("failed to run {script}: {source}")]
    Spawn {
        script: Utf8PathBuf,
        source: io::Error,
    },
    #[error("{script} exited with {status}")]
    Exited {
        script: Utf8PathBuf,
        status: ExitStatus,
    },
}

/// Returns the configured start script, or the one shipped beside the binary.
pub(crate) fn resolve_start_script(config: &Config) -> Result<Utf8PathBuf, LaunchError> {
    if let Some(script) = config.start_script() {
        return Ok(script.to_owned());
    }
    let executable = std::env::current_exe().map_err(LaunchError::CurrentExecutable)?;
    let executable = Utf8PathBuf::from_path_buf(executable).map_err(LaunchError::NonUtf8Path)?;
    Ok(script_beside(&executable))
}

fn script_beside(executable: &Utf8Path) -> Utf8PathBuf {
    executable
        .parent()
        .unwrap_or_else(|| Utf8Path::new("."))
        .join(START_SCRIPT)
}

/// Runs the start script and waits for the script itself to exit.
pub(crate) fn launch(script: &Utf8Path) -> Result<(), LaunchError> {
    info!(script = %script, "launching PoseidonOS");
    let status = process::Command::new(script.as_std_path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| LaunchError::Spawn {
            script: script.to_owned(),
            source,
        })?;
    debug!(script = %script, %status, "start script exited");
    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::Exited {
            script: script.to_owned(),
            status,
        })
    }
}

/// Starts the daemon and reports the outcome as a locally built reply.
///
/// Success carries status 0 and the launch time in `lastSuccessTime`; any
/// failure carries [`START_FAILURE_CODE`] and the reason.
pub(crate) fn start_system(config: &Config, request_id: &str) -> Response {
    let command = CommandId::StartSystem.wire_name();
    match resolve_start_script(config).and_then(|script| launch(&script)) {
        Ok(()) => {
            info!("PoseidonOS has started");
            Response::local(request_id, command, Status::success(), Some(unix_now()))
        }
        Err(error) => {
            debug!(%error, code = START_FAILURE_CODE, "PoseidonOS failed to start");
            Response::local(
                request_id,
                command,
                Status::failure(
                    START_FAILURE_CODE,
                    format!("PoseidonOS has failed to start: {error}"),
                ),
                None,
            )
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}
