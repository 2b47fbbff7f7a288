//! Shared configuration for `poseidonos-cli`.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path` or `POS_CONFIG_PATH`), then `POS_*`
//! environment variables, then command-line flags.

mod defaults;
mod logging;
mod socket;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_DAEMON_HOST, DEFAULT_LOG_FILTER, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_TCP_PORT,
    default_log_filter_string, default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "POS")]
pub struct Config {
    /// Control socket of the daemon.
    #[ortho_config(default = default_socket_endpoint())]
    pub daemon_socket: SocketEndpoint,
    /// `tracing` filter expression for CLI diagnostics.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for CLI diagnostics.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Read/write timeout applied to each request, in milliseconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
    /// Script that launches the daemon; defaults to
    /// `../script/start_poseidonos.sh` next to the running binary.
    pub start_script: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            start_script: None,
        }
    }
}

impl Config {
    /// Control socket of the daemon.
    #[must_use]
    pub const fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostic output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Read/write timeout applied to each request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Explicitly configured start script, if any.
    #[must_use]
    pub fn start_script(&self) -> Option<&Utf8Path> {
        self.start_script.as_deref()
    }
}
