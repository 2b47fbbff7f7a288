use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Loopback address the daemon's control server binds to.
pub const DEFAULT_DAEMON_HOST: &str = "127.0.0.1";

/// TCP port of the daemon's control server.
pub const DEFAULT_TCP_PORT: u16 = 18716;

/// Default log filter expression; the CLI stays quiet unless asked.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default read/write timeout for a single request, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the CLI.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Computes the default socket endpoint for the daemon.
#[must_use]
pub fn default_socket_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp(DEFAULT_DAEMON_HOST, DEFAULT_TCP_PORT)
}
