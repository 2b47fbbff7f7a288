//! Error types and diagnostics helpers for the CLI runtime.

use std::io;
use std::sync::Arc;

use pos_messages::MessageError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[error("timed out after {timeout_ms} ms while {operation} daemon at {endpoint}")]
    Timeout {
        endpoint: String,
        operation: &'static str,
        timeout_ms: u128,
    },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("connection to daemon is already closed")]
    ConnectionClosed,
    #[error("failed to serialise command request: {0}")]
    EncodeRequest(#[source] MessageError),
    #[error("failed to send request to daemon: {0}")]
    SendRequest(io::Error),
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(io::Error),
    #[error("daemon closed the connection without replying")]
    EmptyResponse,
    #[error("daemon at {endpoint} closed the connection after {received} bytes of an incomplete reply")]
    ClosedMidReply { endpoint: String, received: usize },
    #[error("daemon reply exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },
    #[error("malformed response from daemon: {0}")]
    MalformedResponse(#[source] MessageError),
    #[error("failed to serialise response: {0}")]
    EncodeResponse(#[source] MessageError),
    #[error("failed to write output: {0}")]
    Render(io::Error),
}

/// Broad failure classes used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    Usage,
    Configuration,
    Connection,
    Timeout,
    Protocol,
    Output,
}

impl AppError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::CliUsage(_) => ErrorClass::Usage,
            Self::LoadConfiguration(_) | Self::Telemetry(_) => ErrorClass::Configuration,
            Self::Resolve { .. }
            | Self::Connect { .. }
            | Self::ConnectionClosed
            | Self::SendRequest(_)
            | Self::ReadResponse(_)
            | Self::EmptyResponse
            | Self::ClosedMidReply { .. } => ErrorClass::Connection,
            #[cfg(not(unix))]
            Self::UnsupportedUnixTransport(_) => ErrorClass::Connection,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::ResponseTooLarge { .. }
            | Self::MalformedResponse(_)
            | Self::EncodeRequest(_)
            | Self::EncodeResponse(_) => ErrorClass::Protocol,
            Self::Render(_) => ErrorClass::Output,
        }
    }

    /// Maps an IO failure during an exchange onto [`AppError::Timeout`] when
    /// the socket deadline elapsed, otherwise onto `fallback`.
    pub(crate) fn from_exchange_io(
        error: io::Error,
        endpoint: &str,
        operation: &'static str,
        timeout_ms: u128,
        fallback: fn(io::Error) -> Self,
    ) -> Self {
        if is_timeout(&error) {
            Self::Timeout {
                endpoint: endpoint.to_owned(),
                operation,
                timeout_ms,
            }
        } else {
            fallback(error)
        }
    }
}

/// Socket deadlines surface as `WouldBlock` on Unix and `TimedOut` elsewhere.
pub(crate) fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
