//! Errors raised while encoding or decoding wire messages.

use thiserror::Error;

/// Failures surfaced by the message model.
#[derive(Debug, Error)]
pub enum MessageError {
    /// A request or response could not be serialised.
    #[error("failed to serialise message: {0}")]
    Serialise(#[source] serde_json::Error),
    /// A request envelope did not match the wire contract.
    #[error("malformed request: {0}")]
    MalformedRequest(#[source] serde_json::Error),
    /// A daemon reply did not match the wire contract.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}
