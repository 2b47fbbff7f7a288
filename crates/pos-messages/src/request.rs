//! Request envelope sent to the daemon.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::MessageError;

/// A single control request.
///
/// Serialises as `{"rid": ..., "command": ..., "param": {...}}`, with `param`
/// absent for commands that take no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Client-assigned correlation identifier echoed back by the daemon.
    #[serde(rename = "rid")]
    pub request_id: String,
    /// The command and its parameters.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Builds a request for `command`.
    #[must_use]
    pub fn new(request_id: impl Into<String>, command: Command) -> Self {
        Self {
            request_id: request_id.into(),
            command,
        }
    }

    /// Encodes the request in its canonical single-line JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Serialise`] if serde rejects the payload.
    pub fn to_json(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(MessageError::Serialise)
    }

    /// Decodes a request, selecting the parameter shape from `command`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::MalformedRequest`] when the identifier is
    /// unknown or the parameters do not match it.
    pub fn from_json(payload: &str) -> Result<Self, MessageError> {
        serde_json::from_str(payload).map_err(MessageError::MalformedRequest)
    }
}
