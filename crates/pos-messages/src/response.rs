//! Response envelope returned by the daemon.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SUCCESS_CODE;
use crate::error::MessageError;

/// A decoded daemon reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Correlation identifier copied from the request.
    #[serde(rename = "rid", default)]
    pub request_id: String,
    /// Wire identifier of the command that produced this reply.
    #[serde(default)]
    pub command: String,
    /// Outcome of the command.
    pub result: CommandResult,
    /// Unix timestamp (seconds) of the last successful completion.
    #[serde(
        rename = "lastSuccessTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_success_time: Option<i64>,
    /// Daemon state snapshot attached to replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// The `result` object of a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Success or failure classification.
    pub status: Status,
    /// Command-specific payload, usually absent on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Daemon-assigned status of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Zero on success; any other value is a failure class owned by the
    /// daemon.
    pub code: i32,
    /// Optional explanation supplied by the daemon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Status {
    /// A successful status with no description.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            description: None,
        }
    }

    /// A failed status carrying `code` and `description`.
    #[must_use]
    pub fn failure(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: Some(description.into()),
        }
    }
}

impl Response {
    /// Builds a reply locally rather than receiving it from the daemon.
    #[must_use]
    pub fn local(
        request_id: impl Into<String>,
        command: impl Into<String>,
        status: Status,
        last_success_time: Option<i64>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            command: command.into(),
            result: CommandResult { status, data: None },
            last_success_time,
            info: None,
        }
    }

    /// Decodes a reply received from the daemon.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::MalformedResponse`] when the payload is not
    /// JSON or lacks required fields such as `result.status.code`.
    pub fn from_json(payload: &str) -> Result<Self, MessageError> {
        serde_json::from_str(payload).map_err(MessageError::MalformedResponse)
    }

    /// Encodes the reply as single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Serialise`] if serde rejects the payload.
    pub fn to_json(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(MessageError::Serialise)
    }

    /// Status code reported for the command.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.result.status.code
    }

    /// Description reported for the command, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.result.status.description.as_deref()
    }

    /// Returns true when the daemon reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.status.code == SUCCESS_CODE
    }

    /// Command payload, if the daemon attached one.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.result.data.as_ref()
    }
}
