//! Drives a single command from request to rendered reply.

use std::io::Write;

use pos_config::Config;
use pos_messages::{Command, Request};
use tracing::info;

use crate::AppError;
use crate::bootstrap;
use crate::command::build_request;
use crate::output::{DisplayConfig, Reply, render_response, trace_request, trace_response};
use crate::transport::{Timeouts, exchange};

pub(crate) struct Dispatcher<'a> {
    config: &'a Config,
    display: DisplayConfig,
    request_id: &'a str,
}

impl<'a> Dispatcher<'a> {
    pub(crate) const fn new(config: &'a Config, display: DisplayConfig, request_id: &'a str) -> Self {
        Self {
            config,
            display,
            request_id,
        }
    }

    /// Runs `command` and returns the status code of its reply.
    ///
    /// Transport and decoding failures are returned as errors; a reply with a
    /// nonzero status is rendered and its code returned.
    pub(crate) fn dispatch<W, E>(
        &self,
        command: Command,
        stdout: &mut W,
        stderr: &mut E,
    ) -> Result<i32, AppError>
    where
        W: Write,
        E: Write,
    {
        let request = build_request(self.request_id, command);
        let serialized = request.to_json().map_err(AppError::EncodeRequest)?;
        trace_request(&serialized, self.display, stderr)?;

        let reply = if request.command.id().is_bootstrap() {
            self.bootstrap(&request, stderr)?
        } else {
            self.send(&serialized, stderr)?
        };

        let status = render_response(&request.command, &reply, self.display, stdout)?;
        info!(
            command = request.command.id().wire_name(),
            code = status,
            "command completed"
        );
        Ok(status)
    }

    fn bootstrap<E: Write>(&self, request: &Request, stderr: &mut E) -> Result<Reply, AppError> {
        let reply = Reply::synthesised(bootstrap::start_system(self.config, &request.request_id))?;
        trace_response(reply.raw(), self.display, stderr)?;
        Ok(reply)
    }

    fn send<E: Write>(&self, serialized: &str, stderr: &mut E) -> Result<Reply, AppError> {
        let raw = exchange(
            self.config.daemon_socket(),
            Timeouts::from_config(self.config),
            serialized,
        )?;
        trace_response(&raw, self.display, stderr)?;
        Reply::received(raw)
    }
}
