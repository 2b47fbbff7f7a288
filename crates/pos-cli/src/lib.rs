//! Command-line runtime for `poseidonos-cli`.
//!
//! The module owns argument parsing, configuration bootstrapping, request
//! serialisation, and daemon transport. The runtime can be driven from the
//! binary entrypoint or from tests, where configuration loading and IO
//! streams are substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod bootstrap;
mod cli;
mod command;
mod config;
mod dispatch;
mod errors;
mod output;
mod runtime_utils;
mod telemetry;
mod transport;

use cli::Cli;
use command::process_request_id;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use dispatch::Dispatcher;
pub(crate) use errors::AppError;
use output::DisplayConfig;
use runtime_utils::exit_code_from_status;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `pos_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--daemon-socket",
    "--log-filter",
    "--log-format",
    "--request-timeout-ms",
    "--start-script",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    request_id: String,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self {
            io,
            loader,
            request_id: process_request_id(),
        }
    }

    #[cfg(test)]
    fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let result = Cli::try_parse_from(cli_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                let display = DisplayConfig {
                    debug: cli.debug,
                    raw: cli.json,
                };
                Dispatcher::new(&config, display, &self.request_id)
                    .dispatch(
                        cli.command.into(),
                        &mut *self.io.stdout,
                        &mut *self.io.stderr,
                    )
                    .map(exit_code_from_status)
            });

        match result {
            Ok(exit_code) => exit_code,
            // `--help` and `--version` arrive as clap errors meant for stdout.
            Err(AppError::CliUsage(usage)) if !usage.use_stderr() => {
                let _ = write!(self.io.stdout, "{}", usage.render());
                ExitCode::SUCCESS
            }
            Err(failure) => {
                // Logged below the default filter: the message on stderr is the report.
                debug!(class = ?failure.class(), error = %failure, "command failed");
                let _ = writeln!(self.io.stderr, "{failure}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = Vec::new();
    if let Some(first) = args.first() {
        cli_arguments.push(first.clone());
    }
    if let Some(rest) = args.get(split.command_start..) {
        cli_arguments.extend(rest.iter().cloned());
    }
    cli_arguments
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

/// Runs the CLI with a fixed request identifier so requests can be compared
/// against golden fixtures.
#[cfg(test)]
pub(crate) fn run_with_request_id<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    request_id: &str,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader)
        .with_request_id(request_id)
        .run(args)
}
