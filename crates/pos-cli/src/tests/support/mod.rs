//! Test support utilities for `poseidonos-cli` behavioural coverage.
//!
//! Supplies harness types for starting fake daemons, capturing CLI output, and
//! loading fixtures so step definitions and unit tests remain focused on their
//! assertions.

mod fake_daemon;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use pos_config::{Config, SocketEndpoint};
use rstest::fixture;

use crate::{AppError, ConfigLoader, IoStreams, run_with_request_id};

pub(super) use fake_daemon::{AfterReply, FakeDaemon};

/// Request identifier used by every test run so requests match fixtures.
pub(super) const TEST_REQUEST_ID: &str = "test-rid";

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Test world holding CLI state, daemon instance, and captured output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub daemon: Option<FakeDaemon>,
    pub reply: Option<String>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub fn start_daemon_with_reply(&mut self, reply: String) -> Result<()> {
        self.start_daemon(reply, AfterReply::HoldOpen)
    }

    pub fn start_daemon(&mut self, reply: String, after_reply: AfterReply) -> Result<()> {
        let daemon = FakeDaemon::spawn_with(reply.clone(), after_reply)?;
        self.config.daemon_socket = SocketEndpoint::tcp("127.0.0.1", daemon.port());
        self.daemon = Some(daemon);
        self.reply = Some(reply);
        Ok(())
    }

    /// Points the CLI at a local port nobody listens on.
    pub fn configure_unreachable_daemon(&mut self) -> Result<()> {
        self.config.daemon_socket = SocketEndpoint::tcp("127.0.0.1", unused_port()?);
        Ok(())
    }

    pub fn configure_start_script(&mut self, script: &str) {
        self.config.start_script = Some(Utf8PathBuf::from(script));
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = Self::build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        let exit = run_with_request_id(args, &mut io, &loader, TEST_REQUEST_ID);
        self.exit_code = Some(exit);
        if let Some(daemon) = self.daemon.as_mut() {
            self.requests = daemon.take_requests()?;
        }
        self.daemon = None;
        Ok(())
    }

    fn build_args(command: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("poseidonos-cli")];
        let trimmed = command.trim().trim_matches('"');
        if !trimmed.is_empty() {
            args.extend(trimmed.split_whitespace().map(OsString::from));
        }
        args
    }

    pub fn stdout_text(&self) -> Result<String> {
        decode_utf8(self.stdout.clone(), "stdout")
    }

    pub fn stderr_text(&self) -> Result<String> {
        decode_utf8(self.stderr.clone(), "stderr")
    }

    pub fn assert_exit_code(&self, expected: u8) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::from(expected),
            "expected exit code {expected}, got {:?}",
            exit
        );
        Ok(())
    }

    pub fn assert_failure(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::FAILURE,
            "expected failure exit code, got {:?}",
            exit
        );
        Ok(())
    }

    pub fn assert_golden_request(&self, fixture: &str) -> Result<()> {
        ensure!(
            self.requests.len() == 1,
            "expected single request but found {}",
            self.requests.len()
        );
        let expected = read_fixture(fixture)?;
        let actual = self.requests.first().context("request missing")?;
        ensure!(
            actual == &expected,
            "request mismatch: expected {expected:?}, got {actual:?}"
        );
        Ok(())
    }

    pub fn assert_no_daemon_requests(&self) -> Result<()> {
        ensure!(
            self.requests.is_empty(),
            "expected no daemon requests but found {:?}",
            self.requests
        );
        Ok(())
    }

    pub fn assert_stdout_is_reply(&self) -> Result<()> {
        let reply = self.reply.as_deref().context("no canned reply configured")?;
        let stdout = self.stdout_text()?;
        ensure!(
            stdout == format!("{reply}\n"),
            "expected raw reply {reply:?}, got {stdout:?}"
        );
        Ok(())
    }
}

// ── Helper functions ───────────────────────────────────────────────────────────

pub(super) fn read_fixture(name: &str) -> Result<String> {
    let normalized = name.trim().trim_matches('"');
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(normalized);
    fs::read_to_string(&path).with_context(|| format!("read fixture at {}", path.display()))
}

pub(super) fn decode_utf8(buffer: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(buffer).with_context(|| format!("{label} utf8"))
}

/// Returns a port that was free a moment ago.
pub(super) fn unused_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe listener")?;
    Ok(listener.local_addr().context("probe address")?.port())
}

pub(super) fn success_reply(command: &str) -> String {
    serde_json::json!({
        "rid": TEST_REQUEST_ID,
        "command": command,
        "result": {"status": {"code": 0}},
    })
    .to_string()
}

pub(super) fn failure_reply(command: &str, code: i32, description: &str) -> String {
    serde_json::json!({
        "rid": TEST_REQUEST_ID,
        "command": command,
        "result": {"status": {"code": code, "description": description}},
    })
    .to_string()
}

// ── Fixtures ───────────────────────────────────────────────────────────────────

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
