use super::support::{
    FakeDaemon, StaticConfigLoader, TEST_REQUEST_ID, read_fixture, success_reply, unused_port,
};

use std::ffi::OsString;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use pos_config::{Config, SocketEndpoint};
use pos_messages::{Command, CreateVolumeParam, Request};
use rstest::rstest;

use crate::{IoStreams, run_with_request_id};

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_cli(config: Config, args: &[&str]) -> Outcome {
    let mut stdout: Vec<u8> = Vec::new();
    let mut stderr: Vec<u8> = Vec::new();
    let loader = StaticConfigLoader::new(config);
    let arguments: Vec<OsString> = std::iter::once("poseidonos-cli")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect();
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with_request_id(arguments, &mut io, &loader, TEST_REQUEST_ID)
    };
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

fn unreachable_config() -> Config {
    Config {
        daemon_socket: SocketEndpoint::tcp("127.0.0.1", unused_port().expect("free port")),
        ..Config::default()
    }
}

#[test]
fn serialises_create_request_matches_golden() {
    let request = Request::new(
        TEST_REQUEST_ID,
        Command::CreateVolume(CreateVolumeParam {
            volume_name: String::from("Volume0"),
            size: 1024,
            max_iops: 1000,
            max_bandwidth: 100,
            array_name: String::from("array0"),
        }),
    );
    let actual = format!("{}\n", request.to_json().expect("serialises request"));
    let expected = read_fixture("request_create_volume.jsonl").expect("fixture");
    assert_eq!(actual, expected);
}

#[rstest]
#[case(&["--help"])]
#[case(&["volume", "create", "--help"])]
#[case(&["--version"])]
fn help_and_version_go_to_stdout(#[case] args: &[&str]) {
    let outcome = run_cli(unreachable_config(), args);
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("poseidonos-cli"), "{}", outcome.stdout);
    assert!(outcome.stderr.is_empty());
}

#[rstest]
#[case(&[])]
#[case(&["volume", "create", "--volume-name", "Volume0", "--array-name", "array0"])]
#[case(&["volume", "mount", "--volume-name", "Volume0"])]
#[case(&["array", "list"])]
fn usage_errors_fail_without_contacting_daemon(#[case] args: &[&str]) {
    let outcome = run_cli(unreachable_config(), args);
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.is_empty());
    assert!(
        !outcome.stderr.contains("failed to connect"),
        "{}",
        outcome.stderr
    );
}

#[test]
fn connection_failure_names_endpoint() {
    let config = unreachable_config();
    let endpoint = config.daemon_socket().to_string();
    let outcome = run_cli(config, &["system", "info"]);
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(
        outcome
            .stderr
            .contains(&format!("failed to connect to daemon at {endpoint}")),
        "{}",
        outcome.stderr
    );
}

#[test]
fn list_volume_renders_table() {
    let reply = serde_json::json!({
        "rid": TEST_REQUEST_ID,
        "command": "LISTVOLUME",
        "result": {
            "status": {"code": 0},
            "data": {"volumes": [
                {"name": "Volume0", "id": 0, "total": 1024, "remain": 1024,
                 "status": "Unmounted", "maxiops": 0, "maxbw": 0}
            ]}
        }
    })
    .to_string();
    let mut daemon = FakeDaemon::spawn(reply).expect("spawn daemon");
    let config = Config {
        daemon_socket: SocketEndpoint::tcp("127.0.0.1", daemon.port()),
        ..Config::default()
    };

    let outcome = run_cli(config, &["volume", "list", "-a", "array0"]);
    let requests = daemon.take_requests().expect("requests");

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(
        requests,
        vec![String::from(
            "{\"rid\":\"test-rid\",\"command\":\"LISTVOLUME\",\"param\":{\"array\":\"array0\"}}\n"
        )]
    );
    let mut lines = outcome.stdout.lines();
    assert_eq!(
        lines.next(),
        Some("Name     ID  Total  Remaining  Status     MaxIOPS  MaxBW")
    );
    assert_eq!(
        lines.next(),
        Some("Volume0  0   1024   1024       Unmounted  0        0")
    );
}

#[test]
fn version_prints_version_string() {
    let reply = serde_json::json!({
        "rid": TEST_REQUEST_ID,
        "command": "GETVERSION",
        "result": {"status": {"code": 0}, "data": {"version": "pos-0.9.10"}}
    })
    .to_string();
    let mut daemon = FakeDaemon::spawn(reply).expect("spawn daemon");
    let config = Config {
        daemon_socket: SocketEndpoint::tcp("127.0.0.1", daemon.port()),
        ..Config::default()
    };

    let outcome = run_cli(config, &["system", "version"]);
    daemon.take_requests().expect("requests");

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(outcome.stdout, "pos-0.9.10\n");
}

#[test]
fn short_request_timeout_still_allows_prompt_reply() {
    let mut daemon = FakeDaemon::spawn(success_reply("EXITIBOFOS")).expect("spawn daemon");
    let config = Config {
        daemon_socket: SocketEndpoint::tcp("127.0.0.1", daemon.port()),
        request_timeout_ms: 2_000,
        ..Config::default()
    };
    let outcome = run_cli(config, &["system", "stop"]);
    daemon.take_requests().expect("requests");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

#[cfg(unix)]
#[test]
fn successful_start_prints_synthesised_reply_in_json_mode() {
    let config = Config {
        start_script: Some(Utf8PathBuf::from("/bin/true")),
        ..unreachable_config()
    };
    let outcome = run_cli(config, &["--json", "system", "start"]);
    assert_eq!(outcome.exit, ExitCode::SUCCESS);

    let reply: serde_json::Value =
        serde_json::from_str(outcome.stdout.trim_end()).expect("stdout is json");
    assert_eq!(reply["rid"], TEST_REQUEST_ID);
    assert_eq!(reply["command"], "RUNIBOFOS");
    assert_eq!(reply["result"]["status"]["code"], 0);
    assert!(reply["lastSuccessTime"].is_i64());
}

#[cfg(unix)]
#[test]
fn debug_start_traces_request_and_synthesised_reply() {
    let config = Config {
        start_script: Some(Utf8PathBuf::from("/bin/false")),
        ..unreachable_config()
    };
    let outcome = run_cli(config, &["--debug", "system", "start"]);
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(
        outcome
            .stderr
            .contains("Request to PoseidonOS:\n{\"rid\":\"test-rid\",\"command\":\"RUNIBOFOS\"}"),
        "{}",
        outcome.stderr
    );
    assert!(
        outcome.stderr.contains("\"code\":11000"),
        "{}",
        outcome.stderr
    );
    assert!(outcome.stdout.starts_with("start system failed with code 11000"));
}
