//! Whole console sessions driven through [`crate::run`].

use std::io::Cursor;
use std::process::ExitCode;

use rstest::rstest;
use serde_json::json;

use crate::tests::support::{ACCOUNT, TestWorld, address};

fn run_args(args: &[&str]) -> (ExitCode, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = crate::run(
        std::iter::once("blockmgr")
            .chain(args.iter().copied())
            .map(Into::into),
        Cursor::new(Vec::new()),
        &mut stdout,
        &mut stderr,
        false,
    );
    (
        exit,
        String::from_utf8(stdout).expect("stdout utf8"),
        String::from_utf8(stderr).expect("stderr utf8"),
    )
}

#[rstest]
#[case(&["--daemon-address", "node:9971", "--daemon-host", "other"])]
#[case(&["--daemon-address", "node:9971", "--daemon-port", "1"])]
fn conflicting_endpoint_options_fail(#[case] args: &[&str]) {
    let (exit, stdout, stderr) = run_args(args);

    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert_eq!(stderr, "you can't specify daemon host or port several times\n");
}

#[test]
fn malformed_port_fails_before_connecting() {
    let (exit, _, stderr) = run_args(&["--daemon-address", "node:abc"]);

    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stderr.contains("invalid port 'abc'"), "stderr: {stderr}");
}

#[rstest]
#[case("--help", "Usage: blockmgr")]
#[case("--version", "blockmgr ")]
fn help_and_version_go_to_stdout(#[case] flag: &str, #[case] expected: &str) {
    let (exit, stdout, stderr) = run_args(&[flag]);

    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.contains(expected), "stdout: {stdout}");
    assert!(stderr.is_empty());
}

#[test]
fn unknown_option_is_a_usage_error() {
    let (exit, _, stderr) = run_args(&["--frobnicate"]);

    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stderr.contains("--frobnicate"), "stderr: {stderr}");
}

#[test]
fn unreachable_daemon_fails_startup() {
    let mut world = TestWorld::default();
    world.use_closed_port().expect("closed port");
    world.enter("help");
    world.run().expect("session runs");

    world.assert_exit_code(ExitCode::FAILURE).expect("exit code");
    assert!(
        world.stderr_text().contains("failed to init node proxy"),
        "stderr: {}",
        world.stderr_text()
    );
    assert!(!world.stdout_text().contains("Commands:"));
}

#[test]
fn session_prints_banner_and_runs_commands_until_exit() {
    let mut world = TestWorld::default();
    world.start_daemon(77).expect("daemon starts");
    world.enter("help");
    world.enter("bc_height");
    world.enter("exit");
    world.enter("bc_height");
    world.run().expect("session runs");

    world.assert_exit_code(ExitCode::SUCCESS).expect("exit code");
    let stdout = world.stdout_text();
    assert!(stdout.contains("Use \"help\" command to see the list of available commands."));
    assert!(stdout.contains("Commands:\n  help - Show this help\n"));
    assert_eq!(stdout.matches("77\n").count(), 1, "stdout: {stdout}");
}

#[test]
fn startup_command_runs_before_input() {
    let mut world = TestWorld::default();
    world.answer(
        "/getblockhash",
        json!({ "hash": "ff00", "Status": "OK" }),
    );
    world.answer("pushblock", json!({ "status": "OK" }));
    world.start_daemon(1).expect("daemon starts");
    world.add_args(&format!("print_hash {ACCOUNT}"));
    world.enter(&format!("push_block {ACCOUNT} {}", address()));
    world.run().expect("session runs");

    world.assert_exit_code(ExitCode::SUCCESS).expect("exit code");
    assert_eq!(world.daemon_calls(), ["/getblockhash", "pushblock"]);
    let bodies: Vec<_> = world
        .daemon_requests()
        .into_iter()
        .map(|request| request.body)
        .collect();
    assert_eq!(
        bodies,
        [
            json!({ "AccountNumber": ACCOUNT }),
            json!({
                "jsonrpc": "2.0",
                "id": "0",
                "method": "pushblock",
                "params": { "AccountNumber": ACCOUNT, "AccountAddress": address() },
            }),
        ]
    );
    assert!(
        world
            .stdout_text()
            .contains("account 0123456789 is associated with the hash: ff00\n")
    );
}

#[test]
fn failing_startup_command_does_not_change_exit_code() {
    let mut world = TestWorld::default();
    world.start_daemon(1).expect("daemon starts");
    world.add_args("find 123");
    world.run().expect("session runs");

    world.assert_exit_code(ExitCode::SUCCESS).expect("exit code");
    assert!(world.daemon_calls().is_empty());
    assert!(
        world
            .stdout_text()
            .contains("Error: invalid account number: expected 10 characters, got 3\n")
    );
}

#[test]
fn version_banner_names_the_package_version() {
    let banner = crate::version_banner();
    assert_eq!(
        banner,
        format!("blockmgr Block Manager v{}", env!("CARGO_PKG_VERSION"))
    );

    let (_, stdout, _) = run_args(&["--version"]);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout: {stdout}");
}
