//! Built-in command behaviour against a mocked transport.

use blockmgr_config::LogLevel;
use mockall::predicate::function;
use rstest::rstest;
use serde_json::json;

use crate::console::{CommandOutcome, ConsoleState, Dispatch};
use crate::lifecycle::ConnectionState;
use crate::tests::support::{
    ACCOUNT, CommandHarness, HEIGHT, MockTransport, address, unreachable_error,
};
use crate::transport::{RpcCall, RpcRoute, TransportError};

fn silent_harness() -> CommandHarness {
    let mut transport = MockTransport::new();
    transport.expect_invoke().never();
    CommandHarness::connected(transport).expect("harness connects")
}

fn harness_answering(
    route: RpcRoute,
    answer: Result<serde_json::Value, TransportError>,
) -> CommandHarness {
    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .with(function(move |call: &RpcCall| call.route() == route))
        .once()
        .return_once(move |_| answer);
    CommandHarness::connected(transport).expect("harness connects")
}

#[test]
fn help_lists_commands_in_registration_order() {
    let harness = silent_harness();
    let (dispatch, out) = harness.run("help").expect("help runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    let names: Vec<&str> = out
        .lines()
        .skip(1)
        .filter_map(|line| line.strip_prefix("  "))
        .filter_map(|line| line.split_once(" - "))
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        [
            "help",
            "set_log",
            "bc_height",
            "push_block",
            "find",
            "print_hash",
            "exit"
        ]
    );
    assert!(out.starts_with("Commands:\n"));
    assert!(out.contains("usage: push_block <account number> <public address>"));
}

#[rstest]
#[case("help now", "Error: help takes no arguments\n")]
#[case("exit please", "Error: exit takes no arguments\n")]
#[case("bc_height 1", "Error: bc_height takes no arguments\n")]
fn no_argument_commands_reject_arguments(#[case] line: &str, #[case] expected: &str) {
    let harness = silent_harness();
    let (dispatch, out) = harness.run(line).expect("command runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::UserError));
    assert_eq!(out, expected);
    assert_eq!(harness.services.stop.state(), ConsoleState::Idle);
}

#[rstest]
#[case("4", LogLevel::Debugging, "log level set to 4 (debugging)\n")]
#[case("0", LogLevel::Fatal, "log level set to 0 (fatal)\n")]
fn set_log_changes_the_level(
    #[case] argument: &str,
    #[case] level: LogLevel,
    #[case] expected: &str,
) {
    let harness = silent_harness();
    let (dispatch, out) = harness
        .run(&format!("set_log {argument}"))
        .expect("set_log runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    assert_eq!(out, expected);
    assert_eq!(harness.logs.changes(), [level]);
}

#[rstest]
#[case("set_log", "Error: use: set_log <log_level_number_0-4>\n")]
#[case("set_log 1 2", "Error: use: set_log <log_level_number_0-4>\n")]
#[case(
    "set_log loud",
    "Error: wrong number format, use: set_log <log_level_number_0-4>\n"
)]
#[case(
    "set_log -1",
    "Error: wrong number format, use: set_log <log_level_number_0-4>\n"
)]
#[case(
    "set_log 5",
    "Error: wrong number range, use: set_log <log_level_number_0-4>\n"
)]
fn set_log_rejections_leave_the_level_alone(#[case] line: &str, #[case] expected: &str) {
    let harness = silent_harness();
    let (dispatch, out) = harness.run(line).expect("set_log runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::UserError));
    assert_eq!(out, expected);
    assert!(harness.logs.changes().is_empty());
}

#[test]
fn bc_height_follows_connection_status() {
    let harness = silent_harness();
    let connection = &harness.services.connection;

    assert_eq!(
        harness.run("bc_height").expect("bc_height runs").1,
        format!("{HEIGHT}\n")
    );

    connection.connection_status_updated(false);
    let (dispatch, out) = harness.run("bc_height").expect("bc_height runs");
    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Fatal));
    assert_eq!(
        out,
        "Error: failed to connect to daemon (http://127.0.0.1:9971).\n"
    );

    connection.connection_status_updated(true);
    assert_eq!(connection.state(), ConnectionState::Connected);
    assert_eq!(
        harness.run("bc_height").expect("bc_height runs").1,
        format!("{HEIGHT}\n")
    );
}

#[rstest]
#[case::short_account(
    "012345678",
    address(),
    "Error: invalid account number: expected 10 characters, got 9\n"
)]
#[case::long_account(
    "01234567890",
    address(),
    "Error: invalid account number: expected 10 characters, got 11\n"
)]
#[case::short_address(
    ACCOUNT,
    "B".repeat(94),
    "Error: invalid public address: expected 95 characters, got 94\n"
)]
#[case::long_address(
    ACCOUNT,
    "B".repeat(96),
    "Error: invalid public address: expected 95 characters, got 96\n"
)]
fn push_block_validates_lengths_before_calling(
    #[case] account: &str,
    #[case] public_address: String,
    #[case] expected: &str,
) {
    let harness = silent_harness();
    let (dispatch, out) = harness
        .run(&format!("push_block {account} {public_address}"))
        .expect("push_block runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::UserError));
    assert_eq!(out, expected);
}

#[rstest]
#[case("push_block", "Error: expected: push_block <account number> <public address>\n")]
#[case(
    "push_block 0123456789",
    "Error: expected: push_block <account number> <public address>\n"
)]
#[case("find", "Error: expected: find <account number>\n")]
#[case("print_hash a b", "Error: expected: print_hash <account number>\n")]
#[case(
    "find 123",
    "Error: invalid account number: expected 10 characters, got 3\n"
)]
fn account_commands_check_arity(#[case] line: &str, #[case] expected: &str) {
    let harness = silent_harness();
    let (dispatch, out) = harness.run(line).expect("command runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::UserError));
    assert_eq!(out, expected);
}

#[test]
fn push_block_sends_account_and_address() {
    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .with(function(|call: &RpcCall| {
            call.route() == RpcRoute::JsonRpc { method: "pushblock" }
                && call.params()
                    == &json!({ "AccountNumber": ACCOUNT, "AccountAddress": address() })
        }))
        .once()
        .returning(|_| Ok(json!({ "status": "OK" })));
    let harness = CommandHarness::connected(transport).expect("harness connects");

    let (dispatch, out) = harness
        .run(&format!("push_block {ACCOUNT} {}", address()))
        .expect("push_block runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    assert_eq!(out, "block pushed for account 0123456789\n");
}

#[rstest]
#[case("BUSY", "daemon is busy. Please try later\n")]
#[case("ACCOUNT_EXISTS", "ACCOUNT_EXISTS\n")]
fn push_block_reports_non_ok_status(#[case] status: &'static str, #[case] expected: &str) {
    let harness = harness_answering(
        RpcRoute::JsonRpc { method: "pushblock" },
        Ok(json!({ "status": status })),
    );
    let (dispatch, out) = harness
        .run(&format!("push_block {ACCOUNT} {}", address()))
        .expect("push_block runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Fatal));
    assert_eq!(out, expected);
}

#[test]
fn find_prints_address_and_hash() {
    let harness = harness_answering(
        RpcRoute::Endpoint {
            path: "/getblockaddress",
        },
        Ok(json!({ "AccountAddress": address(), "hash": "beef", "status": "OK" })),
    );
    let (dispatch, out) = harness.run("find 0123456789").expect("find runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    assert_eq!(
        out,
        format!(
            "account 0123456789 is associated with\naddress: {}\nhash: beef\n",
            address()
        )
    );
}

#[test]
fn find_reports_unreachable_daemon_generically() {
    let harness = harness_answering(
        RpcRoute::Endpoint {
            path: "/getblockaddress",
        },
        Err(unreachable_error()),
    );
    let (dispatch, out) = harness.run("find 0123456789").expect("find runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Fatal));
    assert_eq!(
        out,
        "Error: failed to connect to daemon (http://127.0.0.1:9971).\n"
    );
}

#[test]
fn print_hash_prints_status_and_hash() {
    let harness = harness_answering(
        RpcRoute::Endpoint {
            path: "/getblockhash",
        },
        Ok(json!({ "hash": "ff00", "Status": "OK" })),
    );
    let (dispatch, out) = harness.run("print_hash 0123456789").expect("print_hash runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    assert_eq!(
        out,
        "status: OK\naccount 0123456789 is associated with the hash: ff00\n"
    );
}

#[test]
fn print_hash_reports_remote_errors() {
    let harness = harness_answering(
        RpcRoute::Endpoint {
            path: "/getblockhash",
        },
        Err(TransportError::HttpStatus {
            call: String::from("/getblockhash"),
            status: 500,
        }),
    );
    let (dispatch, out) = harness.run("print_hash 0123456789").expect("print_hash runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Fatal));
    assert_eq!(
        out,
        "Error: Failed to invoke rpc method: daemon answered /getblockhash with HTTP status 500\n"
    );
}

#[rstest]
#[case("find 0123456789")]
#[case("print_hash 0123456789")]
fn lost_connection_fails_fast(#[case] line: &str) {
    let harness = silent_harness();
    harness.services.connection.connection_status_updated(false);

    let (dispatch, out) = harness.run(line).expect("command runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Fatal));
    assert_eq!(
        out,
        "Error: failed to connect to daemon (http://127.0.0.1:9971).\n"
    );
}

#[test]
fn exit_requests_stop() {
    let harness = silent_harness();
    let (dispatch, out) = harness.run("exit").expect("exit runs");

    assert_eq!(dispatch, Dispatch::Handled(CommandOutcome::Success));
    assert!(out.is_empty());
    assert!(harness.services.stop.is_stop_requested());
}
