//! Test support utilities for console coverage.
//!
//! Supplies a fake daemon, a transport mock, a command harness wired to a
//! connected [`ConnectionManager`], and the behavioural test world.


use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Cursor;
use std::net::TcpListener;
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use blockmgr_config::{DaemonEndpoint, LogLevel};
use mockall::mock;
use rstest::fixture;
use serde_json::{Value, json};

use crate::commands::{self, Services};
use crate::console::{Dispatch, Dispatcher, StopHandle, tokenize};
use crate::gateway::RpcGateway;
use crate::lifecycle::ConnectionManager;
use crate::telemetry::{LogControl, TelemetryError};
use crate::transport::{RpcCall, RpcTransport, TransportError};

pub(super) use fake_daemon::{FakeDaemon, RecordedRequest};

/// A valid ten-character account number.
pub(super) const ACCOUNT: &str = "0123456789";

/// A valid ninety-five-character public address.
pub(super) fn address() -> String {
    "B".repeat(95)
}

/// Chain height reported by every healthy daemon in these tests.
pub(super) const HEIGHT: u64 = 1204;

const PROBE_METHOD: &str = "getlastblockheader";

mock! {
    pub(crate) Transport {}
    impl RpcTransport for Transport {
        fn invoke(&self, call: &RpcCall) -> Result<Value, TransportError>;
    }
}

/// The `result` a healthy daemon returns for `getlastblockheader`.
pub(super) fn header_result(height: u64) -> Value {
    json!({
        "block_header": { "height": height, "hash": "", "timestamp": 0 },
        "status": "OK",
    })
}

/// Error returned by a transport whose daemon has gone away.
pub(super) fn unreachable_error() -> TransportError {
    TransportError::Unreachable {
        endpoint: String::from("http://127.0.0.1:9971"),
        message: String::from("connection refused"),
    }
}

/// Answers node proxy probes itself and forwards command calls to `inner`.
///
/// Keeps the background poller out of mock expectations, so a mock only
/// sees what the command under test sends.
struct ProbedTransport {
    inner: Arc<dyn RpcTransport>,
}

impl RpcTransport for ProbedTransport {
    fn invoke(&self, call: &RpcCall) -> Result<Value, TransportError> {
        if call.label() == PROBE_METHOD {
            return Ok(header_result(HEIGHT));
        }
        self.inner.invoke(call)
    }
}

/// [`LogControl`] that records every level it is given.
#[derive(Clone)]
pub(super) struct RecordingLogs {
    levels: Arc<Mutex<Vec<LogLevel>>>,
}

impl RecordingLogs {
    fn new() -> Self {
        Self {
            levels: Arc::new(Mutex::new(vec![LogLevel::Info])),
        }
    }

    /// Levels set after the initial one.
    pub(super) fn changes(&self) -> Vec<LogLevel> {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .skip(1)
            .copied()
            .collect()
    }
}

impl LogControl for RecordingLogs {
    fn level(&self) -> LogLevel {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or(LogLevel::Info)
    }

    fn set_level(&self, level: LogLevel) -> Result<(), TelemetryError> {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(level);
        Ok(())
    }
}

/// The built-in commands wired to a connected manager.
pub(super) struct CommandHarness {
    pub services: Services,
    pub logs: RecordingLogs,
    dispatcher: Dispatcher,
}

impl CommandHarness {
    /// Connects through `transport` and registers every command.
    pub(super) fn connected(transport: MockTransport) -> Result<Self> {
        let probed = ProbedTransport {
            inner: Arc::new(transport),
        };
        let gateway = RpcGateway::new(Arc::new(probed));
        let connection = Arc::new(ConnectionManager::new(
            DaemonEndpoint::new("127.0.0.1", 9971),
            gateway.clone(),
            Duration::from_secs(60),
        ));
        connection
            .init(Some(Duration::from_secs(5)))
            .context("connect test manager")?;

        let logs = RecordingLogs::new();
        let services = Services {
            gateway,
            connection,
            logs: Arc::new(logs.clone()),
            stop: StopHandle::new(),
        };
        let dispatcher = Dispatcher::new(commands::registry(&services));
        Ok(Self {
            services,
            logs,
            dispatcher,
        })
    }

    /// Dispatches `line` and returns the outcome with everything written.
    pub(super) fn run(&self, line: &str) -> Result<(Dispatch, String)> {
        let mut out = Vec::new();
        let dispatch = self
            .dispatcher
            .dispatch(&tokenize(line), &mut out)
            .context("dispatch command")?;
        Ok((dispatch, String::from_utf8(out).context("utf8 output")?))
    }
}

/// Test world for console behaviour scenarios.
#[derive(Default)]
pub(super) struct TestWorld {
    routes: HashMap<String, Value>,
    daemon: Option<FakeDaemon>,
    port: Option<u16>,
    args: Vec<String>,
    input: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
}

impl TestWorld {
    /// Adds a canned answer for a JSON-RPC method or a plain path.
    pub(super) fn answer(&mut self, route: &str, payload: Value) {
        self.routes.insert(route.to_owned(), payload);
    }

    /// Starts a daemon reporting `height` plus every configured answer.
    pub(super) fn start_daemon(&mut self, height: u64) -> Result<()> {
        self.answer(PROBE_METHOD, header_result(height));
        let daemon = FakeDaemon::spawn(self.routes.clone())?;
        self.port = Some(daemon.port());
        self.daemon = Some(daemon);
        Ok(())
    }

    /// Points the console at a port nothing listens on.
    pub(super) fn use_closed_port(&mut self) -> Result<()> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe port")?;
        self.port = Some(listener.local_addr().context("local addr")?.port());
        Ok(())
    }

    /// Appends startup arguments.
    pub(super) fn add_args(&mut self, args: &str) {
        self.args.extend(args.split_whitespace().map(str::to_owned));
    }

    /// Queues a line of operator input.
    pub(super) fn enter(&mut self, line: &str) {
        self.input.push_str(line);
        self.input.push('\n');
    }

    /// Runs one console session against the configured daemon.
    pub(super) fn run(&mut self) -> Result<()> {
        let port = self
            .port
            .context("no daemon port configured")?
            .to_string();
        let mut args: Vec<OsString> = [
            "blockmgr",
            "--daemon-port",
            port.as_str(),
            "--init-timeout-secs",
            "5",
            "--poll-interval-ms",
            "60000",
            "--rpc-timeout-ms",
            "2000",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.extend(self.args.iter().map(OsString::from));

        self.stdout.clear();
        self.stderr.clear();
        let input = Cursor::new(self.input.clone().into_bytes());
        let exit = crate::run(args, input, &mut self.stdout, &mut self.stderr, false);
        self.exit_code = Some(exit);
        Ok(())
    }

    pub(super) fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub(super) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Requests the daemon received, excluding connection probes.
    pub(super) fn daemon_requests(&self) -> Vec<RecordedRequest> {
        self.daemon
            .as_ref()
            .map(FakeDaemon::requests)
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.route != PROBE_METHOD)
            .collect()
    }

    /// Routes the daemon received, excluding connection probes.
    pub(super) fn daemon_calls(&self) -> Vec<String> {
        self.daemon
            .as_ref()
            .map(FakeDaemon::routes)
            .unwrap_or_default()
            .into_iter()
            .filter(|route| route != PROBE_METHOD)
            .collect()
    }

    pub(super) fn assert_exit_code(&self, expected: ExitCode) -> Result<()> {
        ensure!(
            self.exit_code == Some(expected),
            "expected exit {expected:?}, got {:?}\nstdout: {}\nstderr: {}",
            self.exit_code,
            self.stdout_text(),
            self.stderr_text()
        );
        Ok(())
    }
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
