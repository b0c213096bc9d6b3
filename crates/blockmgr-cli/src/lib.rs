//! Interactive console for managing account blocks on a remote daemon.
//!
//! The crate owns startup option parsing, telemetry, the JSON-RPC transport,
//! the daemon connection lifecycle and the command console. [`run`] wires
//! them together; it takes its streams as parameters so tests can drive a
//! whole session without a terminal.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::{info, warn};

mod cli;
pub mod commands;
pub mod console;
mod errors;
pub mod gateway;
pub mod lifecycle;
mod signals;
pub mod telemetry;
pub mod transport;


use cli::Cli;
use commands::Services;
use console::{ConsoleLoop, Dispatcher, StopHandle};
use errors::AppError;
use gateway::RpcGateway;
use lifecycle::ConnectionManager;
use transport::HttpTransport;

pub(crate) const LIFECYCLE_TARGET: &str = "blockmgr::lifecycle";
pub(crate) const CONSOLE_TARGET: &str = "blockmgr::console";
pub(crate) const RPC_TARGET: &str = "blockmgr::rpc";

const BANNER_RULE: &str =
    "**********************************************************************";

/// Name and version logged at startup.
fn version_banner() -> String {
    format!("blockmgr Block Manager v{}", env!("CARGO_PKG_VERSION"))
}

/// Runs one console session and reports how it ended.
///
/// `input` supplies command lines; `interactive` enables the prompt. Results
/// go to `stdout`, startup failures to `stderr`. Logs are written to the
/// process's stderr by the telemetry layer.
pub fn run<I, R, W, E>(
    args: I,
    input: R,
    stdout: &mut W,
    stderr: &mut E,
    interactive: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read + Send + 'static,
    W: Write,
    E: Write,
{
    match execute(args, input, stdout, interactive) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Nothing else to report to if stderr is gone.
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<I, R, W>(args: I, input: R, stdout: &mut W, interactive: bool) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
    R: Read + Send + 'static,
    W: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error)
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            write!(stdout, "{error}")?;
            return Ok(());
        }
        Err(error) => return Err(AppError::CliUsage(error)),
    };
    let config = cli.config()?;

    let logs = telemetry::initialise(&config)?;
    info!(target: LIFECYCLE_TARGET, event = "startup", "{}", version_banner());

    let transport = HttpTransport::new(config.endpoint.clone(), config.rpc_timeout)?;
    let gateway = RpcGateway::new(Arc::new(transport));
    let connection = Arc::new(ConnectionManager::new(
        config.endpoint.clone(),
        gateway.clone(),
        config.poll_interval,
    ));
    connection.init(config.init_timeout)?;

    writeln!(
        stdout,
        "\n{BANNER_RULE}\nUse \"help\" command to see the list of available commands.\n{BANNER_RULE}"
    )?;
    warn!(
        target: LIFECYCLE_TARGET,
        "do not run push_block against a node with a miner working"
    );

    let stop = StopHandle::new();
    let services = Services {
        gateway,
        connection: Arc::clone(&connection),
        logs: Arc::new(logs),
        stop: stop.clone(),
    };
    let dispatcher = Dispatcher::new(commands::registry(&services));

    if !cli.command.is_empty() {
        dispatcher.dispatch(&cli.command, stdout)?;
    }

    let listener = signals::listen(&stop);
    let result = ConsoleLoop::new(&dispatcher, stop)
        .interactive(interactive)
        .run(input, stdout);
    if let Some(listener) = listener {
        listener.close();
    }
    connection.deinit();
    result.map_err(AppError::from)
}
