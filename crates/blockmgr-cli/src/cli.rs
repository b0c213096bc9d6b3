//! Startup options for the block manager console.

use std::time::Duration;

use blockmgr_config::{
    Config, DEFAULT_INIT_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RPC_TIMEOUT_MS, EndpointError, EndpointOptions, LogFormat, LogLevel,
    default_log_format,
};
use clap::Parser;

/// Command-line interface of the block manager console.
///
/// Every option can also be supplied through its `BLOCKMGR_*` environment
/// variable; the command line wins when both are present.
#[derive(Parser, Debug)]
#[command(
    name = "blockmgr",
    version,
    about = "Interactive console for managing account blocks on a remote daemon"
)]
pub(crate) struct Cli {
    /// Use the daemon at <host>:<port>; excludes --daemon-host and --daemon-port.
    #[arg(long, env = "BLOCKMGR_DAEMON_ADDRESS", value_name = "URL")]
    pub(crate) daemon_address: Option<String>,
    /// Use the daemon on this host instead of localhost.
    #[arg(long, env = "BLOCKMGR_DAEMON_HOST", value_name = "HOST")]
    pub(crate) daemon_host: Option<String>,
    /// Use the daemon on this port instead of 9971.
    #[arg(long, env = "BLOCKMGR_DAEMON_PORT", value_name = "PORT")]
    pub(crate) daemon_port: Option<u16>,
    /// Initial log level, a number 0-4.
    #[arg(long, env = "BLOCKMGR_LOG_LEVEL", value_name = "LEVEL")]
    pub(crate) log_level: Option<LogLevel>,
    /// Log output format.
    #[arg(
        long,
        env = "BLOCKMGR_LOG_FORMAT",
        value_name = "FORMAT",
        default_value_t = default_log_format()
    )]
    pub(crate) log_format: LogFormat,
    /// Seconds to wait for the daemon connection at startup; 0 waits forever.
    #[arg(
        long,
        env = "BLOCKMGR_INIT_TIMEOUT_SECS",
        value_name = "SECONDS",
        default_value_t = DEFAULT_INIT_TIMEOUT_SECS
    )]
    pub(crate) init_timeout_secs: u64,
    /// Milliseconds between daemon status polls.
    #[arg(
        long,
        env = "BLOCKMGR_POLL_INTERVAL_MS",
        value_name = "MILLIS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) poll_interval_ms: u64,
    /// Milliseconds allowed for a single daemon call.
    #[arg(
        long,
        env = "BLOCKMGR_RPC_TIMEOUT_MS",
        value_name = "MILLIS",
        default_value_t = DEFAULT_RPC_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) rpc_timeout_ms: u64,
    /// A console command to run once before the interactive session.
    #[arg(
        value_name = "COMMAND",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) command: Vec<String>,
}

impl Cli {
    /// Resolves the options into the startup configuration.
    pub(crate) fn config(&self) -> Result<Config, EndpointError> {
        let endpoint = EndpointOptions {
            address: self.daemon_address.clone(),
            host: self.daemon_host.clone(),
            port: self.daemon_port,
        }
        .resolve()?;

        Ok(Config {
            endpoint,
            log_level: self.log_level.unwrap_or(DEFAULT_LOG_LEVEL),
            log_format: self.log_format,
            init_timeout: (self.init_timeout_secs > 0)
                .then(|| Duration::from_secs(self.init_timeout_secs)),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            rpc_timeout: Duration::from_millis(self.rpc_timeout_ms),
        })
    }
}
