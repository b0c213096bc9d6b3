//! Startup configuration for the block manager console.
//!
//! The crate owns the pieces of configuration that must be settled before the
//! console talks to the daemon: the daemon endpoint (including the address
//! resolver and the rule that an address and a host/port pair are mutually
//! exclusive), the log verbosity scale used by `set_log`, and the timing
//! defaults for connection initialisation and RPC calls.

mod config;
mod defaults;
mod endpoint;
mod logging;

pub use config::Config;
pub use defaults::{
    DEFAULT_DAEMON_HOST, DEFAULT_INIT_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RPC_PORT, DEFAULT_RPC_TIMEOUT_MS, HTTP_DEFAULT_PORT, default_init_timeout,
    default_log_format, default_poll_interval, default_rpc_timeout,
};
pub use endpoint::{DaemonEndpoint, EndpointError, EndpointOptions, resolve_address};
pub use logging::{LogFormat, LogFormatParseError, LogLevel, LogLevelParseError};
