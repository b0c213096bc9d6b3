use std::time::Duration;

use crate::defaults::{
    DEFAULT_LOG_LEVEL, default_init_timeout, default_log_format, default_poll_interval,
    default_rpc_timeout,
};
use crate::endpoint::DaemonEndpoint;
use crate::logging::{LogFormat, LogLevel};

/// Resolved startup configuration shared by the console and its collaborators.
///
/// Built once at startup from the command line and environment and never
/// mutated afterwards. The runtime log level starts at `log_level` and is
/// changed through the telemetry handle, not through this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Daemon RPC endpoint.
    pub endpoint: DaemonEndpoint,
    /// Initial log verbosity.
    pub log_level: LogLevel,
    /// Log output format.
    pub log_format: LogFormat,
    /// How long startup waits for the connection; `None` waits indefinitely.
    pub init_timeout: Option<Duration>,
    /// Interval between node status polls.
    pub poll_interval: Duration,
    /// Upper bound for a single RPC round trip.
    pub rpc_timeout: Duration,
}

impl Config {
    /// Builds a configuration for `endpoint` with default settings elsewhere.
    #[must_use]
    pub fn for_endpoint(endpoint: DaemonEndpoint) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DaemonEndpoint::default(),
            log_level: DEFAULT_LOG_LEVEL,
            log_format: default_log_format(),
            init_timeout: default_init_timeout(),
            poll_interval: default_poll_interval(),
            rpc_timeout: default_rpc_timeout(),
        }
    }
}
