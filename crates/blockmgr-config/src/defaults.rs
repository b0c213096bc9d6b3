use std::time::Duration;

use crate::logging::{LogFormat, LogLevel};

/// Host used when neither an address nor a host is configured.
pub const DEFAULT_DAEMON_HOST: &str = "localhost";

/// Well-known RPC port of the daemon.
pub const DEFAULT_RPC_PORT: u16 = 9971;

/// Port assumed when an explicit address carries no port of its own.
pub const HTTP_DEFAULT_PORT: u16 = 80;

/// Log verbosity used when none is configured.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// Seconds to wait for the daemon connection to initialise.
pub const DEFAULT_INIT_TIMEOUT_SECS: u64 = 30;

/// Milliseconds between node status polls once connected.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Milliseconds allowed for a single RPC round trip.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

/// Default logging format for the console.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default init timeout; `None` would wait indefinitely.
#[must_use]
pub const fn default_init_timeout() -> Option<Duration> {
    Some(Duration::from_secs(DEFAULT_INIT_TIMEOUT_SECS))
}

/// Default interval between node status polls.
#[must_use]
pub const fn default_poll_interval() -> Duration {
    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
}

/// Default per-call RPC timeout.
#[must_use]
pub const fn default_rpc_timeout() -> Duration {
    Duration::from_millis(DEFAULT_RPC_TIMEOUT_MS)
}
