//! Error types for the daemon connection lifecycle.

use std::io;
use std::time::Duration;

use blockmgr_config::DaemonEndpoint;
use thiserror::Error;

use super::ConnectionState;
use crate::transport::TransportError;

/// Failures that abort startup before the console runs.
#[derive(Debug, Error)]
pub enum ConnectionInitError {
    /// The node proxy's first call to the daemon failed.
    #[error("failed to init node proxy: {0}")]
    Probe(#[source] TransportError),
    /// No outcome arrived within the configured timeout.
    #[error("timed out after {} s waiting for the daemon connection", timeout.as_secs())]
    TimedOut {
        /// Configured wait.
        timeout: Duration,
    },
    /// The node proxy stopped without reporting an outcome.
    #[error("node proxy stopped before reporting the connection outcome")]
    Abandoned,
    /// The node proxy worker could not be started.
    #[error("failed to start the node proxy worker: {0}")]
    Spawn(#[source] io::Error),
    /// `init` was called while a connection is already held.
    #[error("the daemon connection is already {state}")]
    AlreadyInitialised {
        /// State at the time of the call.
        state: ConnectionState,
    },
}

/// Raised when a command needs the daemon but the connection is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to connect to daemon ({endpoint}).")]
pub struct ConnectivityError {
    /// Endpoint the console is configured for.
    pub endpoint: DaemonEndpoint,
    /// Connection state when the command ran.
    pub state: ConnectionState,
}
