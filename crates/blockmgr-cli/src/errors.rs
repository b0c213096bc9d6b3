//! Error types for the console runtime.

use std::io;

use blockmgr_config::EndpointError;
use thiserror::Error;

use crate::lifecycle::ConnectionInitError;
use crate::telemetry::TelemetryError;

/// Failures that end the console before or after its command loop.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("{0}")]
    Configuration(#[from] EndpointError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to build the daemon client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to initialise the daemon connection: {0}")]
    ConnectionInit(#[from] ConnectionInitError),
    #[error("failed to write console output: {0}")]
    Output(#[from] io::Error),
}
