//! Structured telemetry initialisation for the console.
//!
//! Logs go to stderr so they never interleave with command results on stdout.
//! The verbosity sits behind a reload layer, which lets `set_log` change it
//! while the console runs.

use std::io::{self, IsTerminal};
use std::sync::{Arc, Mutex, PoisonError};

use blockmgr_config::{Config, LogFormat, LogLevel};
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Registry, fmt, reload};

static TELEMETRY: OnceCell<TelemetryHandle> = OnceCell::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
    /// Failed to swap the active level filter.
    #[error("failed to change log level: {0}")]
    Reload(#[source] reload::Error),
}

/// Runtime control over log verbosity.
pub trait LogControl: Send + Sync {
    /// Level currently in force.
    fn level(&self) -> LogLevel;

    /// Changes the level for every subsequent event.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Reload`] when the filter cannot be replaced.
    fn set_level(&self, level: LogLevel) -> Result<(), TelemetryError>;
}

/// Handle onto the installed subscriber's level filter.
#[derive(Clone)]
pub struct TelemetryHandle {
    filter: reload::Handle<LevelFilter, Registry>,
    level: Arc<Mutex<LogLevel>>,
}

impl LogControl for TelemetryHandle {
    fn level(&self) -> LogLevel {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_level(&self, level: LogLevel) -> Result<(), TelemetryError> {
        self.filter
            .modify(|filter| *filter = level_filter(level))
            .map_err(TelemetryError::Reload)?;
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = level;
        Ok(())
    }
}

/// Maps the console's 0-4 scale onto `tracing` levels.
///
/// `tracing` has no level above `ERROR`, so fatal and error share it.
#[must_use]
pub const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debugging => LevelFilter::DEBUG,
    }
}

/// Installs the global subscriber on first use.
///
/// Later calls return the handle created by the first call; the format and
/// starting level of that first call stay in force.
///
/// # Errors
///
/// Returns [`TelemetryError::Subscriber`] when another global subscriber was
/// installed outside this function.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY
        .get_or_try_init(|| install_subscriber(config))
        .cloned()
}

fn install_subscriber(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let (filter_layer, filter) = reload::Layer::new(level_filter(config.log_level));
    let registry = tracing_subscriber::registry().with(filter_layer);

    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_names(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format {
        LogFormat::Json => Box::new(registry.with(layer.json().flatten_event(true))),
        LogFormat::Compact => Box::new(registry.with(layer.compact())),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;

    Ok(TelemetryHandle {
        filter,
        level: Arc::new(Mutex::new(config.log_level)),
    })
}
