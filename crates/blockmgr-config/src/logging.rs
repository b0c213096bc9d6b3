use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable single line output.
    #[default]
    Compact,
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Operator-facing log verbosity, numbered `0` (quietest) to `4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum LogLevel {
    /// Only unrecoverable failures.
    Fatal,
    /// Errors.
    Error,
    /// Warnings and errors.
    Warning,
    /// Informational messages.
    Info,
    /// Debugging detail.
    Debugging,
}

impl LogLevel {
    /// Highest accepted numeric level.
    pub const MAX: u16 = 4;

    /// Every level in ascending verbosity.
    pub const ALL: [Self; 5] = [
        Self::Fatal,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Debugging,
    ];

    /// Numeric form used on the command line and by `set_log`.
    #[must_use]
    pub const fn as_number(self) -> u16 {
        match self {
            Self::Fatal => 0,
            Self::Error => 1,
            Self::Warning => 2,
            Self::Info => 3,
            Self::Debugging => 4,
        }
    }

    /// Lowercase name of the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debugging => "debugging",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl TryFrom<u16> for LogLevel {
    type Error = LogLevelParseError;

    fn try_from(value: u16) -> Result<Self, LogLevelParseError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(LogLevelParseError::OutOfRange(value))
    }
}

impl From<LogLevel> for u16 {
    fn from(level: LogLevel) -> Self {
        level.as_number()
    }
}

impl FromStr for LogLevel {
    type Err = LogLevelParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value = input
            .trim()
            .parse::<u16>()
            .map_err(|_| LogLevelParseError::NotANumber(input.to_owned()))?;
        Self::try_from(value)
    }
}

/// Errors encountered while parsing a [`LogLevel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogLevelParseError {
    /// The text is not an unsigned number.
    #[error("wrong number format '{0}', expected a log level number 0-4")]
    NotANumber(String),
    /// The number is above [`LogLevel::MAX`].
    #[error("wrong number range {0}, expected a log level number 0-4")]
    OutOfRange(u16),
}
