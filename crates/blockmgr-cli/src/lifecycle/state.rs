use std::fmt;

/// Connection state as observed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No initialisation has been attempted, or the connection was released.
    #[default]
    Disconnected,
    /// Initialisation is in progress.
    Connecting,
    /// The daemon answered and no loss has been reported since.
    Connected,
    /// Initialisation failed or the daemon stopped answering.
    Failed,
}

impl ConnectionState {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
