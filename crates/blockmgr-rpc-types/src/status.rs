/// Status reported by the daemon when a request was served.
pub const STATUS_OK: &str = "OK";

/// Status reported by the daemon while it cannot serve requests.
pub const STATUS_BUSY: &str = "BUSY";
