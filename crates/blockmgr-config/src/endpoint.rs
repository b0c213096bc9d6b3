use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::{DEFAULT_DAEMON_HOST, DEFAULT_RPC_PORT, HTTP_DEFAULT_PORT};

const SCHEME_SEPARATOR: &str = "://";

/// Resolved location of the daemon's RPC interface.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DaemonEndpoint {
    host: String,
    port: u16,
}

impl DaemonEndpoint {
    /// Builds an endpoint from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or address of the daemon.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// RPC port of the daemon.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Base URL used for every RPC request.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.to_string()
    }
}

impl Default for DaemonEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_DAEMON_HOST, DEFAULT_RPC_PORT)
    }
}

impl fmt::Display for DaemonEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "http://{}:{}", self.host, self.port)
    }
}

/// Parses a human-supplied daemon address into an endpoint.
///
/// An empty `raw` value means no address was given, so the fallbacks win. An
/// optional `scheme://` prefix is stripped. The first colon after the scheme
/// starts the port, which runs until the next `/` or the end of the string.
/// Without a colon the host runs until the first `/` and the port is the
/// plain HTTP port (80), not `fallback_port`.
///
/// # Errors
///
/// Returns [`EndpointError::MissingHost`] when nothing remains of the host
/// after stripping, and [`EndpointError::InvalidPort`] when the port text is
/// not a valid `u16`.
pub fn resolve_address(
    raw: &str,
    fallback_host: &str,
    fallback_port: u16,
) -> Result<DaemonEndpoint, EndpointError> {
    if raw.is_empty() {
        return Ok(DaemonEndpoint::new(fallback_host, fallback_port));
    }

    let authority = raw
        .split_once(SCHEME_SEPARATOR)
        .map_or(raw, |(_, rest)| rest);

    let (host, port) = match authority.split_once(':') {
        Some((host, tail)) => {
            let port_text = tail.split_once('/').map_or(tail, |(port, _)| port);
            let port = port_text
                .parse::<u16>()
                .map_err(|source| EndpointError::InvalidPort {
                    address: raw.to_owned(),
                    port: port_text.to_owned(),
                    source,
                })?;
            (host, port)
        }
        None => {
            let host = authority.split_once('/').map_or(authority, |(host, _)| host);
            (host, HTTP_DEFAULT_PORT)
        }
    };

    if host.is_empty() {
        return Err(EndpointError::MissingHost {
            address: raw.to_owned(),
        });
    }

    Ok(DaemonEndpoint::new(host, port))
}

/// The three startup options that can describe the daemon location.
///
/// Either `address` is used on its own, or `host` and `port` are used
/// together with defaults filling the gaps. Empty strings and a zero port
/// count as "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOptions {
    /// Combined `host:port` address, optionally with a scheme and path.
    pub address: Option<String>,
    /// Daemon host name.
    pub host: Option<String>,
    /// Daemon RPC port.
    pub port: Option<u16>,
}

impl EndpointOptions {
    /// Reconciles the options into a single endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Conflict`] when an address is combined with a
    /// host or port, or any error raised by [`resolve_address`].
    pub fn resolve(&self) -> Result<DaemonEndpoint, EndpointError> {
        let address = self.address.as_deref().filter(|value| !value.is_empty());
        let host = self.host.as_deref().filter(|value| !value.is_empty());
        let port = self.port.filter(|value| *value != 0);

        match address {
            Some(_) if host.is_some() || port.is_some() => Err(EndpointError::Conflict),
            Some(address) => resolve_address(address, DEFAULT_DAEMON_HOST, DEFAULT_RPC_PORT),
            None => Ok(DaemonEndpoint::new(
                host.unwrap_or(DEFAULT_DAEMON_HOST),
                port.unwrap_or(DEFAULT_RPC_PORT),
            )),
        }
    }
}

/// Errors raised while resolving the daemon endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// An address was given together with a host or port.
    #[error("you can't specify daemon host or port several times")]
    Conflict,
    /// Nothing was left of the host once the scheme and port were removed.
    #[error("failed to parse daemon address '{address}': missing host")]
    MissingHost {
        /// Address as supplied by the operator.
        address: String,
    },
    /// The port segment is not a number in `0..=65535`.
    #[error("failed to parse daemon address '{address}': invalid port '{port}'")]
    InvalidPort {
        /// Address as supplied by the operator.
        address: String,
        /// Port text extracted from the address.
        port: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}
