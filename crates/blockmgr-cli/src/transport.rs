//! HTTP transport for daemon RPC calls.
//!
//! Every call opens its own connection: idle pooling is disabled so a daemon
//! restart never leaves the console holding a dead socket. JSON-RPC methods
//! are posted to [`JSON_RPC_PATH`] inside a `2.0` envelope, while the plain
//! JSON endpoints receive the request body as is.

use std::time::Duration;

use blockmgr_config::DaemonEndpoint;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::RPC_TARGET;

/// Path that serves every JSON-RPC method.
pub(crate) const JSON_RPC_PATH: &str = "/json_rpc";

const JSON_RPC_VERSION: &str = "2.0";
const JSON_RPC_ID: &str = "0";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a call is delivered on the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcRoute {
    /// A named JSON-RPC method posted to [`JSON_RPC_PATH`].
    JsonRpc {
        /// Method name.
        method: &'static str,
    },
    /// A plain JSON endpoint.
    Endpoint {
        /// Request path, starting with `/`.
        path: &'static str,
    },
}

/// A single request to the daemon.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    route: RpcRoute,
    params: Value,
}

impl RpcCall {
    /// Builds a call to a JSON-RPC method.
    #[must_use]
    pub fn json_rpc(method: &'static str, params: Value) -> Self {
        Self {
            route: RpcRoute::JsonRpc { method },
            params,
        }
    }

    /// Builds a call to a plain JSON endpoint.
    #[must_use]
    pub fn endpoint(path: &'static str, body: Value) -> Self {
        Self {
            route: RpcRoute::Endpoint { path },
            params: body,
        }
    }

    /// Delivery route of the call.
    #[must_use]
    pub const fn route(&self) -> RpcRoute {
        self.route
    }

    /// Request parameters, before any envelope is applied.
    #[must_use]
    pub const fn params(&self) -> &Value {
        &self.params
    }

    /// Method name or path, used in logs and error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.route {
            RpcRoute::JsonRpc { method } => method,
            RpcRoute::Endpoint { path } => path,
        }
    }

    /// Path the request is posted to.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self.route {
            RpcRoute::JsonRpc { .. } => JSON_RPC_PATH,
            RpcRoute::Endpoint { path } => path,
        }
    }

    /// Request body as sent on the wire.
    #[must_use]
    pub fn body(&self) -> Value {
        match self.route {
            RpcRoute::JsonRpc { method } => json!({
                "jsonrpc": JSON_RPC_VERSION,
                "id": JSON_RPC_ID,
                "method": method,
                "params": self.params,
            }),
            RpcRoute::Endpoint { .. } => self.params.clone(),
        }
    }
}

/// Carries a call to the daemon and returns its decoded result.
///
/// For JSON-RPC calls the returned value is the envelope's `result` member;
/// for plain endpoints it is the whole response body.
pub trait RpcTransport: Send + Sync {
    /// Performs one round trip.
    ///
    /// # Errors
    ///
    /// Returns a classified [`TransportError`] when the daemon cannot be
    /// reached or answers with something other than a usable result.
    fn invoke(&self, call: &RpcCall) -> Result<Value, TransportError>;
}

/// Failures raised while talking to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established, timed out, or was dropped.
    #[error("daemon at {endpoint} is unreachable: {message}")]
    Unreachable {
        /// Endpoint the call was sent to.
        endpoint: String,
        /// Underlying network error text.
        message: String,
    },
    /// The daemon answered with a non-success HTTP status.
    #[error("daemon answered {call} with HTTP status {status}")]
    HttpStatus {
        /// Method name or path of the call.
        call: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request could not be encoded.
    #[error("failed to encode request for {call}: {message}")]
    Encode {
        /// Method name or path of the call.
        call: String,
        /// Serialiser error text.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("failed to decode response to {call}: {message}")]
    Decode {
        /// Method name or path of the call.
        call: String,
        /// Parser error text.
        message: String,
    },
    /// The daemon returned a JSON-RPC error object.
    #[error("{message} (code {code})")]
    Remote {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the daemon.
        message: String,
    },
}

impl TransportError {
    /// Returns true when the failure means the daemon could not be reached.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcFault>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcFault {
    code: i64,
    message: String,
}

/// [`RpcTransport`] backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: DaemonEndpoint,
}

impl HttpTransport {
    /// Builds a transport for `endpoint` whose calls give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the client builder error when the HTTP stack cannot be
    /// initialised.
    pub fn new(endpoint: DaemonEndpoint, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint every call is sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &DaemonEndpoint {
        &self.endpoint
    }

    fn classify(&self, call: &RpcCall, error: &reqwest::Error) -> TransportError {
        if error.is_decode() {
            TransportError::Decode {
                call: call.label().to_owned(),
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            TransportError::HttpStatus {
                call: call.label().to_owned(),
                status: status.as_u16(),
            }
        } else {
            // Connect failures, timeouts, and connections dropped mid-body all
            // look the same to the operator.
            TransportError::Unreachable {
                endpoint: self.endpoint.to_string(),
                message: error.to_string(),
            }
        }
    }
}

impl RpcTransport for HttpTransport {
    fn invoke(&self, call: &RpcCall) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.endpoint.base_url(), call.path());
        debug!(target: RPC_TARGET, call = call.label(), %url, "sending daemon request");

        let response = self
            .client
            .post(&url)
            .json(&call.body())
            .send()
            .map_err(|error| self.classify(call, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                call: call.label().to_owned(),
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .map_err(|error| self.classify(call, &error))?;

        match call.route() {
            RpcRoute::JsonRpc { .. } => unwrap_envelope(call, payload),
            RpcRoute::Endpoint { .. } => Ok(payload),
        }
    }
}

fn unwrap_envelope(call: &RpcCall, payload: Value) -> Result<Value, TransportError> {
    let envelope: JsonRpcEnvelope =
        serde_json::from_value(payload).map_err(|error| TransportError::Decode {
            call: call.label().to_owned(),
            message: error.to_string(),
        })?;

    if let Some(fault) = envelope.error {
        return Err(TransportError::Remote {
            code: fault.code,
            message: fault.message,
        });
    }

    envelope.result.ok_or_else(|| TransportError::Decode {
        call: call.label().to_owned(),
        message: String::from("response carries neither a result nor an error"),
    })
}
