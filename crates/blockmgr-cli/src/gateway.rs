//! Typed daemon calls layered over an [`RpcTransport`].

use std::sync::Arc;

use blockmgr_rpc_types::{
    BlockAddressRequest, BlockAddressResponse, BlockHashRequest, BlockHashResponse,
    LastBlockHeaderRequest, LastBlockHeaderResponse, PushBlockRequest, PushBlockResponse,
    STATUS_BUSY, STATUS_OK,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::RPC_TARGET;
use crate::transport::{RpcCall, RpcTransport, TransportError};

const PUSH_BLOCK_METHOD: &str = "pushblock";
const LAST_BLOCK_HEADER_METHOD: &str = "getlastblockheader";
const BLOCK_ADDRESS_PATH: &str = "/getblockaddress";
const BLOCK_HASH_PATH: &str = "/getblockhash";

const BUSY_MESSAGE: &str = "daemon is busy. Please try later";

/// Issues the daemon calls the console needs.
///
/// The gateway holds the transport only for the duration of each call; it
/// can be cloned freely into command handlers.
#[derive(Clone)]
pub struct RpcGateway {
    transport: Arc<dyn RpcTransport>,
}

impl RpcGateway {
    /// Wraps a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Registers an account/address association with the `pushblock` method.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    pub fn push_block(
        &self,
        request: &PushBlockRequest,
    ) -> Result<PushBlockResponse, TransportError> {
        self.call(RpcCall::json_rpc, PUSH_BLOCK_METHOD, request)
    }

    /// Looks up the address and hash registered for an account.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    pub fn find_address(
        &self,
        request: &BlockAddressRequest,
    ) -> Result<BlockAddressResponse, TransportError> {
        self.call(RpcCall::endpoint, BLOCK_ADDRESS_PATH, request)
    }

    /// Looks up the hash of the block holding an account.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    pub fn block_hash(
        &self,
        request: &BlockHashRequest,
    ) -> Result<BlockHashResponse, TransportError> {
        self.call(RpcCall::endpoint, BLOCK_HASH_PATH, request)
    }

    /// Fetches the header of the daemon's newest local block.
    ///
    /// # Errors
    ///
    /// Propagates the transport failure.
    pub fn last_block_header(&self) -> Result<LastBlockHeaderResponse, TransportError> {
        self.call(
            RpcCall::json_rpc,
            LAST_BLOCK_HEADER_METHOD,
            &LastBlockHeaderRequest::default(),
        )
    }

    fn call<Req, Resp>(
        &self,
        build: fn(&'static str, serde_json::Value) -> RpcCall,
        target: &'static str,
        request: &Req,
    ) -> Result<Resp, TransportError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let params = serde_json::to_value(request).map_err(|error| TransportError::Encode {
            call: target.to_owned(),
            message: error.to_string(),
        })?;
        let call = build(target, params);
        let result = self.transport.invoke(&call)?;
        debug!(target: RPC_TARGET, call = call.label(), "daemon call completed");
        serde_json::from_value(result).map_err(|error| TransportError::Decode {
            call: target.to_owned(),
            message: error.to_string(),
        })
    }
}

/// Turns a daemon status into the message shown to the operator.
///
/// `OK` needs no message; `BUSY` is softened into a retry hint; any other
/// status is shown verbatim.
#[must_use]
pub fn interpret_status(status: &str) -> Option<String> {
    match status {
        STATUS_OK => None,
        STATUS_BUSY => Some(String::from(BUSY_MESSAGE)),
        other => Some(other.to_owned()),
    }
}
