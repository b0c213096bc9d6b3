//! Wire shapes of the daemon calls used by the console.
//!
//! Field names follow the daemon's JSON exactly, including its mixed casing,
//! so every struct carries explicit `serde` renames.

use serde::{Deserialize, Serialize};

use crate::account::{AccountNumber, PublicAddress};

/// Parameters of the `pushblock` JSON-RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushBlockRequest {
    /// Account being registered.
    #[serde(rename = "AccountNumber")]
    pub account_number: AccountNumber,
    /// Address to associate with the account.
    #[serde(rename = "AccountAddress")]
    pub account_address: PublicAddress,
}

/// Result of the `pushblock` JSON-RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushBlockResponse {
    /// Daemon status string.
    pub status: String,
}

/// Body of a `/getblockaddress` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAddressRequest {
    /// Account to look up.
    #[serde(rename = "AccountNumber")]
    pub account_number: AccountNumber,
}

/// Body of a `/getblockaddress` response.
///
/// The address is kept as plain text: the daemon answers with an empty value
/// when the account is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockAddressResponse {
    /// Address associated with the account.
    #[serde(rename = "AccountAddress", default)]
    pub account_address: String,
    /// Hash of the block holding the association.
    #[serde(default)]
    pub hash: String,
    /// Daemon status string.
    pub status: String,
}

/// Body of a `/getblockhash` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHashRequest {
    /// Account to look up.
    #[serde(rename = "AccountNumber")]
    pub account_number: AccountNumber,
}

/// Body of a `/getblockhash` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHashResponse {
    /// Hash of the block holding the account.
    #[serde(default)]
    pub hash: String,
    /// Daemon status string. This call capitalises the field name.
    #[serde(rename = "Status")]
    pub status: String,
}

/// Parameters of the `getlastblockheader` JSON-RPC method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LastBlockHeaderRequest {}

/// Summary of the daemon's newest local block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of the block in the local chain.
    pub height: u64,
    /// Block hash.
    #[serde(default)]
    pub hash: String,
    /// Block timestamp in seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
}

/// Result of the `getlastblockheader` JSON-RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastBlockHeaderResponse {
    /// Header of the newest local block.
    pub block_header: BlockHeader,
    /// Daemon status string.
    pub status: String,
}
