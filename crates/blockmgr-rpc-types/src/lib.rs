//! Request and response payloads exchanged with the blockchain daemon.
//!
//! The daemon's core owns the meaning of these values; the console only needs
//! their shape on the wire and the fixed-length rules for account numbers and
//! public addresses, which are enforced when the newtypes are built so that a
//! malformed value never reaches the network.

mod account;
mod payloads;
mod status;

pub use account::{
    ACCOUNT_NUMBER_LEN, AccountFormatError, AccountNumber, PUBLIC_ADDRESS_LEN, PublicAddress,
};
pub use payloads::{
    BlockAddressRequest, BlockAddressResponse, BlockHashRequest, BlockHashResponse, BlockHeader,
    LastBlockHeaderRequest, LastBlockHeaderResponse, PushBlockRequest, PushBlockResponse,
};
pub use status::{STATUS_BUSY, STATUS_OK};
