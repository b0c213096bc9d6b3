//! Connection lifecycle for the daemon.
//!
//! The submodules split the concern as follows:
//! - [`state`] holds the connection state machine.
//! - [`error`] captures initialisation and connectivity failures.
//! - [`init_signal`] carries the one-shot initialisation outcome.
//! - [`subscriptions`] stores the callbacks registered on the node proxy.
//! - [`node_proxy`] owns the background worker that talks to the daemon.
//! - [`manager`] ties the pieces together for the console.

mod error;
mod init_signal;
mod manager;
mod node_proxy;
mod state;
mod subscriptions;

pub use error::{ConnectionInitError, ConnectivityError};
pub use manager::ConnectionManager;
pub use node_proxy::NodeEvent;
pub use state::ConnectionState;
pub use subscriptions::SubscriptionId;
