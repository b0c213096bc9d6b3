//! One-shot channel carrying the node proxy's initialisation outcome.
//!
//! The sender is consumed by [`InitSender::send`], so the outcome is written
//! at most once. A sender dropped without sending is reported to the waiter
//! as [`ConnectionInitError::Abandoned`] rather than leaving it blocked.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::time::Duration;

use super::ConnectionInitError;
use crate::transport::TransportError;

/// Outcome of the first daemon call: the local chain height on success.
pub(super) type InitOutcome = Result<u64, TransportError>;

/// Builds a connected sender/receiver pair.
pub(super) fn init_signal() -> (InitSender, InitReceiver) {
    let (sender, receiver) = mpsc::sync_channel(1);
    (InitSender(sender), InitReceiver(receiver))
}

/// Write half, owned by the node proxy worker.
#[derive(Debug)]
pub(super) struct InitSender(SyncSender<InitOutcome>);

impl InitSender {
    /// Delivers the outcome. Returns false when nobody is waiting any more.
    pub(super) fn send(self, outcome: InitOutcome) -> bool {
        self.0.send(outcome).is_ok()
    }
}

/// Read half, owned by the caller of `init`.
#[derive(Debug)]
pub(super) struct InitReceiver(Receiver<InitOutcome>);

impl InitReceiver {
    /// Blocks until the outcome arrives or `timeout` elapses.
    ///
    /// `None` waits indefinitely.
    pub(super) fn wait(self, timeout: Option<Duration>) -> Result<u64, ConnectionInitError> {
        let outcome = match timeout {
            Some(limit) => self.0.recv_timeout(limit).map_err(|error| match error {
                RecvTimeoutError::Timeout => ConnectionInitError::TimedOut { timeout: limit },
                RecvTimeoutError::Disconnected => ConnectionInitError::Abandoned,
            })?,
            None => self
                .0
                .recv()
                .map_err(|_| ConnectionInitError::Abandoned)?,
        };
        outcome.map_err(ConnectionInitError::Probe)
    }
}
