//! Background worker that owns the long-lived view of the daemon.
//!
//! The worker's first call doubles as the initialisation probe. Afterwards it
//! polls the daemon every `poll_interval`, publishing connection status only
//! when it changes and height updates only when the height moves.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use blockmgr_rpc_types::STATUS_OK;
use tracing::{debug, warn};

use super::init_signal::InitSender;
use super::subscriptions::{SubscriptionId, Subscribers};
use crate::LIFECYCLE_TARGET;
use crate::gateway::RpcGateway;

/// Chain notifications published by the node proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// The daemon's local chain reached a new height.
    LocalHeightUpdated(u64),
}

struct Worker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

pub(super) struct NodeProxy {
    gateway: RpcGateway,
    poll_interval: Duration,
    node_events: Arc<Subscribers<NodeEvent>>,
    status_events: Arc<Subscribers<bool>>,
    worker: Mutex<Option<Worker>>,
}

impl NodeProxy {
    pub(super) fn new(gateway: RpcGateway, poll_interval: Duration) -> Self {
        Self {
            gateway,
            poll_interval,
            node_events: Arc::new(Subscribers::default()),
            status_events: Arc::new(Subscribers::default()),
            worker: Mutex::new(None),
        }
    }

    /// Spawns the worker, which reports its first call through `init`.
    pub(super) fn start(&self, init: InitSender) -> io::Result<()> {
        let (shutdown, shutdown_rx) = mpsc::channel();
        let poller = Poller {
            gateway: self.gateway.clone(),
            poll_interval: self.poll_interval,
            node_events: Arc::clone(&self.node_events),
            status_events: Arc::clone(&self.status_events),
            shutdown: shutdown_rx,
        };
        let handle = thread::Builder::new()
            .name(String::from("blockmgr-node-proxy"))
            .spawn(move || poller.run(init))?;
        let previous = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Worker { shutdown, handle });
        if let Some(stale) = previous {
            Self::detach(stale);
        }
        Ok(())
    }

    /// Stops the worker and waits for it to finish its current call.
    pub(super) fn stop(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Worker { shutdown, handle }) = worker {
            drop(shutdown);
            if handle.join().is_err() {
                warn!(target: LIFECYCLE_TARGET, "node proxy worker panicked");
            }
        }
    }

    /// Stops the worker without waiting for a call that may still be in flight.
    pub(super) fn abandon(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(stale) = worker {
            Self::detach(stale);
        }
    }

    fn detach(worker: Worker) {
        // Dropping the sender disconnects the channel; the worker exits as
        // soon as its current call returns.
        drop(worker.shutdown);
        drop(worker.handle);
    }

    pub(super) fn subscribe_node_events<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NodeEvent) + Send + Sync + 'static,
    {
        self.node_events.subscribe(callback)
    }

    pub(super) fn subscribe_status<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.status_events.subscribe(callback)
    }

    pub(super) fn unsubscribe_node_events(&self, id: SubscriptionId) -> bool {
        self.node_events.unsubscribe(id)
    }

    pub(super) fn unsubscribe_status(&self, id: SubscriptionId) -> bool {
        self.status_events.unsubscribe(id)
    }

    #[cfg(test)]
    pub(super) fn subscriber_counts(&self) -> (usize, usize) {
        (self.node_events.len(), self.status_events.len())
    }
}

struct Poller {
    gateway: RpcGateway,
    poll_interval: Duration,
    node_events: Arc<Subscribers<NodeEvent>>,
    status_events: Arc<Subscribers<bool>>,
    shutdown: Receiver<()>,
}

impl Poller {
    fn run(self, init: InitSender) {
        let mut height = match self.gateway.last_block_header() {
            Ok(response) => response.block_header.height,
            Err(error) => {
                init.send(Err(error));
                return;
            }
        };
        if !init.send(Ok(height)) {
            debug!(target: LIFECYCLE_TARGET, "init waiter gone; node proxy exiting");
            return;
        }

        let mut connected = true;
        while let Err(RecvTimeoutError::Timeout) = self.shutdown.recv_timeout(self.poll_interval) {
            match self.gateway.last_block_header() {
                Ok(response) => {
                    if !connected {
                        connected = true;
                        self.status_events.publish(&true);
                    }
                    let latest = response.block_header.height;
                    if response.status == STATUS_OK && latest != height {
                        height = latest;
                        self.node_events
                            .publish(&NodeEvent::LocalHeightUpdated(latest));
                    }
                }
                Err(error) if error.is_unreachable() => {
                    if connected {
                        connected = false;
                        self.status_events.publish(&false);
                    }
                }
                Err(error) => {
                    warn!(
                        target: LIFECYCLE_TARGET,
                        error = %error,
                        "node proxy poll failed"
                    );
                }
            }
        }
        debug!(target: LIFECYCLE_TARGET, "node proxy stopped");
    }
}
