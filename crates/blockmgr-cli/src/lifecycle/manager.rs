use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use blockmgr_config::DaemonEndpoint;
use tracing::{debug, error, info};

use super::init_signal::init_signal;
use super::node_proxy::{NodeEvent, NodeProxy};
use super::subscriptions::SubscriptionId;
use super::{ConnectionInitError, ConnectionState, ConnectivityError};
use crate::LIFECYCLE_TARGET;
use crate::gateway::RpcGateway;

/// State shared between the manager and the callbacks it registers.
struct Shared {
    endpoint: DaemonEndpoint,
    state: RwLock<ConnectionState>,
    height: AtomicU64,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: ConnectionState) -> ConnectionState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *state, next)
    }

    /// Moves `Connecting` to `Connected` unless a loss was reported while
    /// waiting; returns the resulting state.
    fn finish_connecting(&self) -> ConnectionState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if *state == ConnectionState::Connecting {
            *state = ConnectionState::Connected;
        }
        *state
    }

    fn connection_status_updated(&self, connected: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match (*state, connected) {
            (ConnectionState::Connected | ConnectionState::Connecting, false) => {
                *state = ConnectionState::Failed;
                error!(
                    target: LIFECYCLE_TARGET,
                    event = "connection_lost",
                    endpoint = %self.endpoint,
                    "failed to connect to daemon ({}).",
                    self.endpoint
                );
            }
            (ConnectionState::Failed, true) => {
                *state = ConnectionState::Connected;
                info!(
                    target: LIFECYCLE_TARGET,
                    event = "connection_restored",
                    endpoint = %self.endpoint,
                    "connected to daemon"
                );
            }
            (current, _) => {
                debug!(
                    target: LIFECYCLE_TARGET,
                    state = %current,
                    connected,
                    "connection status unchanged"
                );
            }
        }
    }

    fn node_event(&self, event: &NodeEvent) {
        match *event {
            NodeEvent::LocalHeightUpdated(height) => {
                self.height.store(height, Ordering::Release);
                debug!(target: LIFECYCLE_TARGET, height, "local chain height updated");
            }
        }
    }
}

struct Registrations {
    node_events: SubscriptionId,
    status: SubscriptionId,
}

/// Owns the daemon connection on behalf of the console.
///
/// [`ConnectionManager::init`] blocks until the node proxy reports its first
/// call (or the timeout expires). After that, status notifications arrive on
/// the node proxy's thread and are reflected in [`ConnectionManager::state`],
/// which commands consult before touching the network.
pub struct ConnectionManager {
    shared: Arc<Shared>,
    proxy: NodeProxy,
    registrations: Mutex<Option<Registrations>>,
}

impl ConnectionManager {
    /// Builds a manager that polls through `gateway` every `poll_interval`.
    #[must_use]
    pub fn new(endpoint: DaemonEndpoint, gateway: RpcGateway, poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                endpoint,
                state: RwLock::new(ConnectionState::Disconnected),
                height: AtomicU64::new(0),
            }),
            proxy: NodeProxy::new(gateway, poll_interval),
            registrations: Mutex::new(None),
        }
    }

    /// Starts the node proxy and waits for its first exchange with the daemon.
    ///
    /// `timeout` bounds the wait; `None` waits for as long as the proxy takes.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionInitError`] when the daemon cannot be reached, the
    /// wait times out, or the proxy worker cannot be started. The state is
    /// then [`ConnectionState::Failed`].
    pub fn init(&self, timeout: Option<Duration>) -> Result<(), ConnectionInitError> {
        let previous = self.shared.set_state(ConnectionState::Connecting);
        if matches!(
            previous,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            self.shared.set_state(previous);
            return Err(ConnectionInitError::AlreadyInitialised { state: previous });
        }
        info!(
            target: LIFECYCLE_TARGET,
            event = "init_starting",
            endpoint = %self.shared.endpoint,
            "connecting to daemon"
        );

        // The poller starts polling as soon as it reports the probe, so the
        // status observer must be in place before the worker exists.
        let status = self.subscribe_status();
        let (sender, receiver) = init_signal();
        if let Err(source) = self.proxy.start(sender) {
            self.proxy.unsubscribe_status(status);
            self.shared.set_state(ConnectionState::Failed);
            return Err(ConnectionInitError::Spawn(source));
        }

        match receiver.wait(timeout) {
            Ok(height) => {
                self.shared.height.store(height, Ordering::Release);
                let state = self.shared.finish_connecting();
                self.register_node_events(status);
                info!(
                    target: LIFECYCLE_TARGET,
                    event = "init_succeeded",
                    endpoint = %self.shared.endpoint,
                    height,
                    %state,
                    "connection successful"
                );
                Ok(())
            }
            Err(init_error) => {
                self.proxy.abandon();
                self.proxy.unsubscribe_status(status);
                self.shared.set_state(ConnectionState::Failed);
                error!(
                    target: LIFECYCLE_TARGET,
                    event = "init_failed",
                    endpoint = %self.shared.endpoint,
                    error = %init_error,
                    "daemon connection failed"
                );
                Err(init_error)
            }
        }
    }

    fn subscribe_status(&self) -> SubscriptionId {
        let shared = Arc::clone(&self.shared);
        self.proxy
            .subscribe_status(move |connected| shared.connection_status_updated(*connected))
    }

    fn register_node_events(&self, status: SubscriptionId) {
        let shared = Arc::clone(&self.shared);
        let node_events = self
            .proxy
            .subscribe_node_events(move |event| shared.node_event(event));
        *self
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Registrations {
            node_events,
            status,
        });
    }

    /// Applies a connection-status notification.
    ///
    /// `false` moves a connected or connecting manager to
    /// [`ConnectionState::Failed`]; `true` restores a failed one. Any other
    /// combination is ignored.
    pub fn connection_status_updated(&self, connected: bool) {
        self.shared.connection_status_updated(connected);
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Endpoint the manager talks to.
    #[must_use]
    pub fn endpoint(&self) -> &DaemonEndpoint {
        &self.shared.endpoint
    }

    /// Fails fast unless the connection is currently usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] in every state other than
    /// [`ConnectionState::Connected`].
    pub fn ensure_connected(&self) -> Result<(), ConnectivityError> {
        match self.state() {
            ConnectionState::Connected => Ok(()),
            state => Err(ConnectivityError {
                endpoint: self.shared.endpoint.clone(),
                state,
            }),
        }
    }

    /// Height of the daemon's local chain as last reported by the node proxy.
    ///
    /// Never blocks on the network.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] when the connection is not usable.
    pub fn last_known_height(&self) -> Result<u64, ConnectivityError> {
        self.ensure_connected()?;
        Ok(self.shared.height.load(Ordering::Acquire))
    }

    /// Releases the connection.
    ///
    /// Removes both observers and stops the node proxy. Safe to call when
    /// `init` never ran or failed, and safe to call more than once.
    pub fn deinit(&self) {
        let registrations = self
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Registrations {
            node_events,
            status,
        }) = registrations
        {
            self.proxy.unsubscribe_node_events(node_events);
            self.proxy.unsubscribe_status(status);
        }
        self.proxy.stop();
        if self.shared.set_state(ConnectionState::Disconnected) != ConnectionState::Disconnected {
            info!(target: LIFECYCLE_TARGET, event = "deinit", "daemon connection released");
        }
    }

    #[cfg(test)]
    pub(crate) fn observer_counts(&self) -> (usize, usize) {
        self.proxy.subscriber_counts()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.deinit();
    }
}
