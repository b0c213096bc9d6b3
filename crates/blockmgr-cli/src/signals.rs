//! Termination signal handling for the console.
//!
//! SIGINT and SIGTERM request a stop; the console loop notices between reads
//! and winds down through the same path as `exit`.

use crate::console::StopHandle;

#[cfg(unix)]
mod imp {
    use std::io;
    use std::thread::{self, JoinHandle};

    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::{Handle, Signals};
    use tracing::{info, warn};

    use crate::CONSOLE_TARGET;
    use crate::console::StopHandle;

    pub(crate) struct SignalListener {
        handle: Handle,
        worker: Option<JoinHandle<()>>,
    }

    impl SignalListener {
        pub(crate) fn install(stop: StopHandle) -> io::Result<Self> {
            let mut signals = Signals::new([SIGINT, SIGTERM])?;
            let handle = signals.handle();
            let worker = thread::Builder::new()
                .name(String::from("blockmgr-signals"))
                .spawn(move || {
                    for signal in signals.forever() {
                        info!(
                            target: CONSOLE_TARGET,
                            event = "signal_received",
                            signal,
                            "stop requested by signal"
                        );
                        stop.request_stop();
                    }
                })?;
            Ok(Self {
                handle,
                worker: Some(worker),
            })
        }

        pub(crate) fn close(mut self) {
            self.shutdown();
        }

        fn shutdown(&mut self) {
            self.handle.close();
            if let Some(worker) = self.worker.take()
                && worker.join().is_err()
            {
                warn!(target: CONSOLE_TARGET, "signal listener panicked");
            }
        }
    }

    impl Drop for SignalListener {
        fn drop(&mut self) {
            self.shutdown();
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    use crate::console::StopHandle;

    pub(crate) struct SignalListener;

    impl SignalListener {
        pub(crate) fn install(_stop: StopHandle) -> io::Result<Self> {
            Ok(Self)
        }

        pub(crate) const fn close(self) {}
    }
}

pub(crate) use imp::SignalListener;

/// Installs the listener, logging instead of failing when signals are
/// unavailable.
pub(crate) fn listen(stop: &StopHandle) -> Option<SignalListener> {
    match SignalListener::install(stop.clone()) {
        Ok(listener) => Some(listener),
        Err(error) => {
            tracing::warn!(
                target: crate::CONSOLE_TARGET,
                %error,
                "failed to install signal handlers; use exit to stop"
            );
            None
        }
    }
}
