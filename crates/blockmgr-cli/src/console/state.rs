use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Run/stop state of the console loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConsoleState {
    /// Built but not yet reading input.
    Idle = 0,
    /// Reading and dispatching commands.
    Running = 1,
    /// A stop was requested; the loop exits after the current command.
    StopRequested = 2,
    /// The loop has exited; nothing more is dispatched.
    Stopped = 3,
}

impl ConsoleState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::StopRequested,
            _ => Self::Stopped,
        }
    }
}

/// Shared, lock-free view of the console state.
///
/// Clones observe and drive the same state, so a signal thread or the `exit`
/// command can request a stop while the loop is blocked waiting for input.
#[derive(Debug, Clone)]
pub struct StopHandle {
    state: Arc<AtomicU8>,
}

impl Default for StopHandle {
    fn default() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ConsoleState::Idle as u8)),
        }
    }
}

impl StopHandle {
    /// Builds a handle in [`ConsoleState::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConsoleState {
        ConsoleState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Asks the loop to stop. Has no effect once the loop has stopped.
    pub fn request_stop(&self) {
        self.transition(
            &[ConsoleState::Idle, ConsoleState::Running],
            ConsoleState::StopRequested,
        );
    }

    /// Returns true once a stop has been requested or completed.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        matches!(
            self.state(),
            ConsoleState::StopRequested | ConsoleState::Stopped
        )
    }

    /// Moves `Idle` to `Running`. Returns false when a stop came first.
    pub(super) fn begin(&self) -> bool {
        self.transition(&[ConsoleState::Idle], ConsoleState::Running)
    }

    pub(super) fn finish(&self) {
        self.state
            .store(ConsoleState::Stopped as u8, Ordering::Release);
    }

    fn transition(&self, from: &[ConsoleState], to: ConsoleState) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                from.contains(&ConsoleState::from_raw(raw))
                    .then_some(to as u8)
            })
            .is_ok()
    }
}
