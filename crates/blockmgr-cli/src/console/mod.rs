//! Interactive console: command registry, dispatcher, and the read loop.

mod dispatcher;
mod output;
mod registry;
mod runner;
mod state;

pub use dispatcher::{Dispatch, Dispatcher, tokenize};
pub use output::Reply;
pub use registry::{CommandOutcome, CommandRegistry, Invocation};
pub use runner::ConsoleLoop;
pub use state::{ConsoleState, StopHandle};
