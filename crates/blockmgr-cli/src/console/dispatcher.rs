use std::io::{self, Write};

use tracing::debug;

use super::{CommandOutcome, CommandRegistry, Invocation, Reply};
use crate::CONSOLE_TARGET;

/// What happened to a dispatched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The line held no tokens.
    Empty,
    /// No command has this name.
    Unknown(String),
    /// A handler ran and reported this outcome.
    Handled(CommandOutcome),
}

/// Routes tokenised command lines to registered handlers.
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    /// Takes ownership of the registry; it is not changed afterwards.
    #[must_use]
    pub const fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// Commands this dispatcher knows.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs the command named by `tokens[0]` with the remaining tokens.
    ///
    /// Unknown names are reported on `out` and never treated as failures of
    /// the console itself.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing to `out` fails.
    pub fn dispatch(&self, tokens: &[String], out: &mut dyn Write) -> io::Result<Dispatch> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Dispatch::Empty);
        };
        let mut reply = Reply::new(out);

        let Some(handler) = self.registry.handler(name) else {
            debug!(target: CONSOLE_TARGET, command = %name, "unknown command");
            reply.error(format_args!("no such command: {name}"))?;
            return Ok(Dispatch::Unknown(name.clone()));
        };

        debug!(
            target: CONSOLE_TARGET,
            command = %name,
            args = args.len(),
            "dispatching command"
        );
        let outcome = handler(&Invocation::new(name, args, &self.registry), &mut reply)?;
        debug!(target: CONSOLE_TARGET, command = %name, ?outcome, "command finished");
        Ok(Dispatch::Handled(outcome))
    }
}

/// Splits a command line on whitespace.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}
