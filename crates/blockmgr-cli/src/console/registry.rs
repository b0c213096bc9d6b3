use std::fmt::Write as _;
use std::io;

use super::Reply;

/// Result of running one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command did what was asked.
    Success,
    /// The input was rejected before any work was attempted.
    UserError,
    /// The command was valid but could not be completed.
    Fatal,
}

/// A parsed command line as seen by its handler.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    name: &'a str,
    args: &'a [String],
    registry: &'a CommandRegistry,
}

impl<'a> Invocation<'a> {
    pub(super) const fn new(
        name: &'a str,
        args: &'a [String],
        registry: &'a CommandRegistry,
    ) -> Self {
        Self {
            name,
            args,
            registry,
        }
    }

    /// Command name as typed.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Arguments following the command name.
    #[must_use]
    pub const fn args(&self) -> &'a [String] {
        self.args
    }

    /// Registry the command was found in.
    #[must_use]
    pub const fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }
}

type Handler = Box<dyn Fn(&Invocation<'_>, &mut Reply<'_>) -> io::Result<CommandOutcome>>;

struct CommandEntry {
    name: String,
    description: String,
    handler: Handler,
}

/// Commands known to the console, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    ///
    /// Registering a name twice replaces the handler and description but keeps
    /// the command's original position in the usage listing.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) where
        F: Fn(&Invocation<'_>, &mut Reply<'_>) -> io::Result<CommandOutcome> + 'static,
    {
        let entry = CommandEntry {
            name: name.into(),
            description: description.into(),
            handler: Box::new(handler),
        };
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.name == entry.name)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub(super) fn handler(&self, name: &str) -> Option<&Handler> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.handler)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no command is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `name - description` line per command, in registration order.
    ///
    /// Further lines of a multi-line description are indented to line up with
    /// the first.
    #[must_use]
    pub fn usage(&self) -> String {
        let mut usage = String::new();
        for entry in &self.entries {
            let indent = " ".repeat(entry.name.len() + 3);
            let mut lines = entry.description.lines();
            let first = lines.next().unwrap_or_default();
            // Writing into a String cannot fail.
            let _ = writeln!(usage, "{} - {first}", entry.name);
            for line in lines {
                let _ = writeln!(usage, "{indent}{line}");
            }
        }
        usage
    }
}
