use std::fmt;
use std::io::{self, Write};

const ERROR_PREFIX: &str = "Error: ";

/// Operator-facing writer handed to command handlers.
///
/// Each call writes one complete line and flushes, so output appears before
/// the next prompt even when stdout is a pipe.
pub struct Reply<'a> {
    out: &'a mut dyn Write,
}

impl<'a> Reply<'a> {
    /// Wraps the console's output stream.
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// Writes a result line.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the output stream.
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    /// Writes a failure line, prefixed with `Error: `.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the output stream.
    pub fn error(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.out.write_all(ERROR_PREFIX.as_bytes())?;
        self.line(args)
    }

    /// Writes text without a trailing newline, as used for the prompt.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the output stream.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}
