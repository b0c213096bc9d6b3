use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Dispatcher, StopHandle, tokenize};
use crate::CONSOLE_TARGET;

/// Prompt written before each read on an interactive terminal.
pub const PROMPT: &str = "[blockmgr]: ";

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Reads command lines and dispatches them until a stop is requested.
///
/// Input is read on a dedicated thread and handed over through a channel, so
/// the loop wakes periodically to notice stop requests made while it
/// waits. A command that is already running is never interrupted. End of
/// input counts as a stop request.
pub struct ConsoleLoop<'a> {
    dispatcher: &'a Dispatcher,
    stop: StopHandle,
    interactive: bool,
}

impl<'a> ConsoleLoop<'a> {
    /// Builds a loop over `dispatcher`, driven by `stop`.
    #[must_use]
    pub const fn new(dispatcher: &'a Dispatcher, stop: StopHandle) -> Self {
        Self {
            dispatcher,
            stop,
            interactive: false,
        }
    }

    /// Enables the prompt.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Runs until stopped, leaving the state at `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reader thread cannot be started or writing to
    /// `out` fails.
    pub fn run<R>(&self, input: R, out: &mut dyn Write) -> io::Result<()>
    where
        R: Read + Send + 'static,
    {
        if !self.stop.begin() {
            debug!(target: CONSOLE_TARGET, "stop requested before the console started");
            self.stop.finish();
            return Ok(());
        }
        info!(target: CONSOLE_TARGET, event = "console_started", "block manager started");

        let result = spawn_reader(input).and_then(|lines| self.read_loop(&lines, out));
        self.stop.finish();
        info!(target: CONSOLE_TARGET, event = "console_stopped", "block manager stopped");
        result
    }

    fn read_loop(
        &self,
        lines: &Receiver<io::Result<String>>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let mut prompt_pending = true;
        while !self.stop.is_stop_requested() {
            if self.interactive && prompt_pending {
                out.write_all(PROMPT.as_bytes())?;
                out.flush()?;
                prompt_pending = false;
            }
            match lines.recv_timeout(INPUT_POLL) {
                Ok(Ok(line)) => {
                    prompt_pending = true;
                    self.dispatcher.dispatch(&tokenize(&line), out)?;
                }
                Ok(Err(error)) => {
                    warn!(target: CONSOLE_TARGET, %error, "failed to read console input");
                    self.stop.request_stop();
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!(target: CONSOLE_TARGET, "end of console input");
                    self.stop.request_stop();
                }
            }
        }
        Ok(())
    }
}

fn spawn_reader<R>(input: R) -> io::Result<Receiver<io::Result<String>>>
where
    R: Read + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name(String::from("blockmgr-input"))
        .spawn(move || {
            for line in BufReader::new(input).lines() {
                let failed = line.is_err();
                if sender.send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(receiver)
}
