//! Binary entrypoint for the block manager console.
//!
//! All behaviour lives in [`blockmgr_cli::run`]; this file only hands over the
//! process's streams.

use std::io::{self, IsTerminal, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let interactive = io::stdin().is_terminal();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    blockmgr_cli::run(
        std::env::args_os(),
        io::stdin(),
        &mut stdout,
        &mut stderr,
        interactive,
    )
}
