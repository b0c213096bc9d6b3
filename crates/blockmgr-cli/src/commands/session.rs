use std::sync::Arc;

use blockmgr_config::{LogLevel, LogLevelParseError};
use tracing::info;

use super::reject_arguments;
use crate::CONSOLE_TARGET;
use crate::console::{CommandOutcome, CommandRegistry, StopHandle};
use crate::telemetry::LogControl;

const SET_LOG_USAGE: &str = "use: set_log <log_level_number_0-4>";

pub(super) fn register_help(registry: &mut CommandRegistry) {
    registry.register("help", "Show this help", |invocation, reply| {
        if let Some(outcome) = reject_arguments(invocation, reply)? {
            return Ok(outcome);
        }
        reply.line(format_args!("Commands:"))?;
        for line in invocation.registry().usage().lines() {
            reply.line(format_args!("  {line}"))?;
        }
        Ok(CommandOutcome::Success)
    });
}

pub(super) fn register_set_log(registry: &mut CommandRegistry, logs: Arc<dyn LogControl>) {
    registry.register(
        "set_log",
        "Change the current log level\nusage: set_log <level>, where <level> is a number 0-4",
        move |invocation, reply| {
            let [raw] = invocation.args() else {
                reply.error(format_args!("{SET_LOG_USAGE}"))?;
                return Ok(CommandOutcome::UserError);
            };
            let level = match raw.parse::<LogLevel>() {
                Ok(level) => level,
                Err(LogLevelParseError::NotANumber(_)) => {
                    reply.error(format_args!("wrong number format, {SET_LOG_USAGE}"))?;
                    return Ok(CommandOutcome::UserError);
                }
                Err(LogLevelParseError::OutOfRange(_)) => {
                    reply.error(format_args!("wrong number range, {SET_LOG_USAGE}"))?;
                    return Ok(CommandOutcome::UserError);
                }
            };
            if let Err(error) = logs.set_level(level) {
                reply.error(format_args!("{error}"))?;
                return Ok(CommandOutcome::Fatal);
            }
            info!(
                target: CONSOLE_TARGET,
                event = "log_level_changed",
                level = level.as_number(),
                "log level changed"
            );
            reply.line(format_args!(
                "log level set to {} ({level})",
                level.as_number()
            ))?;
            Ok(CommandOutcome::Success)
        },
    );
}

pub(super) fn register_exit(registry: &mut CommandRegistry, stop: StopHandle) {
    registry.register("exit", "Close Block Manager", move |invocation, reply| {
        if let Some(outcome) = reject_arguments(invocation, reply)? {
            return Ok(outcome);
        }
        stop.request_stop();
        Ok(CommandOutcome::Success)
    });
}
