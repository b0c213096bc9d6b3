//! The console's built-in commands.
//!
//! Each handler validates its arguments before touching the network, so a
//! malformed account number or address never produces a daemon call.
//! Failures are rendered for the operator and folded into a
//! [`CommandOutcome`]; nothing here propagates past the dispatcher except
//! output errors.

mod accounts;
mod chain;
mod session;

use std::io;
use std::sync::Arc;

use crate::console::{CommandOutcome, CommandRegistry, Invocation, Reply, StopHandle};
use crate::gateway::{RpcGateway, interpret_status};
use crate::lifecycle::{ConnectionManager, ConnectivityError};
use crate::telemetry::LogControl;
use crate::transport::TransportError;

/// Collaborators the command handlers close over.
#[derive(Clone)]
pub struct Services {
    /// Typed daemon calls.
    pub gateway: RpcGateway,
    /// Connection state and cached chain height.
    pub connection: Arc<ConnectionManager>,
    /// Runtime log verbosity.
    pub logs: Arc<dyn LogControl>,
    /// Console stop switch.
    pub stop: StopHandle,
}

/// Builds the registry with every built-in command, in help order.
#[must_use]
pub fn registry(services: &Services) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    session::register_help(&mut registry);
    session::register_set_log(&mut registry, Arc::clone(&services.logs));
    chain::register_bc_height(&mut registry, Arc::clone(&services.connection));
    accounts::register_push_block(&mut registry, services.clone());
    accounts::register_find(&mut registry, services.clone());
    accounts::register_print_hash(&mut registry, services.clone());
    session::register_exit(&mut registry, services.stop.clone());
    registry
}

/// Rejects any argument given to a command that takes none.
fn reject_arguments(
    invocation: &Invocation<'_>,
    reply: &mut Reply<'_>,
) -> io::Result<Option<CommandOutcome>> {
    if invocation.args().is_empty() {
        return Ok(None);
    }
    reply.error(format_args!("{} takes no arguments", invocation.name()))?;
    Ok(Some(CommandOutcome::UserError))
}

/// Fails fast when the connection is known to be down.
fn require_connection(
    connection: &ConnectionManager,
    reply: &mut Reply<'_>,
) -> io::Result<Option<CommandOutcome>> {
    match connection.ensure_connected() {
        Ok(()) => Ok(None),
        Err(error) => {
            reply.error(format_args!("{error}"))?;
            Ok(Some(CommandOutcome::Fatal))
        }
    }
}

/// Renders a failed daemon call.
///
/// Unreachable daemons get the generic connectivity message; the network
/// detail goes to the log only.
fn report_failure(
    error: &TransportError,
    connection: &ConnectionManager,
    reply: &mut Reply<'_>,
) -> io::Result<CommandOutcome> {
    if error.is_unreachable() {
        tracing::debug!(target: crate::RPC_TARGET, %error, "daemon unreachable");
        let connectivity = ConnectivityError {
            endpoint: connection.endpoint().clone(),
            state: connection.state(),
        };
        reply.error(format_args!("{connectivity}"))?;
    } else {
        reply.error(format_args!("Failed to invoke rpc method: {error}"))?;
    }
    Ok(CommandOutcome::Fatal)
}

/// Shows a non-`OK` daemon status and reports the command as failed.
fn report_status(status: &str, reply: &mut Reply<'_>) -> io::Result<Option<CommandOutcome>> {
    match interpret_status(status) {
        None => Ok(None),
        Some(message) => {
            reply.line(format_args!("{message}"))?;
            Ok(Some(CommandOutcome::Fatal))
        }
    }
}
