use std::sync::Arc;

use super::reject_arguments;
use crate::console::{CommandOutcome, CommandRegistry};
use crate::lifecycle::ConnectionManager;

pub(super) fn register_bc_height(
    registry: &mut CommandRegistry,
    connection: Arc<ConnectionManager>,
) {
    registry.register("bc_height", "Show blockchain height", move |invocation, reply| {
        if let Some(outcome) = reject_arguments(invocation, reply)? {
            return Ok(outcome);
        }
        match connection.last_known_height() {
            Ok(height) => {
                reply.line(format_args!("{height}"))?;
                Ok(CommandOutcome::Success)
            }
            Err(error) => {
                reply.error(format_args!("{error}"))?;
                Ok(CommandOutcome::Fatal)
            }
        }
    });
}
