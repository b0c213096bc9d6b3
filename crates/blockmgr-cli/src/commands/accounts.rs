use blockmgr_rpc_types::{
    AccountNumber, BlockAddressRequest, BlockHashRequest, PublicAddress, PushBlockRequest,
};
use tracing::info;

use super::{Services, report_failure, report_status, require_connection};
use crate::CONSOLE_TARGET;
use crate::console::{CommandOutcome, CommandRegistry, Invocation, Reply};

fn parse_account(raw: &str, reply: &mut Reply<'_>) -> std::io::Result<Option<AccountNumber>> {
    match AccountNumber::parse(raw) {
        Ok(account) => Ok(Some(account)),
        Err(error) => {
            reply.error(format_args!("{error}"))?;
            Ok(None)
        }
    }
}

/// Extracts the single account number argument of a lookup command.
fn single_account(
    invocation: &Invocation<'_>,
    reply: &mut Reply<'_>,
) -> std::io::Result<Option<AccountNumber>> {
    let [raw] = invocation.args() else {
        reply.error(format_args!(
            "expected: {} <account number>",
            invocation.name()
        ))?;
        return Ok(None);
    };
    parse_account(raw, reply)
}

pub(super) fn register_push_block(registry: &mut CommandRegistry, services: Services) {
    registry.register(
        "push_block",
        "Push a block associating an account with an address\nusage: push_block <account number> <public address>",
        move |invocation, reply| {
            let [raw_account, raw_address] = invocation.args() else {
                reply.error(format_args!(
                    "expected: push_block <account number> <public address>"
                ))?;
                return Ok(CommandOutcome::UserError);
            };
            let Some(account_number) = parse_account(raw_account, reply)? else {
                return Ok(CommandOutcome::UserError);
            };
            let account_address = match PublicAddress::parse(raw_address.as_str()) {
                Ok(address) => address,
                Err(error) => {
                    reply.error(format_args!("{error}"))?;
                    return Ok(CommandOutcome::UserError);
                }
            };
            if let Some(outcome) = require_connection(&services.connection, reply)? {
                return Ok(outcome);
            }

            let request = PushBlockRequest {
                account_number,
                account_address,
            };
            let response = match services.gateway.push_block(&request) {
                Ok(response) => response,
                Err(error) => return report_failure(&error, &services.connection, reply),
            };
            if let Some(outcome) = report_status(&response.status, reply)? {
                return Ok(outcome);
            }
            info!(
                target: CONSOLE_TARGET,
                event = "block_pushed",
                account = %request.account_number,
                "block pushed"
            );
            reply.line(format_args!(
                "block pushed for account {}",
                request.account_number
            ))?;
            Ok(CommandOutcome::Success)
        },
    );
}

pub(super) fn register_find(registry: &mut CommandRegistry, services: Services) {
    registry.register(
        "find",
        "Find the address and hash associated with an account\nusage: find <account number>",
        move |invocation, reply| {
            let Some(account_number) = single_account(invocation, reply)? else {
                return Ok(CommandOutcome::UserError);
            };
            if let Some(outcome) = require_connection(&services.connection, reply)? {
                return Ok(outcome);
            }

            let request = BlockAddressRequest { account_number };
            let response = match services.gateway.find_address(&request) {
                Ok(response) => response,
                Err(error) => return report_failure(&error, &services.connection, reply),
            };
            if let Some(outcome) = report_status(&response.status, reply)? {
                return Ok(outcome);
            }
            reply.line(format_args!(
                "account {} is associated with",
                request.account_number
            ))?;
            reply.line(format_args!("address: {}", response.account_address))?;
            reply.line(format_args!("hash: {}", response.hash))?;
            Ok(CommandOutcome::Success)
        },
    );
}

pub(super) fn register_print_hash(registry: &mut CommandRegistry, services: Services) {
    registry.register(
        "print_hash",
        "Print the block hash associated with an account\nusage: print_hash <account number>",
        move |invocation, reply| {
            let Some(account_number) = single_account(invocation, reply)? else {
                return Ok(CommandOutcome::UserError);
            };
            if let Some(outcome) = require_connection(&services.connection, reply)? {
                return Ok(outcome);
            }

            let request = BlockHashRequest { account_number };
            let response = match services.gateway.block_hash(&request) {
                Ok(response) => response,
                Err(error) => return report_failure(&error, &services.connection, reply),
            };
            if let Some(outcome) = report_status(&response.status, reply)? {
                return Ok(outcome);
            }
            reply.line(format_args!("status: {}", response.status))?;
            reply.line(format_args!(
                "account {} is associated with the hash: {}",
                request.account_number, response.hash
            ))?;
            Ok(CommandOutcome::Success)
        },
    );
}
