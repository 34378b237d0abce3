//! Dispatcher: resolves a domain plus argument list to a handler and runs it.
//!
//! Resolution order at every scope: empty input runs the default command (or shows help),
//! then help tokens, then group names, then command names, then command aliases. The
//! completion engine walks its tree in the same order.

mod args;
pub mod help;
mod result;

pub use args::ParsedArgs;
pub use result::CommandResult;

use crate::error::ShellError;
use crate::registry::{CommandDefinition, CommandScope, Descriptions, Registry};
use crate::session::Session;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Tokens that render help for the current scope
pub const HELP_TOKENS: [&str; 3] = ["--help", "-h", "help"];

pub fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}

/// Where a token sequence lands
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A command to run with the remaining tokens
    Command {
        command: &'a CommandDefinition,
        args: &'a [String],
        path: Vec<&'a str>,
    },
    /// Help for a scope (explicit help token, or empty input without a default command)
    Help {
        scope: &'a CommandScope,
        descriptions: &'a Descriptions,
        path: Vec<&'a str>,
    },
    /// The token matched nothing in the scope at `path`
    Unknown { token: &'a str, path: Vec<&'a str> },
}

/// Resolve `args` against `scope`, descending into groups as they match.
pub fn resolve<'a>(
    scope: &'a CommandScope,
    descriptions: &'a Descriptions,
    mut path: Vec<&'a str>,
    args: &'a [String],
) -> Resolution<'a> {
    let Some((first, rest)) = args.split_first() else {
        return match &scope.default_command {
            Some(command) => Resolution::Command {
                command,
                args,
                path,
            },
            None => Resolution::Help {
                scope,
                descriptions,
                path,
            },
        };
    };

    if is_help_token(first) {
        return Resolution::Help {
            scope,
            descriptions,
            path,
        };
    }

    if let Some(group) = scope.groups.get(first) {
        path.push(group.name.as_str());
        return resolve(&group.scope, &group.descriptions, path, rest);
    }

    let command = scope
        .commands
        .get(first)
        .or_else(|| scope.find_alias(first));
    match command {
        Some(command) => {
            path.push(command.name.as_str());
            Resolution::Command {
                command,
                args: rest,
                path,
            }
        }
        None => Resolution::Unknown { token: first, path },
    }
}

/// Executes commands against a registry
pub struct Dispatcher<'a> {
    registry: &'a Registry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Execute `args` in `domain_name`. Never panics and never returns `Err`: every
    /// failure is reported through `CommandResult::error`.
    pub fn execute(&self, domain_name: &str, args: &[String], session: &mut Session) -> CommandResult {
        let Some(domain) = self.registry.get(domain_name) else {
            debug!(domain = domain_name, "Unknown domain");
            let err = ShellError::UnknownDomain(domain_name.to_string());
            let mut result = CommandResult::from_error(&err);
            result.push("Run 'domains' to list available domains.");
            return result;
        };

        match resolve(
            &domain.scope,
            &domain.descriptions,
            vec![domain.name.as_str()],
            args,
        ) {
            Resolution::Help {
                scope,
                descriptions,
                path,
            } => CommandResult::lines(help::render_scope(&path, descriptions, scope)),
            Resolution::Unknown { token, path } => unknown_command(&path, token),
            Resolution::Command {
                command,
                args,
                path,
            } => {
                debug!(command = %path.join(" "), args = args.len(), "Dispatching command");
                run_handler(command, args, session, &path)
            }
        }
    }
}

fn unknown_command(path: &[&str], token: &str) -> CommandResult {
    let scope = path.join(" ");
    let err = ShellError::UnknownCommand {
        scope: scope.clone(),
        token: token.to_string(),
    };
    let mut result = CommandResult::from_error(&err);
    result.push(format!(
        "Run '{}' or '{} --help' for a list of valid commands.",
        scope, scope
    ));
    result
}

fn run_handler(
    command: &CommandDefinition,
    args: &[String],
    session: &mut Session,
    path: &[&str],
) -> CommandResult {
    let handler = &command.handler;
    match panic::catch_unwind(AssertUnwindSafe(|| handler(args, session))) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            debug!(command = %path.join(" "), error = %err, "Command returned error");
            CommandResult::from_error(&err)
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "handler panicked".to_string());
            warn!(command = %path.join(" "), %message, "Command handler panicked");
            CommandResult::from_error(&ShellError::Handler(message))
        }
    }
}
