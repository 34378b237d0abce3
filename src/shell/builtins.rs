//! Shell built-ins: navigation, history and session commands that are not domains.

use crate::completion::{Suggestion, SuggestionCategory};
use crate::dispatch::CommandResult;
use crate::registry::{DomainKind, Registry};
use crate::session::Session;

/// Where a built-in is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// At any context level
    Anywhere,
    /// Only at root (or after a leading `/`)
    Root,
}

struct Builtin {
    names: &'static [&'static str],
    description: &'static str,
    reach: Reach,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        names: &["quit"],
        description: "Leave the shell",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["exit"],
        description: "Leave the current context, or the shell at root",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["back", ".."],
        description: "Go up one context level",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["root", "/"],
        description: "Return to the root context",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["clear"],
        description: "Clear the screen",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["history"],
        description: "Show command history",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["ns"],
        description: "Show or switch the active namespace",
        reach: Reach::Anywhere,
    },
    Builtin {
        names: &["help"],
        description: "Show shell help",
        reach: Reach::Root,
    },
    Builtin {
        names: &["context", "ctx"],
        description: "Show the connection context",
        reach: Reach::Root,
    },
    Builtin {
        names: &["domains"],
        description: "List available domains",
        reach: Reach::Root,
    },
];

fn find(name: &str, at_root: bool) -> Option<&'static Builtin> {
    BUILTINS
        .iter()
        .filter(|b| at_root || b.reach == Reach::Anywhere)
        .find(|b| b.names.contains(&name))
}

/// Run `tokens` as a built-in, or `None` when the first token is not one here.
pub fn run(
    tokens: &[String],
    at_root: bool,
    registry: &Registry,
    session: &mut Session,
) -> Option<CommandResult> {
    let (first, rest) = tokens.split_first()?;
    let builtin = find(first, at_root)?;
    let result = match builtin.names[0] {
        "quit" => CommandResult::exit(),
        "exit" => {
            if session.context_mut().navigate_up() {
                CommandResult::ok().with_context_changed()
            } else {
                CommandResult::exit()
            }
        }
        "back" => {
            if session.context_mut().navigate_up() {
                CommandResult::ok().with_context_changed()
            } else {
                CommandResult::line("Already at root")
            }
        }
        "root" => {
            session.context_mut().reset();
            CommandResult::ok().with_context_changed()
        }
        "clear" => CommandResult::clear(),
        "history" => history(session),
        "ns" => namespace(rest, session),
        "help" => help(registry),
        "context" => context(session),
        "domains" => domains(registry),
        _ => return None,
    };
    Some(result)
}

/// Built-ins whose name starts with `partial`, for the first word of a line.
pub fn suggestions(partial: &str, at_root: bool) -> Vec<Suggestion> {
    BUILTINS
        .iter()
        .filter(|b| at_root || b.reach == Reach::Anywhere)
        .flat_map(|b| b.names.iter().map(move |name| (*name, b.description)))
        .filter(|(name, _)| name.starts_with(partial) && name.chars().all(char::is_alphanumeric))
        .map(|(name, description)| Suggestion::new(name, description, SuggestionCategory::Command))
        .collect()
}

fn history(session: &Session) -> CommandResult {
    CommandResult::lines(
        session
            .history()
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:>5}  {}", i + 1, entry.line)),
    )
}

fn namespace(rest: &[String], session: &mut Session) -> CommandResult {
    match rest.first() {
        None => CommandResult::line(session.namespace().to_string()),
        Some(name) => {
            session.set_namespace(name.clone());
            CommandResult::line(format!("Switched to namespace '{}'", name)).with_context_changed()
        }
    }
}

fn help(registry: &Registry) -> CommandResult {
    let mut lines = vec![
        "xcsh - interactive shell for cloud resource domains".to_string(),
        String::new(),
        "Usage: <domain> [group] <command> [args]".to_string(),
        "Enter a domain (or a group inside it) by typing its name alone;".to_string(),
        "commands typed there are relative to it. A leading '/' runs from root.".to_string(),
        "End a line with '?' to list completions for it.".to_string(),
        String::new(),
        "Built-ins:".to_string(),
    ];
    for builtin in BUILTINS {
        lines.push(format!("  {:<18} {}", builtin.names.join(", "), builtin.description));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} domains available; run 'domains' to list them.",
        registry.len()
    ));
    CommandResult::lines(lines)
}

fn context(session: &Session) -> CommandResult {
    CommandResult::lines([
        format!("Namespace: {}", session.namespace()),
        format!("Tenant:    {}", session.tenant().unwrap_or("-")),
        format!("Context:   {}", session.context()),
        format!(
            "API:       {}",
            if session.has_api() {
                "configured"
            } else {
                "not configured"
            }
        ),
    ])
}

fn domains(registry: &Registry) -> CommandResult {
    let shadowed = registry.shadowed();
    let mut lines = Vec::new();
    for domain in registry.all() {
        let source = match domain.kind {
            DomainKind::Custom if shadowed.contains(&domain.name.as_str()) => "custom (overrides api)",
            DomainKind::Custom => "custom",
            DomainKind::Api(_) => "api",
        };
        let mut line = format!(
            "  {:<20} {:<24} {}",
            domain.name, source, domain.descriptions.short
        );
        if !domain.aliases.is_empty() {
            line.push_str(&format!(" (aliases: {})", domain.aliases.join(", ")));
        }
        lines.push(line.trim_end().to_string());
    }
    CommandResult::lines(lines)
}
