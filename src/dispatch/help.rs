//! Help screens for scopes and commands.

use crate::completion::CompletionFlag;
use crate::registry::{CommandDefinition, CommandScope, Descriptions};

const NAME_WIDTH: usize = 22;

/// Help for a domain or group scope.
pub fn render_scope(path: &[&str], descriptions: &Descriptions, scope: &CommandScope) -> Vec<String> {
    let title = path.join(" ");
    let mut lines = Vec::new();
    let description = descriptions.longest();
    if description.is_empty() {
        lines.push(title.clone());
    } else {
        lines.push(format!("{} - {}", title, description));
    }
    lines.push(String::new());
    lines.push(format!("Usage: {} <command> [args]", title));

    if !scope.groups.is_empty() {
        lines.push(String::new());
        lines.push("Subcommand groups:".to_string());
        for group in scope.groups.values() {
            lines.push(format!(
                "  {:<width$} {}",
                group.name,
                group.descriptions.short,
                width = NAME_WIDTH
            ));
        }
    }

    let visible: Vec<&CommandDefinition> = scope.commands.values().filter(|c| !c.hidden).collect();
    if !visible.is_empty() {
        lines.push(String::new());
        lines.push("Commands:".to_string());
        for command in visible {
            lines.push(command_line(command));
        }
    }

    if let Some(default) = &scope.default_command {
        lines.push(String::new());
        lines.push(format!(
            "Running '{}' without a command runs '{}'.",
            title, default.name
        ));
    }
    lines.push(String::new());
    lines.push(format!("Run '{} <command> --help' for command details.", title));
    lines
}

/// Help for a single command.
pub fn render_command(path: &[&str], command: &CommandDefinition) -> Vec<String> {
    let title = path.join(" ");
    let mut lines = Vec::new();
    let description = command.descriptions.longest();
    if description.is_empty() {
        lines.push(title.clone());
    } else {
        lines.push(format!("{} - {}", title, description));
    }
    lines.push(String::new());
    match &command.usage {
        Some(usage) => lines.push(format!("Usage: {} {}", title, usage)),
        None => lines.push(format!("Usage: {}", title)),
    }
    if !command.aliases.is_empty() {
        lines.push(format!("Aliases: {}", command.aliases.join(", ")));
    }
    if !command.flags.is_empty() {
        lines.push(String::new());
        lines.push("Flags:".to_string());
        for flag in &command.flags {
            lines.push(flag_line(flag));
        }
    }
    lines
}

fn command_line(command: &CommandDefinition) -> String {
    let mut line = format!(
        "  {:<width$} {}",
        command.name,
        command.descriptions.short,
        width = NAME_WIDTH
    );
    if !command.aliases.is_empty() {
        line.push_str(&format!(" (aliases: {})", command.aliases.join(", ")));
    }
    line.trim_end().to_string()
}

fn flag_line(flag: &CompletionFlag) -> String {
    let mut names = match &flag.short {
        Some(short) => format!("-{}, --{}", short, flag.name),
        None => format!("    --{}", flag.name),
    };
    if flag.takes_value {
        names.push_str(" <value>");
    }
    let mut line = format!("  {:<width$} {}", names, flag.description, width = NAME_WIDTH + 6);
    if flag.required {
        line.push_str(" (required)");
    }
    line.trim_end().to_string()
}
