//! CLI output: command results, suggestions and errors as terminal text.

use crate::completion::Suggestion;
use crate::dispatch::CommandResult;
use crate::error::ShellError;
use owo_colors::OwoColorize;

/// Map shell errors to a string for CLI output.
pub fn map_error(e: &ShellError) -> String {
    format!("error: {}", e)
}

/// Text for a command result. Errors are prefixed with their label.
pub fn render_result(result: &CommandResult, color: bool) -> String {
    let mut lines = Vec::with_capacity(result.output.len() + 1);
    if let Some(label) = &result.error {
        let label = format!("{}:", label);
        if color {
            lines.push(label.red().bold().to_string());
        } else {
            lines.push(label);
        }
    }
    lines.extend(result.output.iter().cloned());
    lines.join("\n")
}

/// Suggestions for `__complete`: `text<TAB>description` per line.
pub fn render_machine_suggestions(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .map(|s| format!("{}\t{}", s.text, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Suggestions for the interactive `?` listing, aligned in two columns.
pub fn render_suggestions(suggestions: &[Suggestion], color: bool) -> String {
    if suggestions.is_empty() {
        return "(no completions)".to_string();
    }
    let width = suggestions.iter().map(|s| s.text.len()).max().unwrap_or(0);
    suggestions
        .iter()
        .map(|s| {
            let text = format!("{:<width$}", s.text, width = width);
            let text = if color {
                text.bold().to_string()
            } else {
                text
            };
            format!("  {}  {}", text, s.description).trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Interactive prompt, highlighted on terminals.
pub fn prompt(text: &str, color: bool) -> String {
    if color {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}
