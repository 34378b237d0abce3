//! `query` extension for the generated `ai_intelligence` domain.

use crate::completion::CompletionFlag;
use crate::dispatch::{CommandResult, ParsedArgs};
use crate::error::ShellError;
use crate::registry::CommandDefinition;
use crate::session::Session;
use serde_json::{json, Value};
use tracing::debug;

/// Domain the command extends
pub const DOMAIN: &str = "ai_intelligence";

pub fn query_command() -> CommandDefinition {
    CommandDefinition::new("query", query)
        .description("Ask the AI assistant a question")
        .usage("<question...> [--namespace <ns>]")
        .alias("ask")
        .flag(CompletionFlag::namespace())
}

fn query_path(namespace: &str) -> String {
    format!("/api/gen-ai/namespaces/{}/query", namespace)
}

fn query(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[CompletionFlag::namespace()])?;
    if parsed.positionals().is_empty() {
        return Err(ShellError::InvalidArguments("a question is required".to_string()));
    }
    let question = parsed.positionals().join(" ");
    let namespace = parsed.value("namespace").unwrap_or(session.namespace()).to_string();
    debug!(%namespace, chars = question.len(), "Sending AI query");
    let response = session.api()?.post(
        &query_path(&namespace),
        &json!({ "current_query": question, "namespace": namespace }),
    )?;
    Ok(CommandResult::lines(answer_lines(&response)?))
}

/// Summary text when the response carries one, the raw JSON otherwise.
fn answer_lines(response: &Value) -> Result<Vec<String>, ShellError> {
    let summary = ["/generic_response/summary", "/explain_log_record_response/summary", "/summary"]
        .iter()
        .find_map(|pointer| response.pointer(pointer).and_then(Value::as_str));
    let text = match summary {
        Some(text) => text.to_string(),
        None => serde_json::to_string_pretty(response)?,
    };
    Ok(text.lines().map(str::to_string).collect())
}
