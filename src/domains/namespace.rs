//! `namespace` domain: list, inspect, create, delete and switch namespaces.

use crate::api::handlers::{list_items, OutputFormat};
use crate::completion::{CompletionContext, CompletionFlag, Suggestion, SuggestionCategory};
use crate::config::ApiConfig;
use crate::dispatch::{CommandResult, ParsedArgs};
use crate::error::ShellError;
use crate::registry::{ArgumentCompleter, CommandDefinition, DomainDefinition};
use crate::session::Session;
use crate::values::{DynamicValueProvider, NAMESPACES_ENDPOINT};
use comfy_table::{presets::UTF8_FULL, Table};
use futures::FutureExt;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// `fallback` is the namespace to switch to when the active one is deleted.
pub fn domain(api: &ApiConfig, values: Arc<DynamicValueProvider>) -> DomainDefinition {
    let created = Arc::clone(&values);
    let deleted = values;
    let fallback = api.default_namespace.clone();
    DomainDefinition::new("namespace")
        .description("Manage namespaces")
        .medium_description("List, create, delete and switch between tenant namespaces")
        .command(
            CommandDefinition::new("list", list)
                .description("List namespaces")
                .alias("ls")
                .usage("[--output-format json|table|text]")
                .flag(CompletionFlag::output_format()),
        )
        .command(
            CommandDefinition::new("get", get)
                .description("Show one namespace")
                .usage("<name> [--output-format json|text]")
                .flag(CompletionFlag::output_format())
                .completer(namespace_completer()),
        )
        .command(
            CommandDefinition::new("create", move |args, session| {
                let result = create(args, session)?;
                created.clear();
                Ok(result)
            })
            .description("Create a namespace")
            .usage("<name> [--description <text>]")
            .flag(CompletionFlag::value("description", "Namespace description")),
        )
        .command(
            CommandDefinition::new("delete", move |args, session| {
                let result = delete(args, session, &fallback)?;
                deleted.clear();
                Ok(result)
            })
            .description("Delete a namespace and everything in it")
            .alias("rm")
            .usage("<name>")
            .completer(namespace_completer()),
        )
        .command(
            CommandDefinition::new("use", switch)
                .description("Switch the active namespace")
                .alias("set")
                .usage("<name>")
                .completer(namespace_completer()),
        )
}

/// Completes the first argument with live namespace names.
fn namespace_completer() -> ArgumentCompleter {
    Arc::new(|ctx: CompletionContext| {
        async move {
            if !ctx.args.is_empty() {
                return Vec::new();
            }
            let current = ctx.namespace.clone();
            ctx.values
                .namespaces()
                .await
                .into_iter()
                .map(|name| {
                    let description = if name == current {
                        "current namespace"
                    } else {
                        "namespace"
                    };
                    Suggestion::new(name, description, SuggestionCategory::Value)
                })
                .collect::<Vec<Suggestion>>()
        }
        .boxed()
    })
}

fn item_path(name: &str) -> String {
    format!("{}/{}", NAMESPACES_ENDPOINT, name)
}

fn list(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[CompletionFlag::output_format()])?;
    let format = OutputFormat::parse(parsed.value("output-format").unwrap_or("table"))?;
    let response = session.api()?.get(NAMESPACES_ENDPOINT, &[])?;
    let current = session.namespace();
    let names: Vec<String> = list_items(&response).into_iter().map(|(name, _)| name).collect();
    match format {
        OutputFormat::Json => Ok(CommandResult::lines(
            serde_json::to_string_pretty(&response)?.lines().map(str::to_string),
        )),
        OutputFormat::Text => Ok(CommandResult::lines(names)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["NAME", "ACTIVE"]);
            for name in &names {
                let active = if name == current { "*" } else { "" };
                table.add_row(vec![name.as_str(), active]);
            }
            Ok(CommandResult::lines(table.to_string().lines().map(str::to_string)))
        }
    }
}

fn get(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[CompletionFlag::output_format()])?;
    let name = parsed.require_positional(0, "namespace name")?;
    let format = OutputFormat::parse(parsed.value("output-format").unwrap_or("json"))?;
    let response = session.api()?.get(&item_path(name), &[])?;
    match format {
        OutputFormat::Text => {
            let description = response
                .pointer("/metadata/description")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            Ok(CommandResult::line(format!("{}\t{}", name, description).trim_end().to_string()))
        }
        _ => Ok(CommandResult::lines(
            serde_json::to_string_pretty(&response)?.lines().map(str::to_string),
        )),
    }
}

fn create(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(
        args,
        &[CompletionFlag::value("description", "Namespace description")],
    )?;
    let name = parsed.require_positional(0, "namespace name")?;
    let body = json!({
        "metadata": {
            "name": name,
            "description": parsed.value("description").unwrap_or(""),
        },
        "spec": {},
    });
    session.api()?.post(NAMESPACES_ENDPOINT, &body)?;
    info!(namespace = %name, "Created namespace");
    Ok(CommandResult::line(format!("Created namespace '{}'", name)))
}

fn delete(
    args: &[String],
    session: &mut Session,
    fallback: &str,
) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[])?;
    let name = parsed.require_positional(0, "namespace name")?.to_string();
    let path = format!("{}/cascade_delete", item_path(&name));
    session.api()?.post(&path, &json!({ "name": name }))?;
    info!(namespace = %name, "Deleted namespace");

    let mut result = CommandResult::line(format!("Deleted namespace '{}'", name));
    if session.namespace() == name {
        session.set_namespace(fallback);
        result.push(format!("Active namespace was deleted; switched to '{}'", fallback));
        result = result.with_context_changed();
    }
    Ok(result)
}

fn switch(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[])?;
    let name = parsed.require_positional(0, "namespace name")?.to_string();
    if let Ok(api) = session.api() {
        if let Err(ShellError::ApiNotFound(_)) = api.get(&item_path(&name), &[]) {
            return Err(ShellError::InvalidArguments(format!(
                "namespace '{}' does not exist",
                name
            )));
        }
    }
    session.set_namespace(name.clone());
    Ok(CommandResult::line(format!("Active namespace set to '{}'", name)).with_context_changed())
}
