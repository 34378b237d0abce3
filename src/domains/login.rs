//! `login` domain: connection status, session context and the active profile.

use crate::completion::{CompletionContext, CompletionFlag, Suggestion, SuggestionCategory};
use crate::config::ApiConfig;
use crate::dispatch::{CommandResult, ParsedArgs};
use crate::error::ShellError;
use crate::registry::{CommandDefinition, DomainDefinition, SubcommandGroup};
use crate::session::Session;
use futures::FutureExt;
use std::sync::Arc;

const MASK: &str = "********";

pub fn domain(api: &ApiConfig) -> DomainDefinition {
    let status_config = api.clone();
    let profile_config = api.clone();
    let status_command =
        CommandDefinition::new("status", move |_, session| Ok(status(&status_config, session)))
            .description("Show the connection summary");
    DomainDefinition::new("login")
        .description("Connection status, context and profile")
        .default_command(status_command.clone())
        .command(status_command)
        .group(
            SubcommandGroup::new("context")
                .description("Session context")
                .command(
                    CommandDefinition::new("set", set_context)
                        .description("Set the active namespace")
                        .usage("<namespace>")
                        .completer(Arc::new(|ctx: CompletionContext| {
                            async move {
                                if !ctx.args.is_empty() {
                                    return Vec::new();
                                }
                                ctx.values
                                    .namespaces()
                                    .await
                                    .into_iter()
                                    .map(|ns| Suggestion::new(ns, "namespace", SuggestionCategory::Value))
                                    .collect::<Vec<Suggestion>>()
                            }
                            .boxed()
                        })),
                )
                .command(
                    CommandDefinition::new("show", |_, session| Ok(show_context(session)))
                        .description("Show namespace, tenant and navigation context"),
                ),
        )
        .group(
            SubcommandGroup::new("profile")
                .description("Connection profile")
                .command(
                    CommandDefinition::new("show", move |args, session| {
                        show_profile(&profile_config, args, session)
                    })
                    .description("Show the active connection profile")
                    .usage("[--show-sensitive]")
                    .flag(CompletionFlag::switch(
                        "show-sensitive",
                        "Show the API token in plain text",
                    )),
                ),
        )
}

fn status(config: &ApiConfig, session: &Session) -> CommandResult {
    match &config.url {
        Some(url) => CommandResult::lines([
            format!("Connected to {}", url),
            format!("Tenant:    {}", session.tenant().unwrap_or("-")),
            format!("Namespace: {}", session.namespace()),
            format!(
                "Token:     {}",
                if config.token.is_some() { "set" } else { "missing" }
            ),
        ]),
        None => CommandResult::lines([
            "Not connected: no API URL configured".to_string(),
            "Set XCSH_API_URL and XCSH_API_TOKEN, or add an [api] section to the config file"
                .to_string(),
            format!("Namespace: {}", session.namespace()),
        ]),
    }
}

fn set_context(args: &[String], session: &mut Session) -> Result<CommandResult, ShellError> {
    let parsed = ParsedArgs::parse(args, &[])?;
    let namespace = parsed.require_positional(0, "namespace")?.to_string();
    session.set_namespace(namespace.clone());
    Ok(CommandResult::line(format!("Context namespace set to '{}'", namespace)).with_context_changed())
}

fn show_context(session: &Session) -> CommandResult {
    CommandResult::lines([
        format!("Namespace: {}", session.namespace()),
        format!("Tenant:    {}", session.tenant().unwrap_or("-")),
        format!("Context:   {}", session.context()),
    ])
}

fn show_profile(
    config: &ApiConfig,
    args: &[String],
    session: &Session,
) -> Result<CommandResult, ShellError> {
    let flags = [CompletionFlag::switch("show-sensitive", "")];
    let parsed = ParsedArgs::parse(args, &flags)?;
    let token = match &config.token {
        Some(token) if parsed.switch("show-sensitive") => token.clone(),
        Some(_) => MASK.to_string(),
        None => "-".to_string(),
    };
    Ok(CommandResult::lines([
        format!("API URL:           {}", config.url.as_deref().unwrap_or("-")),
        format!("API token:         {}", token),
        format!("Tenant:            {}", session.tenant().unwrap_or("-")),
        format!("Default namespace: {}", config.default_namespace),
    ]))
}
