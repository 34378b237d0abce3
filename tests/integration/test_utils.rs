//! Shared fixtures: an in-memory management API and small registries.

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use xcsh::api::ManagementApi;
use xcsh::config::CompletionConfig;
use xcsh::dispatch::CommandResult;
use xcsh::error::ShellError;
use xcsh::registry::{CommandDefinition, DomainDefinition, Registry, SubcommandGroup};
use xcsh::values::DynamicValueProvider;

/// Records every call; answers list and item reads from a fixed namespace set.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
}

impl ManagementApi for FakeApi {
    fn get(&self, path: &str, _query: &[(&str, &str)]) -> Result<Value, ShellError> {
        self.calls.lock().push(format!("GET {}", path));
        match path {
            "/api/web/namespaces" => Ok(json!({
                "items": [{ "name": "default" }, { "name": "prod" }, { "name": "system" }]
            })),
            p if p.ends_with("/http_loadbalancers") => Ok(json!({
                "items": [{ "name": "frontend", "namespace": "prod" }]
            })),
            "/api/web/namespaces/prod" => Ok(json!({ "metadata": { "name": "prod" } })),
            _ => Err(ShellError::ApiNotFound(path.to_string())),
        }
    }

    fn post(&self, path: &str, _body: &Value) -> Result<Value, ShellError> {
        self.calls.lock().push(format!("POST {}", path));
        Ok(json!({}))
    }

    fn put(&self, path: &str, _body: &Value) -> Result<Value, ShellError> {
        self.calls.lock().push(format!("PUT {}", path));
        Ok(json!({}))
    }

    fn delete(&self, path: &str) -> Result<Value, ShellError> {
        self.calls.lock().push(format!("DELETE {}", path));
        Ok(json!({}))
    }
}

pub fn words(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

pub fn offline_values() -> Arc<DynamicValueProvider> {
    Arc::new(DynamicValueProvider::offline(&CompletionConfig::default()))
}

/// Handler echoing its name, arguments and the session namespace.
pub fn echo(name: &str) -> CommandDefinition {
    let label = name.to_string();
    CommandDefinition::new(name, move |args, session| {
        Ok(CommandResult::line(format!(
            "{}({}) in {}",
            label,
            args.join(","),
            session.namespace()
        )))
    })
}

/// Handler that switches the session namespace to its first argument.
pub fn switch_namespace(name: &str) -> CommandDefinition {
    CommandDefinition::new(name, |args, session| {
        if let Some(ns) = args.first() {
            session.set_namespace(ns.clone());
        }
        Ok(CommandResult::line(format!("now {}", session.namespace())).with_context_changed())
    })
}

/// Two-level registry with aliases, groups and a default command.
pub fn fixture_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(
        DomainDefinition::new("namespace")
            .description("Manage namespaces")
            .command(echo("list").alias("ls"))
            .command(echo("get"))
            .command(echo("create").alias("new"))
            .command(echo("delete").alias("rm"))
            .command(switch_namespace("use").alias("set")),
    );
    registry.register(
        DomainDefinition::new("login")
            .description("Connection context")
            .default_command(echo("status"))
            .command(echo("status"))
            .group(
                SubcommandGroup::new("context")
                    .command(switch_namespace("set").alias("use"))
                    .command(echo("show")),
            )
            .group(SubcommandGroup::new("profile").command(echo("show").alias("info"))),
    );
    registry.register(
        DomainDefinition::new("site")
            .alias("st")
            .group(
                SubcommandGroup::new("aws")
                    .group(SubcommandGroup::new("vpc").command(echo("create")).command(echo("delete")))
                    .command(echo("list")),
            ),
    );
    registry
}
