//! Generic handlers shared by every generated command.

use super::action::ApiAction;
use super::resource::ResourceType;
use crate::dispatch::{help, CommandResult, ParsedArgs};
use crate::error::ShellError;
use crate::session::Session;
use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Output rendering for API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Text,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, ShellError> {
        match value {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "text" => Ok(OutputFormat::Text),
            other => Err(ShellError::InvalidArguments(format!(
                "unknown output format '{}' (expected json, table or text)",
                other
            ))),
        }
    }
}

/// Run `action` on `resource`. `path` is the canonical command path for help output.
pub fn run_action(
    action: ApiAction,
    resource: &ResourceType,
    path: &[String],
    args: &[String],
    session: &mut Session,
) -> Result<CommandResult, ShellError> {
    let flags = action.flags(resource);
    let parsed = ParsedArgs::parse(args, &flags)?;
    if parsed.help() {
        return Ok(CommandResult::lines(usage_lines(action, resource, path)));
    }

    let namespace = parsed
        .value("namespace")
        .unwrap_or(session.namespace())
        .to_string();
    let default_format = if action == ApiAction::List { "table" } else { "json" };
    let format = OutputFormat::parse(parsed.value("output-format").unwrap_or(default_format))?;
    let api = session.api()?;
    debug!(action = action.name(), resource = %resource.name, %namespace, "Running API action");

    match action {
        ApiAction::List => {
            let response = api.get(&resource.collection_path(&namespace), &[])?;
            Ok(render_list(&response, format))
        }
        ApiAction::Get => {
            let name = parsed.require_positional(0, "resource name")?;
            let response = api.get(&resource.item_path(&namespace, name), &[])?;
            Ok(render_object(&response, format))
        }
        ApiAction::Status => {
            let name = parsed.require_positional(0, "resource name")?;
            let response = api.get(&resource.item_path(&namespace, name), &[])?;
            let status = response.get("status").cloned().unwrap_or(Value::Null);
            Ok(render_object(&status, format))
        }
        ApiAction::Create => {
            let body = read_body(parsed.require_value("file")?, resource, &namespace)?;
            let response = api.post(&resource.collection_path(&namespace), &body)?;
            info!(resource = %resource.name, name = %object_name(&body), "Created resource");
            Ok(summary(&response, "Created", resource, &body))
        }
        ApiAction::Replace => {
            let name = parsed.require_positional(0, "resource name")?;
            let mut body = read_body(parsed.require_value("file")?, resource, &namespace)?;
            set_metadata(&mut body, "name", Value::String(name.to_string()));
            let response = api.put(&resource.item_path(&namespace, name), &body)?;
            Ok(summary(&response, "Replaced", resource, &body))
        }
        ApiAction::Apply => {
            let body = read_body(parsed.require_value("file")?, resource, &namespace)?;
            let name = object_name(&body);
            if name.is_empty() {
                return Err(ShellError::InvalidArguments(
                    "metadata.name is required in the file".to_string(),
                ));
            }
            let item = resource.item_path(&namespace, &name);
            match api.get(&item, &[]) {
                Ok(_) => {
                    let response = api.put(&item, &body)?;
                    Ok(summary(&response, "Replaced", resource, &body))
                }
                Err(ShellError::ApiNotFound(_)) => {
                    let response = api.post(&resource.collection_path(&namespace), &body)?;
                    Ok(summary(&response, "Created", resource, &body))
                }
                Err(e) => Err(e),
            }
        }
        ApiAction::Delete => {
            let name = parsed.require_positional(0, "resource name")?;
            api.delete(&resource.item_path(&namespace, name))?;
            info!(resource = %resource.name, %name, "Deleted resource");
            Ok(CommandResult::line(format!(
                "Deleted {} '{}' in namespace '{}'",
                resource.name, name, namespace
            )))
        }
        ApiAction::Patch => {
            let name = parsed.require_positional(0, "resource name")?;
            let patch = read_json(parsed.require_value("file")?)?;
            let item = resource.item_path(&namespace, name);
            let mut current = api.get(&item, &[])?;
            merge_json(&mut current, &patch);
            let response = api.put(&item, &current)?;
            Ok(summary(&response, "Patched", resource, &current))
        }
        ApiAction::AddLabels | ApiAction::RemoveLabels => {
            let name = parsed.require_positional(0, "resource name")?;
            let labels = parsed.values("label");
            if labels.is_empty() {
                return Err(ShellError::InvalidArguments("--label is required".to_string()));
            }
            let item = resource.item_path(&namespace, name);
            let mut current = api.get(&item, &[])?;
            apply_labels(&mut current, labels, action == ApiAction::AddLabels)?;
            let response = api.put(&item, &current)?;
            let verb = if action == ApiAction::AddLabels {
                "Labeled"
            } else {
                "Unlabeled"
            };
            Ok(summary(&response, verb, resource, &current))
        }
    }
}

fn usage_lines(action: ApiAction, resource: &ResourceType, path: &[String]) -> Vec<String> {
    let command = crate::registry::CommandDefinition::new(&resource.name, |_, _| Ok(CommandResult::ok()))
        .description(format!("{}: {}", action.description(), resource.summary()))
        .usage(action.usage());
    let command = action
        .flags(resource)
        .into_iter()
        .fold(command, |c, f| c.flag(f));
    let path: Vec<&str> = path.iter().map(String::as_str).collect();
    help::render_command(&path, &command)
}

fn read_json(path: &str) -> Result<Value, ShellError> {
    let content = fs::read_to_string(Path::new(path))?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a resource body and default `metadata.namespace` for namespaced types.
fn read_body(path: &str, resource: &ResourceType, namespace: &str) -> Result<Value, ShellError> {
    let mut body = read_json(path)?;
    if !body.is_object() {
        return Err(ShellError::InvalidArguments(format!(
            "{} must contain a JSON object",
            path
        )));
    }
    if resource.supports_namespace
        && body
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
            .is_none()
    {
        set_metadata(&mut body, "namespace", Value::String(namespace.to_string()));
    }
    Ok(body)
}

fn set_metadata(body: &mut Value, key: &str, value: Value) {
    if let Some(object) = body.as_object_mut() {
        let metadata = object
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert(key.to_string(), value);
        }
    }
}

fn object_name(body: &Value) -> String {
    body.pointer("/metadata/name")
        .or_else(|| body.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Recursive object merge; non-object values in `patch` replace those in `target`.
pub fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

fn apply_labels(body: &mut Value, labels: &[String], add: bool) -> Result<(), ShellError> {
    set_metadata_default_labels(body);
    let Some(map) = body
        .pointer_mut("/metadata/labels")
        .and_then(Value::as_object_mut)
    else {
        return Err(ShellError::Handler("resource has no metadata".to_string()));
    };
    for label in labels {
        if add {
            let (key, value) = label.split_once('=').ok_or_else(|| {
                ShellError::InvalidArguments(format!("label '{}' must be key=value", label))
            })?;
            map.insert(key.to_string(), Value::String(value.to_string()));
        } else {
            let key = label.split_once('=').map(|(k, _)| k).unwrap_or(label);
            map.remove(key);
        }
    }
    Ok(())
}

fn set_metadata_default_labels(body: &mut Value) {
    let has_labels = body
        .pointer("/metadata/labels")
        .map(Value::is_object)
        .unwrap_or(false);
    if !has_labels {
        set_metadata(body, "labels", Value::Object(Map::new()));
    }
}

/// Names and namespaces from a list response.
pub fn list_items(response: &Value) -> Vec<(String, String)> {
    response
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let name = item
                        .get("name")
                        .or_else(|| item.pointer("/metadata/name"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    let namespace = item
                        .get("namespace")
                        .or_else(|| item.pointer("/metadata/namespace"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    (name.to_string(), namespace.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn render_list(response: &Value, format: OutputFormat) -> CommandResult {
    match format {
        OutputFormat::Json => render_object(response, format),
        OutputFormat::Text => CommandResult::lines(list_items(response).into_iter().map(|(name, _)| name)),
        OutputFormat::Table => {
            let items = list_items(response);
            if items.is_empty() {
                return CommandResult::line("No resources found.");
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["NAME", "NAMESPACE"]);
            for (name, namespace) in items {
                table.add_row(vec![name, namespace]);
            }
            CommandResult::lines(table.to_string().lines().map(str::to_string))
        }
    }
}

fn render_object(value: &Value, format: OutputFormat) -> CommandResult {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            CommandResult::lines(text.lines().map(str::to_string))
        }
        OutputFormat::Text => match value {
            Value::Object(map) => CommandResult::lines(
                map.iter()
                    .map(|(k, v)| format!("{}: {}", k, compact(v))),
            ),
            other => CommandResult::line(compact(other)),
        },
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn summary(response: &Value, verb: &str, resource: &ResourceType, body: &Value) -> CommandResult {
    let name = {
        let from_response = object_name(response);
        if from_response.is_empty() {
            object_name(body)
        } else {
            from_response
        }
    };
    CommandResult::line(format!("{} {} '{}'", verb, resource.name, name))
}
