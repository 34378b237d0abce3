//! The fixed action set of generated API domains.

use super::resource::ResourceType;
use crate::completion::CompletionFlag;

/// Common label keys offered for `--label`
pub const LABEL_KEYS: [&str; 6] = [
    "environment",
    "application",
    "owner",
    "cost-center",
    "tier",
    "version",
];

/// Action verb of a generated command (`xcsh lb list http_loadbalancer`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiAction {
    List,
    Get,
    Create,
    Delete,
    Replace,
    Apply,
    Status,
    Patch,
    AddLabels,
    RemoveLabels,
}

impl ApiAction {
    pub const ALL: [ApiAction; 10] = [
        ApiAction::List,
        ApiAction::Get,
        ApiAction::Create,
        ApiAction::Delete,
        ApiAction::Replace,
        ApiAction::Apply,
        ApiAction::Status,
        ApiAction::Patch,
        ApiAction::AddLabels,
        ApiAction::RemoveLabels,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ApiAction::List => "list",
            ApiAction::Get => "get",
            ApiAction::Create => "create",
            ApiAction::Delete => "delete",
            ApiAction::Replace => "replace",
            ApiAction::Apply => "apply",
            ApiAction::Status => "status",
            ApiAction::Patch => "patch",
            ApiAction::AddLabels => "add-labels",
            ApiAction::RemoveLabels => "remove-labels",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ApiAction::List => "List resources",
            ApiAction::Get => "Show a resource",
            ApiAction::Create => "Create a resource from a file",
            ApiAction::Delete => "Delete a resource",
            ApiAction::Replace => "Replace a resource from a file",
            ApiAction::Apply => "Create or replace a resource from a file",
            ApiAction::Status => "Show resource status",
            ApiAction::Patch => "Merge fields from a file into a resource",
            ApiAction::AddLabels => "Add labels to a resource",
            ApiAction::RemoveLabels => "Remove labels from a resource",
        }
    }

    /// Whether the command expects a resource name argument
    pub fn takes_name(&self) -> bool {
        !matches!(self, ApiAction::List | ApiAction::Create | ApiAction::Apply)
    }

    /// Whether the command reads a JSON body from `--file`
    pub fn takes_file(&self) -> bool {
        matches!(
            self,
            ApiAction::Create | ApiAction::Replace | ApiAction::Apply | ApiAction::Patch
        )
    }

    pub fn takes_labels(&self) -> bool {
        matches!(self, ApiAction::AddLabels | ApiAction::RemoveLabels)
    }

    /// Whether a resource type with these operations supports the action
    pub fn supported_by(&self, resource: &ResourceType) -> bool {
        let ops = &resource.operations;
        match self {
            ApiAction::List => ops.list,
            ApiAction::Get => ops.get,
            ApiAction::Create => ops.create,
            ApiAction::Delete => ops.delete,
            ApiAction::Status => ops.status,
            ApiAction::Apply => ops.create && ops.update,
            ApiAction::Replace | ApiAction::Patch | ApiAction::AddLabels | ApiAction::RemoveLabels => {
                ops.get && ops.update
            }
        }
    }

    pub fn usage(&self) -> String {
        let mut parts = Vec::new();
        if self.takes_name() {
            parts.push("<name>");
        }
        if self.takes_file() {
            parts.push("--file <path>");
        }
        if self.takes_labels() {
            parts.push("--label <key[=value]>...");
        }
        parts.push("[flags]");
        parts.join(" ")
    }

    /// Flags accepted by the action on `resource`
    pub fn flags(&self, resource: &ResourceType) -> Vec<CompletionFlag> {
        let mut flags = Vec::new();
        if resource.supports_namespace {
            flags.push(CompletionFlag::namespace());
        }
        flags.push(CompletionFlag::output_format());
        if self.takes_file() {
            flags.push(
                CompletionFlag::value("file", "JSON file with the resource body")
                    .short('f')
                    .required(),
            );
        }
        if self.takes_labels() {
            flags.push(
                CompletionFlag::value("label", "Label as key=value (repeatable)")
                    .short('l')
                    .values(LABEL_KEYS.iter().map(|k| format!("{}=", k)))
                    .required(),
            );
        }
        flags
    }
}
