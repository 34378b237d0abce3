//! API domain metadata and its executable form.

use super::action::ApiAction;
use super::handlers;
use super::resource::ResourceType;
use crate::completion::{CompletionContext, Source, Suggestion, SuggestionCategory};
use crate::registry::{ArgumentCompleter, CommandDefinition, DomainDefinition, DomainKind, SubcommandGroup};
use futures::FutureExt;
use std::sync::Arc;

/// A domain generated from resource-type metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDomainSpec {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub resources: Vec<ResourceType>,
}

impl ApiDomainSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            aliases: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn resource(mut self, resource: ResourceType) -> Self {
        self.resources.push(resource);
        self
    }

    /// Actions supported by at least one resource type, in canonical order.
    pub fn actions(&self) -> Vec<ApiAction> {
        ApiAction::ALL
            .iter()
            .copied()
            .filter(|a| self.resources.iter().any(|r| a.supported_by(r)))
            .collect()
    }

    pub fn resources_for(&self, action: ApiAction) -> Vec<&ResourceType> {
        self.resources
            .iter()
            .filter(|r| action.supported_by(r))
            .collect()
    }

    pub fn find_resource(&self, name: &str) -> Option<&ResourceType> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Executable definition: one group per action, one command per resource type.
    pub fn to_definition(&self) -> DomainDefinition {
        let mut domain = DomainDefinition::new(&self.name).description(&self.description);
        domain.aliases = self.aliases.clone();
        domain.kind = DomainKind::Api(Arc::new(self.clone()));

        for action in self.actions() {
            let mut group = SubcommandGroup::new(action.name()).description(action.description());
            for resource in self.resources_for(action) {
                group = group.command(generated_command(&self.name, action, resource));
            }
            domain = domain.group(group);
        }
        domain
    }
}

fn generated_command(domain: &str, action: ApiAction, resource: &ResourceType) -> CommandDefinition {
    let path = vec![
        domain.to_string(),
        action.name().to_string(),
        resource.name.clone(),
    ];
    let target = resource.clone();
    let mut command = CommandDefinition::new(&resource.name, move |args, session| {
        handlers::run_action(action, &target, &path, args, session)
    })
    .description(resource.summary())
    .usage(action.usage())
    .source(Source::Api);
    for flag in action.flags(resource) {
        command = command.flag(flag);
    }
    if action.takes_name() {
        command = command.completer(resource_name_completer(resource.clone()));
    }
    command
}

/// Completes the resource-name argument with live names from the API.
pub fn resource_name_completer(resource: ResourceType) -> ArgumentCompleter {
    let resource = Arc::new(resource);
    Arc::new(move |ctx: CompletionContext| {
        let resource = Arc::clone(&resource);
        async move {
            if !ctx.args.is_empty() {
                return Vec::new();
            }
            let namespace = ctx.effective_namespace().to_string();
            ctx.values
                .resource_names(&resource, &namespace)
                .await
                .into_iter()
                .map(|name| Suggestion::new(name, &resource.description, SuggestionCategory::Value))
                .collect::<Vec<Suggestion>>()
        }
        .boxed()
    })
}
