//! Builds the completion tree from the registry.
//!
//! Custom domains are walked through their command scopes; API domains are built from
//! their action and resource-type metadata. Both feed the same node shape, so the engine
//! never branches on where a node came from.

use super::node::{CompletionNode, NodeKind, Source};
use crate::api::{self, ApiDomainSpec};
use crate::registry::{
    CommandDefinition, CommandScope, DomainDefinition, DomainKind, Registry, SubcommandGroup,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Completion nodes for every effective domain, keyed by canonical name
#[derive(Debug, Clone, Default)]
pub struct CompletionTree {
    roots: BTreeMap<String, CompletionNode>,
}

impl CompletionTree {
    pub fn build(registry: &Registry) -> Self {
        let roots: BTreeMap<String, CompletionNode> = registry
            .all()
            .into_iter()
            .map(|domain| (domain.name.clone(), domain_node(domain)))
            .collect();
        debug!(
            domains = roots.len(),
            nodes = roots.values().map(CompletionNode::size).sum::<usize>(),
            "Built completion tree"
        );
        Self { roots }
    }

    /// Domain node by canonical name or alias
    pub fn get(&self, name: &str) -> Option<&CompletionNode> {
        self.roots
            .get(name)
            .or_else(|| self.roots.values().find(|d| d.aliases.iter().any(|a| a == name)))
    }

    pub fn domains(&self) -> impl Iterator<Item = &CompletionNode> {
        self.roots.values()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Completion node for any domain
pub fn domain_node(domain: &DomainDefinition) -> CompletionNode {
    match &domain.kind {
        DomainKind::Custom => custom_domain_node(domain),
        DomainKind::Api(spec) => api_domain_node(domain, spec),
    }
}

/// Node for a hand-authored domain, mirroring its command scopes.
pub fn custom_domain_node(domain: &DomainDefinition) -> CompletionNode {
    let mut node = CompletionNode::new(&domain.name, NodeKind::Domain, Source::Custom)
        .with_description(&domain.descriptions.short);
    node.aliases = domain.aliases.clone();
    node.children = scope_children(&domain.scope, Source::Custom);
    node
}

/// Node for a generated domain, built from action and resource metadata. Extension
/// commands merged into the domain are added next to the action groups.
pub fn api_domain_node(domain: &DomainDefinition, spec: &ApiDomainSpec) -> CompletionNode {
    let mut node = CompletionNode::new(&domain.name, NodeKind::Domain, Source::Api)
        .with_description(&spec.description);
    node.aliases = domain.aliases.clone();

    for action in spec.actions() {
        let mut group = CompletionNode::new(action.name(), NodeKind::Group, Source::Api)
            .with_description(action.description());
        for resource in spec.resources_for(action) {
            let mut command = CompletionNode::new(&resource.name, NodeKind::Command, Source::Api)
                .with_description(resource.summary());
            command.flags = action.flags(resource);
            if action.takes_name() {
                command.completer = Some(api::resource_name_completer(resource.clone()));
            }
            group.insert_child(command);
        }
        node.insert_child(group);
    }

    for command in domain.scope.commands.values() {
        if node.children.contains_key(&command.name) {
            continue;
        }
        node.insert_child(command_node(command));
    }
    node
}

fn scope_children(scope: &CommandScope, source: Source) -> BTreeMap<String, CompletionNode> {
    let mut children = BTreeMap::new();
    for command in scope.commands.values() {
        // groups win over same-named commands, as in dispatch
        if scope.groups.contains_key(&command.name) {
            continue;
        }
        children.insert(command.name.clone(), command_node(command));
    }
    for group in scope.groups.values() {
        children.insert(group.name.clone(), group_node(group, source));
    }
    children
}

fn group_node(group: &SubcommandGroup, source: Source) -> CompletionNode {
    let mut node = CompletionNode::new(&group.name, NodeKind::Group, source)
        .with_description(&group.descriptions.short);
    node.children = scope_children(&group.scope, source);
    node
}

fn command_node(command: &CommandDefinition) -> CompletionNode {
    let mut node = CompletionNode::new(&command.name, NodeKind::Command, command.source)
        .with_description(&command.descriptions.short);
    node.aliases = command.aliases.clone();
    node.flags = command.flags.clone();
    node.hidden = command.hidden;
    node.completer = command.completer.clone();
    node
}
