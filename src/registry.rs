//! Domain registry: in-memory store of every domain the shell can dispatch to.
//!
//! Built once per process (or per test) and passed by reference to the dispatcher and the
//! completion engine. Custom domains take precedence over generated API domains of the
//! same name; extension commands are merged into the API domain they extend.

mod definition;
mod validate;

pub use definition::{
    ArgumentCompleter, CommandDefinition, CommandHandler, CommandScope, Descriptions,
    DomainDefinition, DomainKind, SubcommandGroup,
};
pub use validate::validate_domain;

use crate::api::ApiDomainSpec;
use crate::completion::Source;
use crate::error::RegistryError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Registry of custom, generated and extension domains
#[derive(Debug, Default)]
pub struct Registry {
    custom: BTreeMap<String, DomainDefinition>,
    generated: BTreeMap<String, DomainDefinition>,
    extensions: BTreeMap<String, Vec<CommandDefinition>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom domain. A second registration under the same name replaces the
    /// first; validation problems are logged, not rejected. Use `try_register` for strict
    /// registration.
    pub fn register(&mut self, domain: DomainDefinition) {
        if let Err(e) = validate_domain(&domain) {
            warn!(domain = %domain.name, error = %e, "Registering domain with validation problem");
        }
        if self.custom.contains_key(&domain.name) {
            warn!(domain = %domain.name, "Domain registered twice; replacing previous definition");
        }
        debug!(domain = %domain.name, "Registered custom domain");
        self.custom.insert(domain.name.clone(), domain);
    }

    /// Register a custom domain, rejecting duplicates and alias conflicts.
    pub fn try_register(&mut self, domain: DomainDefinition) -> Result<(), RegistryError> {
        validate_domain(&domain)?;
        if self.custom.contains_key(&domain.name) {
            return Err(RegistryError::DuplicateDomain(domain.name.clone()));
        }
        if let Some(existing) = self.resolve_name(&domain.name) {
            if existing != domain.name {
                return Err(RegistryError::DomainAliasConflict {
                    domain: domain.name.clone(),
                    alias: domain.name.clone(),
                    existing: existing.to_string(),
                });
            }
        }
        for alias in &domain.aliases {
            if let Some(existing) = self.resolve_name(alias) {
                if existing != domain.name {
                    return Err(RegistryError::DomainAliasConflict {
                        domain: domain.name.clone(),
                        alias: alias.clone(),
                        existing: existing.to_string(),
                    });
                }
            }
        }
        self.custom.insert(domain.name.clone(), domain);
        Ok(())
    }

    /// Register a domain generated from API metadata.
    pub fn register_api(&mut self, spec: ApiDomainSpec) {
        let mut definition = spec.to_definition();
        if let Some(extra) = self.extensions.get(&definition.name) {
            for command in extra {
                merge_extension(&mut definition, command.clone());
            }
        }
        if self.generated.contains_key(&definition.name) {
            warn!(domain = %definition.name, "API domain registered twice; replacing previous definition");
        }
        debug!(
            domain = %definition.name,
            groups = definition.scope.groups.len(),
            "Registered API domain"
        );
        self.generated.insert(definition.name.clone(), definition);
    }

    /// Add a command to a generated API domain. Applied immediately when the domain is
    /// already registered and again whenever it is re-registered.
    pub fn register_extension(&mut self, domain: &str, command: CommandDefinition) {
        let command = command.source(Source::Extension);
        if let Some(definition) = self.generated.get_mut(domain) {
            merge_extension(definition, command.clone());
        }
        self.extensions
            .entry(domain.to_string())
            .or_default()
            .push(command);
    }

    /// Whether a domain (by name or alias) can be dispatched to
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Effective definition for a domain name or alias; custom wins over generated.
    ///
    /// A shadowed generated domain is gone entirely, aliases included: only the aliases
    /// the custom definition declares resolve to it.
    pub fn get(&self, name: &str) -> Option<&DomainDefinition> {
        if let Some(domain) = self.custom.get(name).or_else(|| self.generated.get(name)) {
            return Some(domain);
        }
        self.custom
            .values()
            .chain(
                self.generated
                    .values()
                    .filter(|d| !self.custom.contains_key(&d.name)),
            )
            .find(|d| d.aliases.iter().any(|a| a == name))
    }

    /// Canonical domain name for a name or alias
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|d| d.name.as_str())
    }

    /// Sorted effective domain names
    pub fn list(&self) -> Vec<&str> {
        self.custom
            .keys()
            .chain(self.generated.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Effective domain definitions in name order
    pub fn all(&self) -> Vec<&DomainDefinition> {
        self.list()
            .into_iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// Domains registered both as custom and as generated (custom wins).
    pub fn shadowed(&self) -> Vec<&str> {
        self.custom
            .keys()
            .filter(|name| self.generated.contains_key(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && self.generated.is_empty()
    }
}

fn merge_extension(definition: &mut DomainDefinition, command: CommandDefinition) {
    if definition.scope.groups.contains_key(&command.name) {
        warn!(
            domain = %definition.name,
            command = %command.name,
            "Extension command shadowed by generated action group"
        );
        return;
    }
    definition
        .scope
        .commands
        .insert(command.name.clone(), command);
}
