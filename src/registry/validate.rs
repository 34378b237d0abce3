//! Registration-time validation of domain definitions.

use crate::error::RegistryError;
use crate::registry::definition::{CommandScope, DomainDefinition};
use std::collections::HashMap;

/// Validate every scope of a domain. Returns the first problem found.
pub fn validate_domain(domain: &DomainDefinition) -> Result<(), RegistryError> {
    if domain.name.trim().is_empty() {
        return Err(RegistryError::EmptyName("<root>".to_string()));
    }
    validate_scope(&domain.name, &domain.scope)
}

fn validate_scope(path: &str, scope: &CommandScope) -> Result<(), RegistryError> {
    for name in scope.commands.keys() {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName(path.to_string()));
        }
        if scope.groups.contains_key(name) {
            return Err(RegistryError::GroupCommandCollision {
                scope: path.to_string(),
                name: name.clone(),
            });
        }
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for command in scope.commands.values() {
        for alias in &command.aliases {
            if scope.commands.contains_key(alias) || scope.groups.contains_key(alias) {
                return Err(RegistryError::AliasShadowsCommand {
                    scope: path.to_string(),
                    alias: alias.clone(),
                    command: command.name.clone(),
                });
            }
            if let Some(existing) = seen.insert(alias.as_str(), command.name.as_str()) {
                return Err(RegistryError::DuplicateAlias {
                    scope: path.to_string(),
                    alias: alias.clone(),
                    command: command.name.clone(),
                    existing: existing.to_string(),
                });
            }
        }
    }

    for group in scope.groups.values() {
        if group.name.trim().is_empty() {
            return Err(RegistryError::EmptyName(path.to_string()));
        }
        validate_scope(&format!("{} {}", path, group.name), &group.scope)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::CommandResult;
    use crate::registry::definition::{CommandDefinition, SubcommandGroup};

    fn noop(name: &str) -> CommandDefinition {
        CommandDefinition::new(name, |_, _| Ok(CommandResult::ok()))
    }

    #[test]
    fn test_valid_domain_passes() {
        let domain = DomainDefinition::new("namespace")
            .command(noop("list").alias("ls"))
            .command(noop("delete").alias("rm"))
            .group(SubcommandGroup::new("labels").command(noop("list").alias("ls")));
        assert!(validate_domain(&domain).is_ok());
    }

    #[test]
    fn test_alias_shadowing_sibling_is_rejected() {
        let domain = DomainDefinition::new("namespace")
            .command(noop("list").alias("get"))
            .command(noop("get"));
        assert!(matches!(
            validate_domain(&domain),
            Err(RegistryError::AliasShadowsCommand { .. })
        ));
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let domain = DomainDefinition::new("namespace")
            .command(noop("list").alias("l"))
            .command(noop("lookup").alias("l"));
        let err = validate_domain(&domain).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateAlias {
                scope: "namespace".to_string(),
                alias: "l".to_string(),
                command: "lookup".to_string(),
                existing: "list".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_scope_path_in_error() {
        let domain = DomainDefinition::new("login").group(
            SubcommandGroup::new("context")
                .command(noop("set").alias("show"))
                .command(noop("show")),
        );
        match validate_domain(&domain) {
            Err(RegistryError::AliasShadowsCommand { scope, .. }) => {
                assert_eq!(scope, "login context")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_group_command_collision() {
        let domain = DomainDefinition::new("login")
            .command(noop("context"))
            .group(SubcommandGroup::new("context"));
        assert!(matches!(
            validate_domain(&domain),
            Err(RegistryError::GroupCommandCollision { .. })
        ));
    }
}
