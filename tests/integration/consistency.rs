//! Dispatch/completion consistency and alias equivalence properties.

use super::test_utils::{fixture_registry, offline_values, words};
use proptest::prelude::*;
use std::collections::BTreeSet;
use xcsh::completion::CompletionEngine;
use xcsh::config::XcshConfig;
use xcsh::dispatch::{resolve, Dispatcher, Resolution};
use xcsh::domains::builtin_registry;
use xcsh::registry::{CommandScope, Registry};
use xcsh::session::Session;

/// Every scope reachable by typing group names: (domain, group path).
fn scopes(registry: &Registry) -> Vec<(String, Vec<String>)> {
    fn walk(domain: &str, path: Vec<String>, scope: &CommandScope, out: &mut Vec<(String, Vec<String>)>) {
        out.push((domain.to_string(), path.clone()));
        for group in scope.groups.values() {
            let mut next = path.clone();
            next.push(group.name.clone());
            walk(domain, next, &group.scope, out);
        }
    }
    let mut out = Vec::new();
    for domain in registry.all() {
        walk(&domain.name, Vec::new(), &domain.scope, &mut out);
    }
    out
}

/// Every name and alias anywhere in the registry.
fn vocabulary(registry: &Registry) -> Vec<String> {
    fn walk(scope: &CommandScope, out: &mut BTreeSet<String>) {
        for command in scope.commands.values() {
            out.insert(command.name.clone());
            out.extend(command.aliases.iter().cloned());
        }
        for group in scope.groups.values() {
            out.insert(group.name.clone());
            walk(&group.scope, out);
        }
    }
    let mut out = BTreeSet::new();
    for domain in registry.all() {
        walk(&domain.scope, &mut out);
    }
    out.insert("help".to_string());
    out.into_iter().collect()
}

fn accepted(registry: &Registry, domain: &str, prefix: &[String], token: &str) -> bool {
    let Some(definition) = registry.get(domain) else {
        return false;
    };
    let mut args = prefix.to_vec();
    args.push(token.to_string());
    !matches!(
        resolve(
            &definition.scope,
            &definition.descriptions,
            vec![definition.name.as_str()],
            &args
        ),
        Resolution::Unknown { .. }
    )
}

fn suggested(registry: &Registry, runtime: &tokio::runtime::Runtime, domain: &str, prefix: &[String]) -> BTreeSet<String> {
    let engine = CompletionEngine::new(registry, offline_values());
    let session = Session::default();
    runtime
        .block_on(engine.complete(domain, prefix, "", &session))
        .into_iter()
        .map(|s| s.text)
        .collect()
}

fn check_consistency(registry: Registry) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let scopes = scopes(&registry);
    let vocabulary = vocabulary(&registry);
    let token = prop_oneof![
        proptest::sample::select(vocabulary),
        "[a-z_]{1,10}".prop_map(String::from),
    ];
    let mut runner = proptest::test_runner::TestRunner::default();
    runner
        .run(
            &(proptest::sample::select(scopes), token),
            |((domain, prefix), token)| {
                let suggestions = suggested(&registry, &runtime, &domain, &prefix);
                prop_assert_eq!(
                    suggestions.contains(&token),
                    accepted(&registry, &domain, &prefix, &token),
                    "{} {:?} next {:?}",
                    domain,
                    prefix,
                    token
                );
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_completion_matches_dispatch_on_fixture() {
    check_consistency(fixture_registry());
}

#[test]
fn test_completion_matches_dispatch_on_builtin_registry() {
    check_consistency(builtin_registry(&XcshConfig::default(), offline_values()));
}

#[test]
fn test_every_suggested_scope_token_is_dispatchable() {
    let registry = fixture_registry();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    for (domain, prefix) in scopes(&registry) {
        for token in suggested(&registry, &runtime, &domain, &prefix) {
            assert!(
                accepted(&registry, &domain, &prefix, &token),
                "{} {:?} suggests {} but dispatch rejects it",
                domain,
                prefix,
                token
            );
        }
    }
}

proptest! {
    #[test]
    fn prop_alias_and_name_are_equivalent(
        pair in proptest::sample::select(vec![
            ("namespace", vec![], "list", "ls"),
            ("namespace", vec![], "delete", "rm"),
            ("namespace", vec![], "use", "set"),
            ("login", vec!["context"], "set", "use"),
            ("login", vec!["profile"], "show", "info"),
        ]),
        rest in proptest::collection::vec("[a-z0-9-]{1,8}", 0..4),
    ) {
        let (domain, group, name, alias) = pair;
        let registry = fixture_registry();
        let dispatcher = Dispatcher::new(&registry);

        let mut by_name_args = words(&group);
        by_name_args.push(name.to_string());
        by_name_args.extend(rest.iter().cloned());
        let mut by_alias_args = words(&group);
        by_alias_args.push(alias.to_string());
        by_alias_args.extend(rest.iter().cloned());

        let mut name_session = Session::default();
        let mut alias_session = Session::default();
        let by_name = dispatcher.execute(domain, &by_name_args, &mut name_session);
        let by_alias = dispatcher.execute(domain, &by_alias_args, &mut alias_session);

        prop_assert_eq!(by_name, by_alias);
        prop_assert_eq!(name_session.namespace(), alias_session.namespace());
    }
}
