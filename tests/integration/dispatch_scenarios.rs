//! Dispatch behavior through the public API.

use super::test_utils::{fixture_registry, words};
use parking_lot::Mutex;
use std::sync::Arc;
use xcsh::dispatch::{CommandResult, Dispatcher};
use xcsh::registry::{CommandDefinition, DomainDefinition, Registry, SubcommandGroup};
use xcsh::session::Session;

#[test]
fn test_namespace_list_has_no_error() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute("namespace", &words(&["list"]), &mut session);
    assert!(result.error.is_none());
    assert_eq!(result.output, vec!["list() in default"]);
}

#[test]
fn test_bogus_command_names_domain_and_hints() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute("namespace", &words(&["bogus"]), &mut session);
    assert_eq!(result.error.as_deref(), Some("Unknown command"));
    let text = result.output.join("\n");
    assert!(text.contains("namespace"));
    assert!(text.contains("bogus"));
    assert!(text.contains("Run 'namespace'"));
}

#[test]
fn test_group_command_receives_remaining_args() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let captured = Arc::clone(&seen);
    let mut registry = Registry::new();
    registry.register(DomainDefinition::new("login").group(
        SubcommandGroup::new("context").command(CommandDefinition::new("set", move |args, _| {
            *captured.lock() = args.to_vec();
            Ok(CommandResult::ok())
        })),
    ));
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute(
        "login",
        &words(&["context", "set", "prod"]),
        &mut session,
    );
    assert!(result.error.is_none());
    assert_eq!(*seen.lock(), vec!["prod"]);
}

#[test]
fn test_unknown_domain_is_structured_error() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute("subscription", &[], &mut session);
    assert_eq!(result.error.as_deref(), Some("Unknown domain"));
    assert!(!result.should_exit);
}

#[test]
fn test_default_command_and_help_at_group_level() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let dispatcher = Dispatcher::new(&registry);

    let status = dispatcher.execute("login", &[], &mut session);
    assert_eq!(status.output, vec!["status() in default"]);

    let group_help = dispatcher.execute("login", &words(&["context"]), &mut session);
    assert!(group_help.error.is_none());
    assert!(group_help.output[0].starts_with("login context"));
    assert!(group_help.output.iter().any(|l| l.contains("set")));
}

#[test]
fn test_context_change_is_signalled() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute(
        "login",
        &words(&["context", "use", "staging"]),
        &mut session,
    );
    assert!(result.context_changed);
    assert_eq!(session.namespace(), "staging");
}

#[test]
fn test_domain_alias_dispatches_three_levels_deep() {
    let registry = fixture_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute(
        "st",
        &words(&["aws", "vpc", "create", "edge"]),
        &mut session,
    );
    assert_eq!(result.output, vec!["create(edge) in default"]);
}

#[test]
fn test_try_register_rejects_sibling_alias_shadowing() {
    let mut registry = Registry::new();
    let err = registry
        .try_register(
            DomainDefinition::new("namespace")
                .command(CommandDefinition::new("list", |_, _| Ok(CommandResult::ok())))
                .command(
                    CommandDefinition::new("get", |_, _| Ok(CommandResult::ok())).alias("list"),
                ),
        )
        .unwrap_err();
    assert!(err.to_string().contains("shadows"));
}
