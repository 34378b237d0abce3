//! Custom domains win over generated ones in dispatch and in completion.

use super::test_utils::{echo, offline_values, words};
use xcsh::api::{ApiDomainSpec, ResourceType};
use xcsh::completion::{CompletionEngine, CompletionTree, Source};
use xcsh::dispatch::Dispatcher;
use xcsh::registry::{DomainDefinition, Registry};
use xcsh::session::Session;

fn lb_spec() -> ApiDomainSpec {
    ApiDomainSpec::new("load_balancer", "Load balancing")
        .alias("lb")
        .resource(ResourceType::namespaced(
            "http_loadbalancer",
            "HTTP load balancer",
            "/api/config/namespaces/{namespace}/http_loadbalancers",
        ))
}

fn shadowed_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_api(lb_spec());
    registry.register(
        DomainDefinition::new("load_balancer")
            .description("Hand-written load balancer tools")
            .command(echo("wizard")),
    );
    registry
}

#[test]
fn test_dispatch_resolves_custom_version() {
    let registry = shadowed_registry();
    let mut session = Session::default();
    let dispatcher = Dispatcher::new(&registry);

    let custom = dispatcher.execute("load_balancer", &words(&["wizard"]), &mut session);
    assert_eq!(custom.output, vec!["wizard() in default"]);

    let generated = dispatcher.execute(
        "load_balancer",
        &words(&["list", "http_loadbalancer"]),
        &mut session,
    );
    assert_eq!(generated.error.as_deref(), Some("Unknown command"));
}

#[tokio::test]
async fn test_completion_resolves_custom_version() {
    let registry = shadowed_registry();
    let tree = CompletionTree::build(&registry);
    let node = tree.get("load_balancer").unwrap();
    assert_eq!(node.source, Source::Custom);
    assert!(node.children.contains_key("wizard"));
    assert!(!node.children.contains_key("list"));

    let engine = CompletionEngine::new(&registry, offline_values());
    let texts: Vec<String> = engine
        .complete("load_balancer", &[], "", &Session::default())
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(texts, vec!["help", "wizard"]);
}

#[tokio::test]
async fn test_shadowed_alias_agrees_in_dispatch_and_completion() {
    let registry = shadowed_registry();
    let mut session = Session::default();
    let result = Dispatcher::new(&registry).execute(
        "lb",
        &words(&["list", "http_loadbalancer"]),
        &mut session,
    );
    assert_eq!(result.error.as_deref(), Some("Unknown domain"));

    assert!(CompletionTree::build(&registry).get("lb").is_none());
    let engine = CompletionEngine::new(&registry, offline_values());
    assert!(engine
        .complete("lb", &[], "", &Session::default())
        .await
        .is_empty());
    let domains: Vec<String> = engine
        .complete_domains("l")
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(domains, vec!["load_balancer"]);
}

#[tokio::test]
async fn test_custom_alias_replaces_shadowed_alias() {
    let mut registry = Registry::new();
    registry.register_api(lb_spec());
    registry.register(
        DomainDefinition::new("load_balancer")
            .alias("lb")
            .command(echo("wizard")),
    );
    let mut session = Session::default();
    let custom = Dispatcher::new(&registry).execute("lb", &words(&["wizard"]), &mut session);
    assert_eq!(custom.output, vec!["wizard() in default"]);

    let engine = CompletionEngine::new(&registry, offline_values());
    let texts: Vec<String> = engine
        .complete("lb", &[], "", &Session::default())
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(texts, vec!["help", "wizard"]);
}

#[tokio::test]
async fn test_generated_domain_completes_actions_then_resources() {
    let mut registry = Registry::new();
    registry.register_api(lb_spec());
    let engine = CompletionEngine::new(&registry, offline_values());
    let session = Session::default();

    let actions: Vec<String> = engine
        .complete("lb", &[], "re", &session)
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(actions, vec!["remove-labels", "replace"]);

    let resources: Vec<String> = engine
        .complete("lb", &words(&["get"]), "", &session)
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(resources, vec!["help", "http_loadbalancer"]);

    let mut dispatch_session = Session::default();
    let result = Dispatcher::new(&registry).execute(
        "lb",
        &words(&["get", "http_loadbalancer", "frontend"]),
        &mut dispatch_session,
    );
    assert_eq!(result.error.as_deref(), Some("API not configured"));
}
