//! Interactive shell over the built-in registry with an in-memory API.

use super::test_utils::{offline_values, FakeApi};
use std::sync::Arc;
use xcsh::config::XcshConfig;
use xcsh::domains::builtin_registry;
use xcsh::session::Session;
use xcsh::shell::Shell;

fn shell() -> (Shell, Arc<FakeApi>) {
    let values = offline_values();
    let registry = builtin_registry(&XcshConfig::default(), Arc::clone(&values));
    let api = Arc::new(FakeApi::default());
    let session = Session::new("default").with_api(api.clone());
    (Shell::new(registry, session, values), api)
}

#[test]
fn test_generated_list_in_domain_context() {
    let (mut shell, api) = shell();
    shell.execute_line("ns prod");
    let entered = shell.execute_line("lb");
    assert!(entered.context_changed);
    assert_eq!(shell.prompt(), "xcsh:load_balancer [prod]> ");

    let result = shell.execute_line("list http_loadbalancer -o text");
    assert!(result.error.is_none(), "{:?}", result);
    assert_eq!(result.output, vec!["frontend"]);
    assert_eq!(
        api.calls.lock().last().map(String::as_str),
        Some("GET /api/config/namespaces/prod/http_loadbalancers")
    );
}

#[test]
fn test_namespace_domain_round_trip() {
    let (mut shell, _) = shell();
    let listed = shell.execute_line("namespace list --output-format text");
    assert_eq!(listed.output, vec!["default", "prod", "system"]);

    let switched = shell.execute_line("namespace use prod");
    assert!(switched.context_changed);
    assert_eq!(shell.session().namespace(), "prod");
}

#[test]
fn test_builtins_and_history() {
    let (mut shell, _) = shell();
    let domains = shell.execute_line("domains");
    assert!(domains.output.iter().any(|l| l.contains("load_balancer") && l.contains("api")));
    assert!(domains.output.iter().any(|l| l.contains("namespace") && l.contains("custom")));

    shell.execute_line("login context");
    assert_eq!(shell.session().context().to_string(), "login/context");
    assert!(!shell.execute_line("exit").should_exit);
    assert!(!shell.execute_line("exit").should_exit);
    assert!(shell.execute_line("exit").should_exit);

    let history = shell.execute_line("history");
    assert_eq!(history.output.len(), 6);
    assert!(history.output[0].ends_with("domains"));
}

#[tokio::test]
async fn test_complete_line_resource_names_use_fallback_offline() {
    let (mut shell, _) = shell();
    shell.execute_line("lb get");
    let suggestions = shell.complete_line("http_loadbalancer ").await;
    assert!(suggestions.iter().all(|s| !s.text.is_empty()));
    assert!(suggestions.iter().any(|s| s.text == "--namespace"));
}
