//! Completion scripts generated from the built-in registry.

use super::test_utils::offline_values;
use xcsh::completion::CompletionTree;
use xcsh::config::XcshConfig;
use xcsh::domains::builtin_registry;
use xcsh::scripts::{collect, generate, Dialect};

fn tree() -> CompletionTree {
    CompletionTree::build(&builtin_registry(&XcshConfig::default(), offline_values()))
}

#[test]
fn test_bash_script_covers_domains_and_live_values() {
    let script = generate(Dialect::Bash, &tree(), "xcsh");
    assert!(script.contains("complete -F _xcsh_complete xcsh"));
    assert!(script.contains("load_balancer"));
    assert!(script.contains("\"namespace use\")"));
    assert!(script.contains("xcsh __complete"));
}

#[test]
fn test_zsh_script_registers_compdef() {
    let script = generate(Dialect::Zsh, &tree(), "xcsh");
    assert!(script.starts_with("#compdef xcsh"));
    assert!(script.contains("'login context set')"));
}

#[test]
fn test_fish_script_guards_every_candidate() {
    let script = generate(Dialect::Fish, &tree(), "xcsh");
    for line in script.lines().filter(|l| l.starts_with("complete -c xcsh -n")) {
        assert!(line.contains("__xcsh_at"), "unguarded: {}", line);
    }
    assert!(script.contains("-a 'ai_intelligence'"));
}

#[test]
fn test_collected_paths_include_aliases_and_extensions() {
    let paths = collect(&tree());
    let keys: Vec<String> = paths.iter().map(|p| p.key()).collect();
    for expected in ["lb list http_loadbalancer", "ai query", "ai ask", "namespace rm"] {
        assert!(keys.iter().any(|k| k == expected), "missing {}", expected);
    }
    let query = paths.iter().find(|p| p.key() == "ai query").unwrap();
    assert!(query.flags.iter().any(|f| f.long == "--namespace"));
}
