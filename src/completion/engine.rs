//! Completion engine: walks the completion tree with the tokens typed so far and
//! produces ranked suggestions for the token under the cursor.
//!
//! The walk follows the dispatcher's resolution order (groups, then command names, then
//! command aliases), so every path the engine suggests is one the dispatcher accepts.

use super::adapter::CompletionTree;
use super::node::{
    CompletionContext, CompletionFlag, CompletionNode, FlagValues, NodeKind, Suggestion,
    SuggestionCategory,
};
use crate::dispatch::is_help_token;
use crate::registry::Registry;
use crate::session::Session;
use crate::values::DynamicValueProvider;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Where the typed tokens lead in the tree
enum Position<'n> {
    /// At a domain or group: the next token names a child
    Scope(&'n CompletionNode),
    /// Inside a command: the rest are its arguments
    Command {
        node: &'n CompletionNode,
        path: Vec<String>,
        rest: &'n [String],
    },
    /// Nothing to complete (help token, unknown token)
    Dead,
}

/// Flags and positionals already typed after a command
#[derive(Debug, Default)]
struct TypedArgs<'f> {
    positionals: Vec<String>,
    flag_values: BTreeMap<String, String>,
    used: BTreeSet<String>,
    /// Last token is a value-taking flag still waiting for its value
    pending: Option<&'f CompletionFlag>,
}

impl<'f> TypedArgs<'f> {
    fn scan(flags: &'f [CompletionFlag], tokens: &[String]) -> Self {
        let mut typed = TypedArgs::default();
        for token in tokens {
            if let Some(flag) = typed.pending.take() {
                typed.flag_values.insert(flag.name.clone(), token.clone());
                continue;
            }
            if let Some((name, value)) = token.strip_prefix("--").and_then(|t| t.split_once('=')) {
                typed.used.insert(name.to_string());
                typed.flag_values.insert(name.to_string(), value.to_string());
                continue;
            }
            if let Some(flag) = CompletionFlag::find(flags, token) {
                typed.used.insert(flag.name.clone());
                if flag.takes_value {
                    typed.pending = Some(flag);
                }
                continue;
            }
            if !token.starts_with('-') {
                typed.positionals.push(token.clone());
            }
        }
        typed
    }
}

/// Completion engine over one registry
pub struct CompletionEngine<'a> {
    registry: &'a Registry,
    values: Arc<DynamicValueProvider>,
    tree: OnceLock<CompletionTree>,
}

impl<'a> CompletionEngine<'a> {
    pub fn new(registry: &'a Registry, values: Arc<DynamicValueProvider>) -> Self {
        Self {
            registry,
            values,
            tree: OnceLock::new(),
        }
    }

    /// Completion tree, built from the registry on first use.
    pub fn tree(&self) -> &CompletionTree {
        self.tree.get_or_init(|| CompletionTree::build(self.registry))
    }

    /// Suggestions for the first token: domain names and aliases.
    pub fn complete_domains(&self, partial: &str) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        for domain in self.tree().domains() {
            suggestions.push(Suggestion::new(
                &domain.name,
                &domain.description,
                SuggestionCategory::Domain,
            ));
            for alias in &domain.aliases {
                suggestions.push(Suggestion::new(
                    alias,
                    format!("Alias for {}", domain.name),
                    SuggestionCategory::Domain,
                ));
            }
        }
        rank(filter_prefix(suggestions, partial))
    }

    /// Suggestions for `partial` after `args` inside `domain_name`.
    pub async fn complete(
        &self,
        domain_name: &str,
        args: &[String],
        partial: &str,
        session: &Session,
    ) -> Vec<Suggestion> {
        let Some(root) = self.tree().get(domain_name) else {
            debug!(domain = domain_name, "Completion for unknown domain");
            return Vec::new();
        };

        let suggestions = match walk(root, vec![root.name.clone()], args) {
            Position::Dead => Vec::new(),
            Position::Scope(node) => scope_suggestions(node, partial),
            Position::Command { node, path, rest } => {
                let namespace = session.namespace().to_string();
                self.command_suggestions(node, path, rest, partial, namespace)
                    .await
            }
        };
        rank(suggestions)
    }

    async fn command_suggestions(
        &self,
        node: &CompletionNode,
        path: Vec<String>,
        rest: &[String],
        partial: &str,
        namespace: String,
    ) -> Vec<Suggestion> {
        let typed = TypedArgs::scan(&node.flags, rest);

        if let Some(flag) = typed.pending {
            return self.flag_values(flag, partial, "", &namespace).await;
        }

        if let Some((name, value)) = partial.strip_prefix("--").and_then(|p| p.split_once('=')) {
            return match node.flags.iter().find(|f| f.name == name && f.takes_value) {
                Some(flag) => {
                    let prefix = format!("--{}=", name);
                    self.flag_values(flag, value, &prefix, &namespace).await
                }
                None => Vec::new(),
            };
        }

        if partial.starts_with('-') {
            return flag_suggestions(node, &typed.used, partial);
        }

        if let Some(completer) = &node.completer {
            let ctx = CompletionContext {
                path,
                args: typed.positionals.clone(),
                flags: typed.flag_values.clone(),
                partial: partial.to_string(),
                namespace,
                values: Arc::clone(&self.values),
            };
            let values = filter_prefix(completer(ctx).await, partial);
            if !values.is_empty() {
                return values;
            }
        }

        if partial.is_empty() {
            return flag_suggestions(node, &typed.used, partial);
        }
        Vec::new()
    }

    async fn flag_values(
        &self,
        flag: &CompletionFlag,
        partial: &str,
        prefix: &str,
        namespace: &str,
    ) -> Vec<Suggestion> {
        let candidates: Vec<String> = match &flag.values {
            FlagValues::None => return Vec::new(),
            FlagValues::Fixed(values) => values.clone(),
            FlagValues::Namespaces => self.values.namespaces().await,
        };
        candidates
            .into_iter()
            .filter(|v| starts_with_ignore_case(v, partial))
            .map(|v| {
                let description = if v == namespace {
                    "current namespace".to_string()
                } else {
                    flag.description.clone()
                };
                Suggestion::new(format!("{}{}", prefix, v), description, SuggestionCategory::Value)
            })
            .collect()
    }
}

fn walk<'n>(node: &'n CompletionNode, mut path: Vec<String>, tokens: &'n [String]) -> Position<'n> {
    let Some((first, rest)) = tokens.split_first() else {
        return Position::Scope(node);
    };
    if is_help_token(first) {
        return Position::Dead;
    }
    let child = node
        .children
        .get(first)
        .or_else(|| node.find_alias(first));
    match child {
        Some(child) if child.kind == NodeKind::Command => {
            path.push(child.name.clone());
            Position::Command {
                node: child,
                path,
                rest,
            }
        }
        Some(child) => {
            path.push(child.name.clone());
            walk(child, path, rest)
        }
        None => Position::Dead,
    }
}

fn scope_suggestions(node: &CompletionNode, partial: &str) -> Vec<Suggestion> {
    if partial.starts_with('-') {
        let help = [
            Suggestion::new("--help", "Show help", SuggestionCategory::Flag),
            Suggestion::new("-h", "Show help", SuggestionCategory::Flag),
        ];
        return filter_prefix(help.to_vec(), partial);
    }

    let mut suggestions = Vec::new();
    for child in node.children.values().filter(|c| !c.hidden) {
        let category = match child.kind {
            NodeKind::Command => SuggestionCategory::Command,
            _ => SuggestionCategory::Subcommand,
        };
        suggestions.push(Suggestion::new(&child.name, &child.description, category));
        for alias in &child.aliases {
            suggestions.push(Suggestion::new(
                alias,
                format!("Alias for {}", child.name),
                category,
            ));
        }
    }
    suggestions.push(Suggestion::new("help", "Show help", SuggestionCategory::Command));
    filter_prefix(suggestions, partial)
}

fn flag_suggestions(node: &CompletionNode, used: &BTreeSet<String>, partial: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    for flag in node.flags.iter().filter(|f| !used.contains(&f.name)) {
        let long = flag.long_form();
        if partial.is_empty() || partial == "-" || starts_with_ignore_case(&long, partial) {
            suggestions.push(Suggestion::new(long, &flag.description, SuggestionCategory::Flag));
        }
        if let Some(short) = flag.short_form() {
            if partial == "-" || (partial.len() > 1 && starts_with_ignore_case(&short, partial)) {
                suggestions.push(Suggestion::new(short, &flag.description, SuggestionCategory::Flag));
            }
        }
    }
    suggestions
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn filter_prefix(suggestions: Vec<Suggestion>, partial: &str) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(|s| starts_with_ignore_case(&s.text, partial))
        .collect()
}

/// Sort by category rank then text, dropping repeated texts.
fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        a.category
            .rank()
            .cmp(&b.category.rank())
            .then_with(|| a.text.cmp(&b.text))
    });
    let mut seen = BTreeSet::new();
    suggestions.retain(|s| seen.insert(s.text.clone()));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionFlag, Source};
    use crate::dispatch::CommandResult;
    use crate::registry::{CommandDefinition, DomainDefinition, SubcommandGroup};
    use crate::values::{CacheKey, ValueSource};
    use crate::error::ShellError;
    use async_trait::async_trait;
    use futures::FutureExt;
    use std::time::Duration;

    struct StaticSource;

    #[async_trait]
    impl ValueSource for StaticSource {
        async fn fetch(&self, _key: &CacheKey) -> Result<Vec<String>, ShellError> {
            Ok(vec!["prod".to_string(), "staging".to_string(), "default".to_string()])
        }
    }

    fn provider() -> Arc<DynamicValueProvider> {
        Arc::new(DynamicValueProvider::new(
            Arc::new(StaticSource),
            Duration::from_secs(3),
            Duration::from_secs(300),
            vec!["default".to_string(), "system".to_string()],
        ))
    }

    fn noop(name: &str) -> CommandDefinition {
        CommandDefinition::new(name, |_, _| Ok(CommandResult::ok()))
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(
            DomainDefinition::new("namespace")
                .description("Manage namespaces")
                .alias("ns")
                .command(
                    noop("list")
                        .alias("ls")
                        .flag(CompletionFlag::output_format()),
                )
                .command(
                    noop("use")
                        .alias("set")
                        .flag(CompletionFlag::namespace())
                        .completer(Arc::new(|ctx: CompletionContext| {
                            async move {
                                ctx.values
                                    .namespaces()
                                    .await
                                    .into_iter()
                                    .map(|n| Suggestion::new(n, "namespace", SuggestionCategory::Value))
                                    .collect::<Vec<Suggestion>>()
                            }
                            .boxed()
                        })),
                )
                .command(noop("internal").hidden()),
        );
        registry.register(
            DomainDefinition::new("login")
                .description("Connection context")
                .group(SubcommandGroup::new("context").command(noop("set")).command(noop("show"))),
        );
        registry
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_complete_domains_includes_aliases() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let suggestions = engine.complete_domains("N");
        assert_eq!(texts(&suggestions), vec!["namespace", "ns"]);
        assert!(suggestions.iter().all(|s| s.category == SuggestionCategory::Domain));
    }

    #[tokio::test]
    async fn test_scope_suggestions_rank_groups_before_commands() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();

        let suggestions = engine.complete("namespace", &[], "", &session).await;
        let names = texts(&suggestions);
        assert!(names.contains(&"list"));
        assert!(names.contains(&"ls"));
        assert!(names.contains(&"help"));
        assert!(!names.contains(&"internal"));

        let login = engine.complete("login", &[], "", &session).await;
        assert_eq!(login[0].text, "context");
        assert_eq!(login[0].category, SuggestionCategory::Subcommand);
    }

    #[tokio::test]
    async fn test_group_walk_and_prefix() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();
        let suggestions = engine
            .complete("login", &args(&["context"]), "s", &session)
            .await;
        assert_eq!(texts(&suggestions), vec!["set", "show"]);
    }

    #[tokio::test]
    async fn test_flag_values_fixed_and_inline() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();

        let after_flag = engine
            .complete("namespace", &args(&["list", "-o"]), "", &session)
            .await;
        assert_eq!(texts(&after_flag), vec!["json", "table", "text"]);

        let inline = engine
            .complete("namespace", &args(&["ls"]), "--output-format=j", &session)
            .await;
        assert_eq!(texts(&inline), vec!["--output-format=json"]);
    }

    #[tokio::test]
    async fn test_dynamic_namespace_values() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();

        let positional = engine
            .complete("namespace", &args(&["use"]), "p", &session)
            .await;
        assert_eq!(texts(&positional), vec!["prod"]);

        let flag_value = engine
            .complete("namespace", &args(&["set", "--namespace"]), "st", &session)
            .await;
        assert_eq!(texts(&flag_value), vec!["staging"]);
        assert_eq!(flag_value[0].category, SuggestionCategory::Value);
    }

    #[tokio::test]
    async fn test_flags_offered_and_used_flags_skipped() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();

        let flags = engine
            .complete("namespace", &args(&["list"]), "--", &session)
            .await;
        assert_eq!(texts(&flags), vec!["--output-format"]);

        let used = engine
            .complete("namespace", &args(&["list", "-o", "json"]), "-", &session)
            .await;
        assert!(used.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_paths_produce_nothing() {
        let registry = registry();
        let engine = CompletionEngine::new(&registry, provider());
        let session = Session::default();
        assert!(engine.complete("nope", &[], "", &session).await.is_empty());
        assert!(engine
            .complete("namespace", &args(&["bogus"]), "", &session)
            .await
            .is_empty());
        assert!(engine
            .complete("namespace", &args(&["--help"]), "", &session)
            .await
            .is_empty());
    }

    #[test]
    fn test_rank_orders_by_category_then_text() {
        let ranked = rank(vec![
            Suggestion::new("--x", "", SuggestionCategory::Flag),
            Suggestion::new("b", "", SuggestionCategory::Command),
            Suggestion::new("a", "", SuggestionCategory::Command),
            Suggestion::new("grp", "", SuggestionCategory::Subcommand),
            Suggestion::new("a", "", SuggestionCategory::Command),
        ]);
        assert_eq!(texts(&ranked), vec!["grp", "a", "b", "--x"]);
        assert_eq!(Source::Custom.as_str(), "custom");
    }
}
