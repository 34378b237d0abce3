//! Completion tree nodes, flags and suggestions.

use crate::registry::ArgumentCompleter;
use crate::values::DynamicValueProvider;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// How a node was built. Never consulted during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Custom,
    Api,
    Extension,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Custom => "custom",
            Source::Api => "api",
            Source::Extension => "extension",
        }
    }
}

/// Position of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Domain,
    Group,
    Command,
}

/// Where a flag's values come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValues {
    /// Free-form value (file path, label)
    None,
    /// Fixed candidate list
    Fixed(Vec<String>),
    /// Live namespace list from the Dynamic Value Provider
    Namespaces,
}

/// A flag accepted by a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionFlag {
    pub name: String,
    pub short: Option<char>,
    pub description: String,
    pub takes_value: bool,
    pub values: FlagValues,
    pub required: bool,
}

impl CompletionFlag {
    /// Boolean switch
    pub fn switch(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            description: description.into(),
            takes_value: false,
            values: FlagValues::None,
            required: false,
        }
    }

    /// Flag taking a value
    pub fn value(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            takes_value: true,
            ..Self::switch(name, description)
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = FlagValues::Fixed(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn dynamic_namespaces(mut self) -> Self {
        self.values = FlagValues::Namespaces;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// `--namespace`/`-n` completing live namespace names
    pub fn namespace() -> Self {
        Self::value("namespace", "Namespace to operate in")
            .short('n')
            .dynamic_namespaces()
    }

    /// `--output-format`/`-o`
    pub fn output_format() -> Self {
        Self::value("output-format", "Output format")
            .short('o')
            .values(["json", "table", "text"])
    }

    pub fn long_form(&self) -> String {
        format!("--{}", self.name)
    }

    pub fn short_form(&self) -> Option<String> {
        self.short.map(|c| format!("-{}", c))
    }

    /// Whether `token` names this flag (`--name` or `-s`, without `=value`).
    pub fn matches(&self, token: &str) -> bool {
        token == self.long_form() || self.short_form().as_deref() == Some(token)
    }

    /// Find the flag named by `token` in `flags`.
    pub fn find<'a>(flags: &'a [CompletionFlag], token: &str) -> Option<&'a CompletionFlag> {
        flags.iter().find(|f| f.matches(token))
    }
}

/// One addressable token in the completion tree
#[derive(Clone)]
pub struct CompletionNode {
    pub name: String,
    pub description: String,
    pub kind: NodeKind,
    pub aliases: Vec<String>,
    pub children: BTreeMap<String, CompletionNode>,
    pub flags: Vec<CompletionFlag>,
    pub hidden: bool,
    pub source: Source,
    pub completer: Option<ArgumentCompleter>,
}

impl CompletionNode {
    pub fn new(name: impl Into<String>, kind: NodeKind, source: Source) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            aliases: Vec::new(),
            children: BTreeMap::new(),
            flags: Vec::new(),
            hidden: false,
            source,
            completer: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn insert_child(&mut self, child: CompletionNode) {
        self.children.insert(child.name.clone(), child);
    }

    /// First command child (in name order) carrying `token` as an alias.
    pub fn find_alias(&self, token: &str) -> Option<&CompletionNode> {
        self.children
            .values()
            .filter(|c| c.kind == NodeKind::Command)
            .find(|c| c.aliases.iter().any(|a| a == token))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.values().map(CompletionNode::size).sum::<usize>()
    }
}

impl fmt::Debug for CompletionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionNode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("aliases", &self.aliases)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("flags", &self.flags.len())
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

/// Suggestion category for client-side ranking and highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Domain,
    Subcommand,
    Command,
    Flag,
    Argument,
    Value,
}

impl SuggestionCategory {
    pub fn rank(&self) -> u8 {
        match self {
            SuggestionCategory::Value => 0,
            SuggestionCategory::Argument => 1,
            SuggestionCategory::Domain => 2,
            SuggestionCategory::Subcommand => 3,
            SuggestionCategory::Command => 4,
            SuggestionCategory::Flag => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::Domain => "domain",
            SuggestionCategory::Subcommand => "subcommand",
            SuggestionCategory::Command => "command",
            SuggestionCategory::Flag => "flag",
            SuggestionCategory::Argument => "argument",
            SuggestionCategory::Value => "value",
        }
    }
}

/// A completion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub description: String,
    pub category: SuggestionCategory,
}

impl Suggestion {
    pub fn new(
        text: impl Into<String>,
        description: impl Into<String>,
        category: SuggestionCategory,
    ) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
            category,
        }
    }
}

/// Input handed to a command's own argument completer
#[derive(Clone)]
pub struct CompletionContext {
    /// Canonical command path, domain first
    pub path: Vec<String>,
    /// Positional arguments already typed after the command
    pub args: Vec<String>,
    /// Flag values already typed, keyed by long name
    pub flags: BTreeMap<String, String>,
    /// Token under the cursor
    pub partial: String,
    /// Session namespace
    pub namespace: String,
    pub values: Arc<DynamicValueProvider>,
}

impl CompletionContext {
    /// Namespace from `--namespace` if typed, else the session namespace.
    pub fn effective_namespace(&self) -> &str {
        self.flags
            .get("namespace")
            .map(String::as_str)
            .unwrap_or(&self.namespace)
    }
}

impl fmt::Debug for CompletionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionContext")
            .field("path", &self.path)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("partial", &self.partial)
            .field("namespace", &self.namespace)
            .finish()
    }
}
