//! Domain, group and command definitions.
//!
//! A domain owns a root `CommandScope`; every `SubcommandGroup` owns another one, so the
//! same resolution applies at any depth.

use crate::api::ApiDomainSpec;
use crate::completion::{CompletionContext, CompletionFlag, Source, Suggestion};
use crate::dispatch::CommandResult;
use crate::error::ShellError;
use crate::session::Session;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Execute handler: positional tokens after the command name plus the mutable session.
pub type CommandHandler =
    Arc<dyn Fn(&[String], &mut Session) -> Result<CommandResult, ShellError> + Send + Sync>;

/// Handler-specific argument completion (resource names, profile names, ...).
pub type ArgumentCompleter =
    Arc<dyn Fn(CompletionContext) -> BoxFuture<'static, Vec<Suggestion>> + Send + Sync>;

/// Short, medium and long descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptions {
    pub short: String,
    pub medium: String,
    pub long: String,
}

impl Descriptions {
    pub fn new(short: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            medium: String::new(),
            long: String::new(),
        }
    }

    /// Longest non-empty description, for help screens.
    pub fn longest(&self) -> &str {
        [&self.long, &self.medium, &self.short]
            .into_iter()
            .find(|d| !d.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A single executable command
#[derive(Clone)]
pub struct CommandDefinition {
    pub name: String,
    pub descriptions: Descriptions,
    pub usage: Option<String>,
    pub aliases: Vec<String>,
    pub flags: Vec<CompletionFlag>,
    pub hidden: bool,
    pub source: Source,
    pub handler: CommandHandler,
    pub completer: Option<ArgumentCompleter>,
}

impl CommandDefinition {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[String], &mut Session) -> Result<CommandResult, ShellError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            descriptions: Descriptions::default(),
            usage: None,
            aliases: Vec::new(),
            flags: Vec::new(),
            hidden: false,
            source: Source::Custom,
            handler: Arc::new(handler),
            completer: None,
        }
    }

    pub fn description(mut self, short: impl Into<String>) -> Self {
        self.descriptions.short = short.into();
        self
    }

    pub fn long_description(mut self, long: impl Into<String>) -> Self {
        self.descriptions.long = long.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn flag(mut self, flag: CompletionFlag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn completer(mut self, completer: ArgumentCompleter) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn matches_alias(&self, token: &str) -> bool {
        self.aliases.iter().any(|a| a == token)
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("flags", &self.flags.len())
            .field("source", &self.source)
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

/// Commands, nested groups and an optional default command at one level
#[derive(Debug, Clone, Default)]
pub struct CommandScope {
    pub commands: BTreeMap<String, CommandDefinition>,
    pub groups: BTreeMap<String, SubcommandGroup>,
    pub default_command: Option<CommandDefinition>,
}

impl CommandScope {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.groups.is_empty() && self.default_command.is_none()
    }

    /// First command (in name order) carrying `token` as an alias.
    pub fn find_alias(&self, token: &str) -> Option<&CommandDefinition> {
        self.commands.values().find(|c| c.matches_alias(token))
    }
}

/// A named grouping of commands under a domain or another group
#[derive(Debug, Clone)]
pub struct SubcommandGroup {
    pub name: String,
    pub descriptions: Descriptions,
    pub scope: CommandScope,
}

impl SubcommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptions: Descriptions::default(),
            scope: CommandScope::default(),
        }
    }

    pub fn description(mut self, short: impl Into<String>) -> Self {
        self.descriptions.short = short.into();
        self
    }

    pub fn command(mut self, command: CommandDefinition) -> Self {
        self.scope.commands.insert(command.name.clone(), command);
        self
    }

    pub fn group(mut self, group: SubcommandGroup) -> Self {
        self.scope.groups.insert(group.name.clone(), group);
        self
    }

    pub fn default_command(mut self, command: CommandDefinition) -> Self {
        self.scope.default_command = Some(command);
        self
    }
}

/// How a domain came to exist
#[derive(Debug, Clone)]
pub enum DomainKind {
    /// Hand-authored domain module
    Custom,
    /// Generated from API action and resource-type metadata
    Api(Arc<ApiDomainSpec>),
}

/// A top-level domain
#[derive(Debug, Clone)]
pub struct DomainDefinition {
    pub name: String,
    pub descriptions: Descriptions,
    pub aliases: Vec<String>,
    pub kind: DomainKind,
    pub scope: CommandScope,
}

impl DomainDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptions: Descriptions::default(),
            aliases: Vec::new(),
            kind: DomainKind::Custom,
            scope: CommandScope::default(),
        }
    }

    pub fn description(mut self, short: impl Into<String>) -> Self {
        self.descriptions.short = short.into();
        self
    }

    pub fn medium_description(mut self, medium: impl Into<String>) -> Self {
        self.descriptions.medium = medium.into();
        self
    }

    pub fn long_description(mut self, long: impl Into<String>) -> Self {
        self.descriptions.long = long.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn command(mut self, command: CommandDefinition) -> Self {
        self.scope.commands.insert(command.name.clone(), command);
        self
    }

    pub fn group(mut self, group: SubcommandGroup) -> Self {
        self.scope.groups.insert(group.name.clone(), group);
        self
    }

    pub fn default_command(mut self, command: CommandDefinition) -> Self {
        self.scope.default_command = Some(command);
        self
    }

    pub fn is_api(&self) -> bool {
        matches!(self.kind, DomainKind::Api(_))
    }
}
