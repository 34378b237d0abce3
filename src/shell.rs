//! Interactive shell: line execution with navigation context, and line completion.
//!
//! Lines typed inside a context (`xcsh:login/context>`) are relative to it: the context
//! path is prepended before dispatch. A leading `/` runs the line from root instead.

mod builtins;
mod tokenize;

pub use tokenize::{tokenize, tokenize_partial};

use crate::completion::{CompletionEngine, Suggestion};
use crate::dispatch::{CommandResult, Dispatcher};
use crate::registry::Registry;
use crate::session::Session;
use crate::values::DynamicValueProvider;
use std::sync::Arc;
use tracing::debug;

/// Registry, session and completion values for one shell process
pub struct Shell {
    registry: Registry,
    session: Session,
    values: Arc<DynamicValueProvider>,
}

/// A line split into words, with the root escape removed
struct Line {
    words: Vec<String>,
    absolute: bool,
}

impl Line {
    fn new(mut words: Vec<String>) -> Self {
        let mut absolute = false;
        if let Some(first) = words.first() {
            if first == "/" && words.len() > 1 {
                words.remove(0);
                absolute = true;
            } else if first.len() > 1 && first.starts_with('/') {
                let stripped = first[1..].to_string();
                words[0] = stripped;
                absolute = true;
            }
        }
        Self { words, absolute }
    }
}

impl Shell {
    pub fn new(registry: Registry, session: Session, values: Arc<DynamicValueProvider>) -> Self {
        Self {
            registry,
            session,
            values,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn values(&self) -> &Arc<DynamicValueProvider> {
        &self.values
    }

    /// Prompt reflecting context and namespace: `xcsh:login/context [prod]> `.
    pub fn prompt(&self) -> String {
        format!(
            "xcsh:{} [{}]> ",
            self.session.context(),
            self.session.namespace()
        )
    }

    /// Execute one interactive line. Never fails; errors come back in the result.
    pub fn execute_line(&mut self, line: &str) -> CommandResult {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return CommandResult::ok();
        }
        self.session.record(trimmed);

        let words = match tokenize(trimmed) {
            Ok(words) => words,
            Err(err) => return self.finish(CommandResult::from_error(&err)),
        };
        let line = Line::new(words);
        let at_root = line.absolute || self.session.context().is_root();

        if let Some(result) = builtins::run(&line.words, at_root, &self.registry, &mut self.session) {
            return self.finish(result);
        }

        let full = self.full_path(line);
        if let Some(result) = self.enter_context(&full) {
            return self.finish(result);
        }
        let result = self.execute_args(&full);
        self.finish(result)
    }

    /// Dispatch `words` (domain first) without built-ins or context handling.
    pub fn execute_args(&mut self, words: &[String]) -> CommandResult {
        let Some((domain, args)) = words.split_first() else {
            return CommandResult::ok();
        };
        let result = Dispatcher::new(&self.registry).execute(domain, args, &mut self.session);
        self.session.set_last_exit_code(result.exit_code());
        result
    }

    /// Suggestions for a partially typed interactive line.
    pub async fn complete_line(&self, line: &str) -> Vec<Suggestion> {
        let (words, partial) = tokenize_partial(line);
        let line = Line::new(words);
        let at_root = line.absolute || self.session.context().is_root();
        let first_word = line.words.is_empty();
        let full = self.full_path(line);

        let mut suggestions = self.complete_path(&full, &partial).await;
        if first_word && !partial.starts_with('-') {
            suggestions.extend(builtins::suggestions(&partial, at_root));
        }
        suggestions
    }

    /// Suggestions for `words` as passed by generated scripts: domain first, the last
    /// word being the one under the cursor.
    pub async fn complete_words(&self, words: &[String]) -> Vec<Suggestion> {
        match words.split_last() {
            Some((partial, typed)) => self.complete_path(typed, partial).await,
            None => self.complete_path(&[], "").await,
        }
    }

    async fn complete_path(&self, full: &[String], partial: &str) -> Vec<Suggestion> {
        let engine = CompletionEngine::new(&self.registry, Arc::clone(&self.values));
        match full.split_first() {
            None => engine.complete_domains(partial),
            Some((domain, args)) => engine.complete(domain, args, partial, &self.session).await,
        }
    }

    fn full_path(&self, line: Line) -> Vec<String> {
        if line.absolute {
            return line.words;
        }
        let mut full = self.session.context().prefix();
        full.extend(line.words);
        full
    }

    /// A bare domain, or a domain plus one group, enters that context.
    fn enter_context(&mut self, full: &[String]) -> Option<CommandResult> {
        let domain = self.registry.get(full.first()?)?;
        match full {
            [_] => {
                let name = domain.name.clone();
                debug!(domain = %name, "Entering domain context");
                let context = self.session.context_mut();
                context.enter_domain(name.clone());
                Some(
                    CommandResult::line(format!(
                        "Entered {}; type 'help' for commands, 'back' to leave",
                        name
                    ))
                    .with_context_changed(),
                )
            }
            [_, group] if domain.scope.groups.contains_key(group) => {
                let name = domain.name.clone();
                let context = self.session.context_mut();
                context.enter_domain(name.clone());
                context.enter_group(group.clone());
                Some(
                    CommandResult::line(format!("Entered {}/{}", name, group))
                        .with_context_changed(),
                )
            }
            _ => None,
        }
    }

    fn finish(&mut self, result: CommandResult) -> CommandResult {
        self.session.set_last_exit_code(result.exit_code());
        result
    }
}
