//! Structured command result returned to the prompt loop.

use crate::error::ShellError;
use serde::Serialize;

/// Outcome of one dispatched command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub output: Vec<String>,
    pub should_exit: bool,
    pub should_clear: bool,
    pub context_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    /// Empty successful result
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn line(line: impl Into<String>) -> Self {
        Self::lines([line])
    }

    /// Error result with a short label and explanatory output lines.
    pub fn failure<I, S>(label: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            error: Some(label.into()),
            ..Self::lines(lines)
        }
    }

    pub fn from_error(err: &ShellError) -> Self {
        Self::failure(err.label(), [err.to_string()])
    }

    pub fn exit() -> Self {
        Self {
            should_exit: true,
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self {
            should_clear: true,
            ..Self::default()
        }
    }

    /// Mark that session state (namespace, context) changed.
    pub fn with_context_changed(mut self) -> Self {
        self.context_changed = true;
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Process-style exit code for one-shot invocations.
    pub fn exit_code(&self) -> i32 {
        if self.is_error() {
            1
        } else {
            0
        }
    }
}
