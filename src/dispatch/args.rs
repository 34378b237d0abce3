//! Flag parsing for command handlers.

use crate::completion::CompletionFlag;
use crate::dispatch::is_help_token;
use crate::error::ShellError;
use std::collections::{BTreeMap, BTreeSet};

/// Handler arguments split into positionals and flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    positionals: Vec<String>,
    values: BTreeMap<String, Vec<String>>,
    switches: BTreeSet<String>,
    help: bool,
}

impl ParsedArgs {
    /// Parse `args` against the command's flags. Unknown flags and value flags missing
    /// their value are `InvalidArguments`; everything after `--` is positional.
    pub fn parse(args: &[String], flags: &[CompletionFlag]) -> Result<Self, ShellError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(token) = iter.next() {
            if token == "--" {
                parsed.positionals.extend(iter.by_ref().cloned());
                break;
            }
            if is_help_token(token) && token.starts_with('-') {
                parsed.help = true;
                continue;
            }
            if let Some((name, value)) = token.strip_prefix("--").and_then(|t| t.split_once('=')) {
                let flag = flags
                    .iter()
                    .find(|f| f.name == name && f.takes_value)
                    .ok_or_else(|| ShellError::InvalidArguments(format!("unknown flag --{}", name)))?;
                parsed.push_value(&flag.name, value);
                continue;
            }
            if token.len() > 1 && token.starts_with('-') {
                let flag = CompletionFlag::find(flags, token)
                    .ok_or_else(|| ShellError::InvalidArguments(format!("unknown flag {}", token)))?;
                if flag.takes_value {
                    let value = iter.next().ok_or_else(|| {
                        ShellError::InvalidArguments(format!("flag --{} requires a value", flag.name))
                    })?;
                    parsed.push_value(&flag.name, value);
                } else {
                    parsed.switches.insert(flag.name.clone());
                }
                continue;
            }
            parsed.positionals.push(token.clone());
        }
        Ok(parsed)
    }

    fn push_value(&mut self, name: &str, value: &str) {
        self.values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Positional at `index`, or `InvalidArguments` naming what is missing.
    pub fn require_positional(&self, index: usize, what: &str) -> Result<&str, ShellError> {
        self.positional(index)
            .ok_or_else(|| ShellError::InvalidArguments(format!("missing {}", what)))
    }

    /// Last value given for a flag
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn require_value(&self, name: &str) -> Result<&str, ShellError> {
        self.value(name)
            .ok_or_else(|| ShellError::InvalidArguments(format!("--{} is required", name)))
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn help(&self) -> bool {
        self.help
    }
}
