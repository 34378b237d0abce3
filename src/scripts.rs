//! Shell Script Generators: static completion scripts for bash, zsh and fish.
//!
//! The completion tree is flattened once into `ScriptPath` entries (typed word path →
//! candidates); each dialect only decides quoting and layout. Values that need a live
//! lookup (namespaces, resource names) call back into `<program> __complete <words…>`.

mod bash;
mod fish;
mod zsh;

use crate::completion::{CompletionNode, CompletionTree, FlagValues, NodeKind};
use std::collections::BTreeSet;

/// Target shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dialect {
    Bash,
    Zsh,
    Fish,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Bash => "bash",
            Dialect::Zsh => "zsh",
            Dialect::Fish => "fish",
        }
    }
}

/// A candidate word with its description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptWord {
    pub word: String,
    pub description: String,
}

impl ScriptWord {
    fn new(word: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            description: description.into(),
        }
    }
}

/// Values of a flag as the script sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptValues {
    /// Free-form; no candidates
    None,
    Fixed(Vec<String>),
    /// Ask the binary at completion time
    Dynamic,
}

/// A value-taking flag at one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFlag {
    pub long: String,
    pub short: Option<String>,
    pub description: String,
    pub values: ScriptValues,
}

/// Everything completable after one word path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPath {
    /// Words typed so far, excluding the program name and flags
    pub path: Vec<String>,
    /// Subcommands, commands and aliases valid next
    pub words: Vec<ScriptWord>,
    /// Flags valid at this path (commands only)
    pub flags: Vec<ScriptFlag>,
    /// Switches (flags without values) valid at this path
    pub switches: Vec<ScriptWord>,
    /// Positional arguments come from a live lookup
    pub dynamic_args: bool,
}

impl ScriptPath {
    pub fn key(&self) -> String {
        self.path.join(" ")
    }
}

/// Flatten the tree into script entries; domain and command aliases get their own paths.
pub fn collect(tree: &CompletionTree) -> Vec<ScriptPath> {
    let mut root_words = Vec::new();
    for domain in tree.domains() {
        root_words.push(ScriptWord::new(&domain.name, &domain.description));
        for alias in &domain.aliases {
            root_words.push(ScriptWord::new(alias, &domain.description));
        }
    }
    let mut paths = vec![ScriptPath {
        path: Vec::new(),
        words: root_words,
        flags: Vec::new(),
        switches: Vec::new(),
        dynamic_args: false,
    }];
    for domain in tree.domains() {
        for name in std::iter::once(&domain.name).chain(domain.aliases.iter()) {
            collect_node(domain, vec![name.clone()], &mut paths);
        }
    }
    paths
}

fn collect_node(node: &CompletionNode, path: Vec<String>, out: &mut Vec<ScriptPath>) {
    match node.kind {
        NodeKind::Command => out.push(command_entry(node, path)),
        NodeKind::Domain | NodeKind::Group => {
            let mut words = Vec::new();
            for child in node.children.values().filter(|c| !c.hidden) {
                words.push(ScriptWord::new(&child.name, &child.description));
                for alias in &child.aliases {
                    words.push(ScriptWord::new(alias, &child.description));
                }
            }
            words.push(ScriptWord::new("help", "Show help"));
            out.push(ScriptPath {
                path: path.clone(),
                words,
                flags: Vec::new(),
                switches: Vec::new(),
                dynamic_args: false,
            });
            for child in node.children.values().filter(|c| !c.hidden) {
                let names = std::iter::once(&child.name).chain(
                    child
                        .aliases
                        .iter()
                        .filter(|_| child.kind == NodeKind::Command),
                );
                for name in names {
                    let mut child_path = path.clone();
                    child_path.push(name.clone());
                    collect_node(child, child_path, out);
                }
            }
        }
    }
}

fn command_entry(node: &CompletionNode, path: Vec<String>) -> ScriptPath {
    let mut flags = Vec::new();
    let mut switches = Vec::new();
    for flag in &node.flags {
        if flag.takes_value {
            flags.push(ScriptFlag {
                long: flag.long_form(),
                short: flag.short_form(),
                description: flag.description.clone(),
                values: match &flag.values {
                    FlagValues::None => ScriptValues::None,
                    FlagValues::Fixed(values) => ScriptValues::Fixed(values.clone()),
                    FlagValues::Namespaces => ScriptValues::Dynamic,
                },
            });
        } else {
            switches.push(ScriptWord::new(flag.long_form(), &flag.description));
            if let Some(short) = flag.short_form() {
                switches.push(ScriptWord::new(short, &flag.description));
            }
        }
    }
    ScriptPath {
        path,
        words: Vec::new(),
        flags,
        switches,
        dynamic_args: node.completer.is_some(),
    }
}

/// Every value-taking flag spelling in the tree; scripts skip the word after them.
pub fn value_flag_names(paths: &[ScriptPath]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for path in paths {
        for flag in &path.flags {
            names.insert(flag.long.clone());
            if let Some(short) = &flag.short {
                names.insert(short.clone());
            }
        }
    }
    names.into_iter().collect()
}

/// Generate a completion script for `program` in `dialect`.
pub fn generate(dialect: Dialect, tree: &CompletionTree, program: &str) -> String {
    let paths = collect(tree);
    match dialect {
        Dialect::Bash => bash::render(&paths, program),
        Dialect::Zsh => zsh::render(&paths, program),
        Dialect::Fish => fish::render(&paths, program),
    }
}

/// Shell-function-safe form of the program name.
fn function_name(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
