//! CLI parse: clap types for xcsh. No behavior; definitions only.

use crate::scripts::Dialect;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// xcsh - interactive shell for cloud resource domains
#[derive(Parser, Debug)]
#[command(name = "xcsh", version)]
#[command(about = "Interactive shell for managing cloud resources across API domains")]
#[command(
    after_help = "Run without a command to start the interactive shell.\nAny other words run once as a domain command, e.g. `xcsh namespace list`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, file, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a completion script for bash, zsh or fish
    Completion {
        #[arg(value_enum)]
        shell: Dialect,
    },
    /// Completion candidates for generated scripts, one `text<TAB>description` per line
    #[command(name = "__complete", hide = true)]
    Complete {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        words: Vec<String>,
    },
    /// Show the effective configuration (token redacted)
    Config,
    /// List available domains
    Domains,
    /// Run a domain command once
    #[command(external_subcommand)]
    External(Vec<String>),
}
