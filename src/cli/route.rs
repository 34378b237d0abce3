//! CLI route: single route table and run context. Builds the shell from configuration
//! and dispatches each subcommand to it.

use crate::api::HttpManagementApi;
use crate::cli::output;
use crate::cli::parse::Commands;
use crate::completion::CompletionTree;
use crate::config::{global_config_path, ConfigLoader, XcshConfig};
use crate::domains::builtin_registry;
use crate::error::ShellError;
use crate::scripts;
use crate::session::{tenant_from_url, Session};
use crate::shell::Shell;
use crate::values::{DynamicValueProvider, HttpValueSource};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info};

const PROGRAM: &str = "xcsh";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Runtime context for CLI execution: configuration, async runtime and the shell.
pub struct RunContext {
    config: XcshConfig,
    config_path: Option<PathBuf>,
    runtime: Runtime,
    shell: Shell,
}

impl RunContext {
    /// Load configuration and build registry, session and completion values.
    /// Must be called outside any async runtime: the handler HTTP client is blocking.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ShellError> {
        let config = ConfigLoader::load_optional(config_path.as_deref())?;
        config.ensure_valid()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("xcsh-completion")
            .enable_all()
            .build()?;

        let values = match HttpValueSource::from_config(&config.api, config.completion.timeout())? {
            Some(source) => DynamicValueProvider::from_config(Arc::new(source), &config.completion),
            None => DynamicValueProvider::offline(&config.completion),
        };
        let values = Arc::new(values);

        let mut session = Session::new(config.api.default_namespace.clone())
            .with_tenant(config.api.url.as_deref().and_then(tenant_from_url));
        if let Some(api) = HttpManagementApi::from_config(&config.api)? {
            info!(base_url = api.base_url(), "Management API configured");
            session = session.with_api(Arc::new(api));
        }

        let registry = builtin_registry(&config, Arc::clone(&values));
        let shell = Shell::new(registry, session, values);
        Ok(Self {
            config,
            config_path,
            runtime,
            shell,
        })
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Execute a CLI command via the single route table. Returns the process exit code.
    pub fn execute(&mut self, command: Option<&Commands>) -> Result<i32, ShellError> {
        let color = io::stdout().is_terminal();
        match command {
            None => self.repl(),
            Some(Commands::Completion { shell }) => {
                let tree = CompletionTree::build(self.shell.registry());
                print!("{}", scripts::generate(*shell, &tree, PROGRAM));
                Ok(0)
            }
            Some(Commands::Complete { words }) => {
                let suggestions = self.runtime.block_on(self.shell.complete_words(words));
                let text = output::render_machine_suggestions(&suggestions);
                if !text.is_empty() {
                    println!("{}", text);
                }
                Ok(0)
            }
            Some(Commands::Config) => {
                let source = self
                    .config_path
                    .clone()
                    .or_else(global_config_path)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(defaults)".to_string());
                println!("# config: {}", source);
                print!("{}", self.config.to_redacted_toml()?);
                Ok(0)
            }
            Some(Commands::Domains) => {
                let result = self.shell.execute_line("domains");
                println!("{}", output::render_result(&result, color));
                Ok(result.exit_code())
            }
            Some(Commands::External(words)) => {
                debug!(command = %words.join(" "), "One-shot command");
                let result = self.shell.execute_args(words);
                let text = output::render_result(&result, color && !result.is_error());
                if result.is_error() {
                    eprintln!("{}", text);
                } else if !text.is_empty() {
                    println!("{}", text);
                }
                Ok(result.exit_code())
            }
        }
    }

    /// Read-eval loop on stdin. A line ending in `?` lists completions instead of running.
    fn repl(&mut self) -> Result<i32, ShellError> {
        let color = io::stdout().is_terminal();
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(
            stdout,
            "xcsh {} - type 'help' for commands, 'quit' to leave",
            env!("CARGO_PKG_VERSION")
        )?;
        info!("Interactive shell started");

        loop {
            write!(stdout, "{}", output::prompt(&self.shell.prompt(), color))?;
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                writeln!(stdout)?;
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(partial) = line.strip_suffix('?') {
                let suggestions = self.runtime.block_on(self.shell.complete_line(partial));
                writeln!(stdout, "{}", output::render_suggestions(&suggestions, color))?;
                continue;
            }

            let result = self.shell.execute_line(line);
            if result.should_clear {
                write!(stdout, "{}", CLEAR_SCREEN)?;
            }
            let text = output::render_result(&result, color);
            if !text.is_empty() {
                writeln!(stdout, "{}", text)?;
            }
            if result.should_exit {
                break;
            }
        }
        info!("Interactive shell finished");
        Ok(0)
    }
}
