//! xcsh CLI Binary
//!
//! Interactive shell and one-shot runner for cloud resource domains.

use clap::Parser;
use std::process;
use tracing::{error, info};
use xcsh::cli::{Cli, RunContext};
use xcsh::config::ConfigLoader;
use xcsh::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("xcsh starting");

    let mut context = match RunContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing shell: {}", e);
            eprintln!("{}", xcsh::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(cli.command.as_ref()) {
        Ok(code) => {
            info!(code, "Command completed");
            drop(context);
            process::exit(code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", xcsh::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::load_optional(cli.config.as_deref())
        .ok()
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // Mirror to stderr unless --log-output says otherwise below.
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_logging_config_quiet() {
        let cli = Cli::try_parse_from(["xcsh", "--quiet", "domains"]).unwrap();
        let config = build_logging_config(&cli);
        assert!(!config.enabled, "quiet should disable logging");
    }

    #[test]
    fn test_build_logging_config_verbose_respects_explicit_output_override() {
        let cli = Cli::try_parse_from([
            "xcsh",
            "--verbose",
            "--log-output",
            "stderr",
            "domains",
        ])
        .unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "debug");
        assert_eq!(
            config.output, "stderr",
            "explicit --log-output should win over verbose defaults"
        );
    }

    #[test]
    fn test_build_logging_config_log_file() {
        let cli = Cli::try_parse_from(["xcsh", "--log-file", "/tmp/xcsh-test.log", "domains"]).unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.file, Some(std::path::PathBuf::from("/tmp/xcsh-test.log")));
    }
}
