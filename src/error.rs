//! Error types for the xcsh command shell.

use thiserror::Error;

/// Registration-time validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Domain already registered: {0}")]
    DuplicateDomain(String),

    #[error("Domain alias '{alias}' of '{domain}' collides with domain '{existing}'")]
    DomainAliasConflict {
        domain: String,
        alias: String,
        existing: String,
    },

    #[error("Alias '{alias}' of '{command}' in '{scope}' is already used by '{existing}'")]
    DuplicateAlias {
        scope: String,
        alias: String,
        command: String,
        existing: String,
    },

    #[error("Alias '{alias}' of '{command}' in '{scope}' shadows a sibling command name")]
    AliasShadowsCommand {
        scope: String,
        alias: String,
        command: String,
    },

    #[error("'{name}' in '{scope}' is registered both as a group and as a command")]
    GroupCommandCollision { scope: String, name: String },

    #[error("Empty name in scope '{0}'")]
    EmptyName(String),
}

/// Shell-level errors surfaced by dispatch, completion, configuration and API access
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Unknown command \"{token}\" for {scope}")]
    UnknownCommand { scope: String, token: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Command failed: {0}")]
    Handler(String),

    #[error("API client not configured: {0}")]
    ApiNotConfigured(String),

    #[error("API authentication failed: {0}")]
    ApiAuthFailed(String),

    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    #[error("API resource not found: {0}")]
    ApiNotFound(String),

    #[error("Completion fetch failed: {0}")]
    Completion(String),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ShellError {
    fn from(err: config::ConfigError) -> Self {
        ShellError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::Handler(format!("JSON error: {}", err))
    }
}

impl ShellError {
    /// Short error label carried in `CommandResult::error`.
    pub fn label(&self) -> &'static str {
        match self {
            ShellError::UnknownDomain(_) => "Unknown domain",
            ShellError::UnknownCommand { .. } => "Unknown command",
            ShellError::InvalidArguments(_) => "Invalid arguments",
            ShellError::Handler(_) => "Command failed",
            ShellError::ApiNotConfigured(_) => "API not configured",
            ShellError::ApiAuthFailed(_) => "Authentication failed",
            ShellError::ApiRequestFailed(_) => "API request failed",
            ShellError::ApiNotFound(_) => "Not found",
            ShellError::Completion(_) => "Completion failed",
            ShellError::Registration(_) => "Registration error",
            ShellError::ConfigError(_) => "Configuration error",
            ShellError::IoError(_) => "I/O error",
        }
    }
}
