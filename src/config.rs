//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, then environment
//! variables. The binary applies CLI flags on top of the loaded value.

use crate::error::ShellError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XcshConfig {
    /// Management API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Completion behavior
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Management API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Tenant console URL, e.g. `https://acme.console.ves.volterra.io`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// API token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Namespace a new session starts in
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            default_namespace: default_namespace(),
        }
    }
}

/// Dynamic completion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Deadline for one live fetch
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Lifetime of a cached value list
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Namespaces offered when the live list is unavailable
    #[serde(default = "default_fallback_namespaces")]
    pub fallback_namespaces: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_fallback_namespaces() -> Vec<String> {
    vec!["default".to_string(), "system".to_string()]
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fallback_namespaces: default_fallback_namespaces(),
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Api(String),
    Completion(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Api(msg) => write!(f, "api: {}", msg),
            ValidationError::Completion(msg) => write!(f, "completion: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(format!("url must start with http:// or https:// (got '{}')", url));
            }
        }
        if self.default_namespace.trim().is_empty() {
            return Err("default_namespace cannot be empty".to_string());
        }
        Ok(())
    }
}

impl CompletionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than zero".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("cache_ttl_secs must be greater than zero".to_string());
        }
        if self.fallback_namespaces.is_empty() {
            return Err("fallback_namespaces cannot be empty".to_string());
        }
        Ok(())
    }
}

impl XcshConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = self.api.validate() {
            errors.push(ValidationError::Api(e));
        }
        if let Err(e) = self.completion.validate() {
            errors.push(ValidationError::Completion(e));
        }
        if !["json", "text"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "unknown format '{}'",
                self.logging.format
            )));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into a single `ShellError`.
    pub fn ensure_valid(&self) -> Result<(), ShellError> {
        self.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ShellError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })
    }

    /// TOML rendering with the API token redacted.
    pub fn to_redacted_toml(&self) -> Result<String, ShellError> {
        let mut shown = self.clone();
        if shown.api.token.is_some() {
            shown.api.token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| ShellError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
