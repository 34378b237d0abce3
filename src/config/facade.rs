//! Single entry point for loading configuration.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::XcshConfig;
use crate::error::ShellError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file, then the environment.
    pub fn load() -> Result<XcshConfig, ShellError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;
        let config: XcshConfig = builder.build()?.try_deserialize()?;
        debug!(api = config.api.url.is_some(), "Loaded configuration");
        Ok(config)
    }

    /// Defaults, then `path` (which must exist), then the environment.
    pub fn load_from_file(path: &Path) -> Result<XcshConfig, ShellError> {
        if !path.exists() {
            return Err(ShellError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;
        let config: XcshConfig = builder.build()?.try_deserialize()?;
        debug!(config_path = %path.display(), "Loaded configuration from file");
        Ok(config)
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<XcshConfig, ShellError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
