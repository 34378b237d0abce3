//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("api.default_namespace", "default")?
        .set_default("completion.timeout_ms", 3000)?
        .set_default("completion.cache_ttl_secs", 300)?
        .set_default("completion.fallback_namespaces", vec!["default", "system"])
}
