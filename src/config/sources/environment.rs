//! Environment source: `XCSH_API_URL`, `XCSH_API_TOKEN`, `XCSH_DEFAULT_NAMESPACE`, and
//! any key in the structured form `XCSH__SECTION__KEY` (e.g. `XCSH__COMPLETION__TIMEOUT_MS`).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

const SHORTHANDS: [(&str, &str); 3] = [
    ("XCSH_API_URL", "api.url"),
    ("XCSH_API_TOKEN", "api.token"),
    ("XCSH_DEFAULT_NAMESPACE", "api.default_namespace"),
];

/// Add environment overrides to builder.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder = builder.add_source(
        Environment::with_prefix("XCSH")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("completion.fallback_namespaces"),
    );
    for (variable, key) in SHORTHANDS {
        let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(key, value)?;
    }
    Ok(builder)
}
