//! Built-in domains and the process registry.
//!
//! Generated API domains come from the catalog; hand-written domains are registered on
//! top and win on name clashes.

pub mod ai;
pub mod login;
pub mod namespace;

use crate::api::builtin_domains;
use crate::config::XcshConfig;
use crate::registry::Registry;
use crate::values::DynamicValueProvider;
use std::sync::Arc;
use tracing::debug;

/// Registry with every catalog domain, extension and hand-written domain.
pub fn builtin_registry(config: &XcshConfig, values: Arc<DynamicValueProvider>) -> Registry {
    let mut registry = Registry::new();
    registry.register_extension(ai::DOMAIN, ai::query_command());
    for spec in builtin_domains() {
        registry.register_api(spec);
    }
    registry.register(namespace::domain(&config.api, values));
    registry.register(login::domain(&config.api));
    debug!(domains = registry.len(), "Built registry");
    registry
}
