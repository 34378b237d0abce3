//! Shell session: namespace, tenant, navigation context, history and API handle.
//!
//! One session lives for the duration of a shell process. Command handlers receive
//! it mutably; the completion engine only reads it.

use crate::api::ManagementApi;
use crate::error::ShellError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

const MAX_HISTORY: usize = 1000;

/// Navigation context inside the interactive shell (`xcsh:load_balancer/list>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextPath {
    domain: Option<String>,
    group: Option<String>,
}

impl ContextPath {
    pub fn is_root(&self) -> bool {
        self.domain.is_none()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Enter a domain, dropping any group context.
    pub fn enter_domain(&mut self, domain: impl Into<String>) {
        self.domain = Some(domain.into());
        self.group = None;
    }

    /// Enter a group of the current domain. No-op at root.
    pub fn enter_group(&mut self, group: impl Into<String>) {
        if self.domain.is_some() {
            self.group = Some(group.into());
        }
    }

    /// Go up one level. Returns false when already at root.
    pub fn navigate_up(&mut self) -> bool {
        if self.group.take().is_some() {
            return true;
        }
        self.domain.take().is_some()
    }

    pub fn reset(&mut self) {
        self.domain = None;
        self.group = None;
    }

    /// Tokens implied by the context, prepended to relative command lines.
    pub fn prefix(&self) -> Vec<String> {
        self.domain
            .iter()
            .chain(self.group.iter())
            .cloned()
            .collect()
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.domain, &self.group) {
            (None, _) => write!(f, "/"),
            (Some(d), None) => write!(f, "{}", d),
            (Some(d), Some(g)) => write!(f, "{}/{}", d, g),
        }
    }
}

/// One line of shell history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub line: String,
    pub at: DateTime<Utc>,
}

/// Per-process shell session state
pub struct Session {
    namespace: String,
    tenant: Option<String>,
    context: ContextPath,
    history: Vec<HistoryEntry>,
    last_exit_code: i32,
    api: Option<Arc<dyn ManagementApi>>,
}

impl Session {
    /// Create a session without an API connection.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            tenant: None,
            context: ContextPath::default(),
            history: Vec::new(),
            last_exit_code: 0,
            api: None,
        }
    }

    /// Attach a management API handle used by command handlers.
    pub fn with_api(mut self, api: Arc<dyn ManagementApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_tenant(mut self, tenant: Option<String>) -> Self {
        self.tenant = tenant;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn context(&self) -> &ContextPath {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ContextPath {
        &mut self.context
    }

    /// API handle, or `ApiNotConfigured` when the shell runs offline.
    pub fn api(&self) -> Result<&dyn ManagementApi, ShellError> {
        self.api.as_deref().ok_or_else(|| {
            ShellError::ApiNotConfigured(
                "set XCSH_API_URL and XCSH_API_TOKEN or add [api] to the config file".to_string(),
            )
        })
    }

    pub fn has_api(&self) -> bool {
        self.api.is_some()
    }

    pub fn record(&mut self, line: &str) {
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(HistoryEntry {
            line: line.to_string(),
            at: Utc::now(),
        });
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    pub fn set_last_exit_code(&mut self, code: i32) {
        self.last_exit_code = code;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("namespace", &self.namespace)
            .field("tenant", &self.tenant)
            .field("context", &self.context)
            .field("history", &self.history.len())
            .field("api", &self.api.is_some())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Tenant name from a console URL: `https://acme.console.ves.volterra.io` → `acme`.
pub fn tenant_from_url(url: &str) -> Option<String> {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let host = without_scheme.split(['/', ':']).next()?;
    let first = host.split('.').next()?;
    if first.is_empty() || host == first || first == "localhost" {
        return None;
    }
    Some(first.to_string())
}
