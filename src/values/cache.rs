//! TTL cache for dynamically fetched completion values.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::time::Instant;

/// Namespace list endpoint
pub const NAMESPACES_ENDPOINT: &str = "/api/web/namespaces";

/// Endpoint plus parameters identifying one fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Path template; `{param}` segments are filled from `params`
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn namespaces() -> Self {
        Self::new(NAMESPACES_ENDPOINT)
    }

    /// Request path with placeholders substituted, and the leftover params as query pairs.
    pub fn request(&self) -> (String, Vec<(String, String)>) {
        let mut path = self.endpoint.clone();
        let mut query = Vec::new();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            if path.contains(&placeholder) {
                path = path.replace(&placeholder, value);
            } else {
                query.push((key.clone(), value.clone()));
            }
        }
        (path, query)
    }
}

/// Cached values with their fetch time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub values: Vec<String>,
    pub fetched_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < self.ttl
    }
}

/// Successful fetches keyed by `CacheKey`. Failures are never stored.
#[derive(Debug)]
pub struct ValueCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ValueCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh values for `key`; expired entries are dropped.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(Instant::now()) => Some(entry.values.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: CacheKey, values: Vec<String>) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                values,
                fetched_at: Instant::now(),
                ttl: self.ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.lock().remove(key);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
