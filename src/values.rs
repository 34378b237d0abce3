//! Dynamic Value Provider: live completion values (namespaces, resource names) with a
//! fetch deadline, a TTL cache and static fallbacks.
//!
//! Fetches run on spawned tokio tasks and are shared between concurrent callers for the
//! same key. A caller that gives up at the deadline leaves the task running; its result
//! still lands in the cache for the next completion.

mod cache;
mod source;

pub use cache::{CacheEntry, CacheKey, ValueCache, NAMESPACES_ENDPOINT};
pub use source::{parse_item_names, HttpValueSource, OfflineValueSource, ValueSource};

use crate::api::ResourceType;
use crate::config::CompletionConfig;
use crate::error::ShellError;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of racing a fetch against its deadline
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Fulfilled(T),
    TimedOut,
    Failed(ShellError),
}

/// Await `fetch`, giving up after `deadline`.
pub async fn race<F, T>(fetch: F, deadline: Duration) -> FetchOutcome<T>
where
    F: Future<Output = Result<T, ShellError>>,
{
    match tokio::time::timeout(deadline, fetch).await {
        Ok(Ok(value)) => FetchOutcome::Fulfilled(value),
        Ok(Err(err)) => FetchOutcome::Failed(err),
        Err(_) => FetchOutcome::TimedOut,
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Vec<String>, String>>>;

/// Cached, deadline-bounded access to dynamic completion values
pub struct DynamicValueProvider {
    source: Arc<dyn ValueSource>,
    cache: Arc<ValueCache>,
    in_flight: Arc<Mutex<HashMap<CacheKey, SharedFetch>>>,
    timeout: Duration,
    fallback_namespaces: Vec<String>,
}

impl DynamicValueProvider {
    pub fn new(
        source: Arc<dyn ValueSource>,
        timeout: Duration,
        ttl: Duration,
        fallback_namespaces: Vec<String>,
    ) -> Self {
        Self {
            source,
            cache: Arc::new(ValueCache::new(ttl)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            timeout,
            fallback_namespaces,
        }
    }

    pub fn from_config(source: Arc<dyn ValueSource>, config: &CompletionConfig) -> Self {
        Self::new(
            source,
            config.timeout(),
            config.cache_ttl(),
            config.fallback_namespaces.clone(),
        )
    }

    /// Provider that never reaches a server; namespaces come from the fallback list.
    pub fn offline(config: &CompletionConfig) -> Self {
        Self::from_config(Arc::new(OfflineValueSource), config)
    }

    /// Values for `key`: cache hit, else a fetch bounded by the deadline, else `fallback`.
    pub async fn lookup(&self, key: CacheKey, fallback: &[String]) -> Vec<String> {
        if let Some(values) = self.cache.get(&key) {
            debug!(endpoint = %key.endpoint, "Completion cache hit");
            return values;
        }
        debug!(endpoint = %key.endpoint, "Completion cache miss");

        let fetch = self.shared_fetch(key.clone());
        let fetch = async move { fetch.await.map_err(ShellError::Completion) };
        match race(fetch, self.timeout).await {
            FetchOutcome::Fulfilled(values) => values,
            FetchOutcome::TimedOut => {
                warn!(
                    endpoint = %key.endpoint,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Completion fetch timed out; using fallback"
                );
                fallback.to_vec()
            }
            FetchOutcome::Failed(err) => {
                debug!(endpoint = %key.endpoint, error = %err, "Completion fetch failed; using fallback");
                fallback.to_vec()
            }
        }
    }

    /// Namespace names, falling back to the configured list.
    pub async fn namespaces(&self) -> Vec<String> {
        self.lookup(CacheKey::namespaces(), &self.fallback_namespaces)
            .await
    }

    /// Names of `resource` objects in `namespace`; empty on failure.
    pub async fn resource_names(&self, resource: &ResourceType, namespace: &str) -> Vec<String> {
        let mut key = CacheKey::new(&resource.api_path);
        if resource.supports_namespace {
            key = key.param("namespace", namespace);
        }
        self.lookup(key, &[]).await
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn fallback_namespaces(&self) -> &[String] {
        &self.fallback_namespaces
    }

    /// Join the in-flight fetch for `key` or spawn a new one.
    fn shared_fetch(&self, key: CacheKey) -> SharedFetch {
        let mut in_flight = self.in_flight.lock();
        if let Some(existing) = in_flight.get(&key) {
            debug!(endpoint = %key.endpoint, "Joining in-flight completion fetch");
            return existing.clone();
        }

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let registry = Arc::clone(&self.in_flight);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch(&task_key).await.map_err(|e| e.to_string());
            if let Ok(values) = &result {
                cache.insert(task_key.clone(), values.clone());
            }
            registry.lock().remove(&task_key);
            result
        });

        let shared = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(format!("fetch task failed: {}", e)),
            }
        }
        .boxed()
        .shared();
        in_flight.insert(key, shared.clone());
        shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ValueSource for CountingSource {
        async fn fetch(&self, key: &CacheKey) -> Result<Vec<String>, ShellError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ShellError::ApiRequestFailed("503".to_string()));
            }
            let (path, _) = key.request();
            Ok(vec![format!("from:{}", path)])
        }
    }

    fn provider(source: Arc<CountingSource>) -> DynamicValueProvider {
        DynamicValueProvider::new(
            source,
            Duration::from_secs(3),
            Duration::from_secs(300),
            vec!["default".to_string(), "system".to_string()],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_falls_back_within_deadline() {
        let source = CountingSource::new(Duration::from_secs(10));
        let values = provider(Arc::clone(&source));
        let started = tokio::time::Instant::now();
        let namespaces = values.namespaces().await;
        assert!(started.elapsed() <= Duration::from_millis(3100));
        assert_eq!(namespaces, vec!["default", "system"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_fetch_still_populates_cache() {
        let source = CountingSource::new(Duration::from_secs(5));
        let values = provider(Arc::clone(&source));
        assert_eq!(values.namespaces().await, vec!["default", "system"]);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(
            values.namespaces().await,
            vec!["from:/api/web/namespaces".to_string()]
        );
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_within_ttl_and_refetch_after() {
        let source = CountingSource::new(Duration::from_millis(10));
        let values = provider(Arc::clone(&source));
        values.namespaces().await;
        values.namespaces().await;
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        values.namespaces().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_lookups_share_one_fetch() {
        let source = CountingSource::new(Duration::from_millis(500));
        let values = provider(Arc::clone(&source));
        let (a, b) = tokio::join!(values.namespaces(), values.namespaces());
        assert_eq!(a, b);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = CountingSource::failing();
        let values = provider(Arc::clone(&source));
        let lb = ResourceType::namespaced("origin_pool", "Origin pool", "/p/{namespace}/origin_pools");
        assert!(values.resource_names(&lb, "prod").await.is_empty());
        assert!(values.resource_names(&lb, "prod").await.is_empty());
        assert_eq!(source.calls(), 2);
        assert_eq!(values.namespaces().await, vec!["default", "system"]);
    }

    #[tokio::test]
    async fn test_resource_keys_are_per_namespace_and_clearable() {
        let source = CountingSource::new(Duration::ZERO);
        let values = provider(Arc::clone(&source));
        let pool = ResourceType::namespaced("origin_pool", "Origin pool", "/p/{namespace}/origin_pools");
        assert_eq!(
            values.resource_names(&pool, "prod").await,
            vec!["from:/p/prod/origin_pools".to_string()]
        );
        values.resource_names(&pool, "staging").await;
        assert_eq!(values.cached_entries(), 2);

        values.invalidate(&CacheKey::new("/p/{namespace}/origin_pools").param("namespace", "prod"));
        assert_eq!(values.cached_entries(), 1);
        values.clear();
        assert_eq!(values.cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_race_outcomes() {
        let ok = race(async { Ok::<_, ShellError>(1) }, Duration::from_secs(1)).await;
        assert!(matches!(ok, FetchOutcome::Fulfilled(1)));
        let failed = race(
            async { Err::<u8, _>(ShellError::Completion("x".to_string())) },
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(failed, FetchOutcome::Failed(_)));
    }
}
