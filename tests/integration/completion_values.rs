//! Live completion values: deadline, fallback and cache behavior through the engine.

use super::test_utils::words;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use xcsh::completion::{CompletionEngine, CompletionFlag, SuggestionCategory};
use xcsh::config::CompletionConfig;
use xcsh::dispatch::CommandResult;
use xcsh::error::ShellError;
use xcsh::registry::{CommandDefinition, DomainDefinition, Registry};
use xcsh::session::Session;
use xcsh::values::{CacheKey, DynamicValueProvider, ValueSource};

/// Never answers.
struct HangingSource;

#[async_trait]
impl ValueSource for HangingSource {
    async fn fetch(&self, _key: &CacheKey) -> Result<Vec<String>, ShellError> {
        futures::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

/// Answers after `delay`, counting calls.
struct CountingSource {
    calls: AtomicUsize,
    delay: Duration,
}

#[async_trait]
impl ValueSource for CountingSource {
    async fn fetch(&self, _key: &CacheKey) -> Result<Vec<String>, ShellError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(vec!["prod".to_string(), "staging".to_string()])
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(
        DomainDefinition::new("namespace").command(
            CommandDefinition::new("use", |_, _| Ok(CommandResult::ok()))
                .flag(CompletionFlag::namespace()),
        ),
    );
    registry
}

fn provider(source: Arc<dyn ValueSource>) -> Arc<DynamicValueProvider> {
    Arc::new(DynamicValueProvider::from_config(
        source,
        &CompletionConfig::default(),
    ))
}

#[tokio::test(start_paused = true)]
async fn test_hanging_fetch_falls_back_within_deadline() {
    let registry = registry();
    let engine = CompletionEngine::new(&registry, provider(Arc::new(HangingSource)));
    let session = Session::default();

    let started = Instant::now();
    let suggestions = engine
        .complete("namespace", &words(&["use", "--namespace"]), "", &session)
        .await;
    let elapsed = started.elapsed();

    let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["default", "system"]);
    assert!(suggestions.iter().all(|s| s.category == SuggestionCategory::Value));
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed <= Duration::from_millis(3100), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_same_key_within_ttl_fetches_once() {
    let source = Arc::new(CountingSource {
        calls: AtomicUsize::new(0),
        delay: Duration::from_millis(50),
    });
    let registry = registry();
    let engine = CompletionEngine::new(&registry, provider(source.clone()));
    let session = Session::default();
    let typed = words(&["use", "-n"]);

    let first = engine.complete("namespace", &typed, "", &session).await;
    let second = engine.complete("namespace", &typed, "st", &session).await;
    assert_eq!(first.len(), 2);
    assert_eq!(second[0].text, "staging");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(301)).await;
    engine.complete("namespace", &typed, "", &session).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_populates_cache_after_fallback() {
    let source = Arc::new(CountingSource {
        calls: AtomicUsize::new(0),
        delay: Duration::from_secs(5),
    });
    let registry = registry();
    let engine = CompletionEngine::new(&registry, provider(source.clone()));
    let session = Session::default();
    let typed = words(&["use", "--namespace"]);

    let fallback: Vec<String> = engine
        .complete("namespace", &typed, "", &session)
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(fallback, vec!["default", "system"]);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let live: Vec<String> = engine
        .complete("namespace", &typed, "", &session)
        .await
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(live, vec!["prod", "staging"]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
