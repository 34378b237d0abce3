//! Where dynamic completion values come from.

use super::cache::CacheKey;
use crate::api::{map_http_error, normalize_base_url, status_error, API_CONNECT_TIMEOUT};
use crate::config::ApiConfig;
use crate::error::ShellError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Fetches the value list for one cache key
#[async_trait]
pub trait ValueSource: Send + Sync {
    async fn fetch(&self, key: &CacheKey) -> Result<Vec<String>, ShellError>;
}

#[derive(Debug, Deserialize)]
struct ItemList {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    name: Option<String>,
    metadata: Option<ItemMetadata>,
}

#[derive(Debug, Deserialize)]
struct ItemMetadata {
    name: Option<String>,
}

/// Names from a list response: `items[].name`, falling back to `items[].metadata.name`.
pub fn parse_item_names(body: &str) -> Result<Vec<String>, ShellError> {
    let list: ItemList = serde_json::from_str(body)
        .map_err(|e| ShellError::Completion(format!("unexpected list response: {}", e)))?;
    Ok(list
        .items
        .into_iter()
        .filter_map(|item| item.name.or_else(|| item.metadata.and_then(|m| m.name)))
        .filter(|name| !name.is_empty())
        .collect())
}

/// Async HTTP source against the management API
pub struct HttpValueSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpValueSource {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ShellError> {
        let client = Client::builder()
            .connect_timeout(API_CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ShellError::Completion(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    pub fn from_config(config: &ApiConfig, timeout: Duration) -> Result<Option<Self>, ShellError> {
        match &config.url {
            Some(url) => Self::new(url, config.token.clone(), timeout).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ValueSource for HttpValueSource {
    async fn fetch(&self, key: &CacheKey) -> Result<Vec<String>, ShellError> {
        let (path, query) = key.request();
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&query);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("APIToken {}", token));
        }
        let response = request.send().await.map_err(map_http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_http_error)?;
        if !status.is_success() {
            return Err(status_error(status, &path, &body));
        }
        let names = parse_item_names(&body)?;
        debug!(%path, count = names.len(), "Fetched completion values");
        Ok(names)
    }
}

/// Source used when no API is configured: every fetch fails fast.
#[derive(Debug, Default)]
pub struct OfflineValueSource;

#[async_trait]
impl ValueSource for OfflineValueSource {
    async fn fetch(&self, _key: &CacheKey) -> Result<Vec<String>, ShellError> {
        Err(ShellError::ApiNotConfigured("no API URL configured".to_string()))
    }
}
