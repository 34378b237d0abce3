//! Management API access used by command handlers.

use crate::config::ApiConfig;
use crate::error::ShellError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Synchronous management API. Handlers run outside the async runtime.
pub trait ManagementApi: Send + Sync {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ShellError>;
    fn post(&self, path: &str, body: &Value) -> Result<Value, ShellError>;
    fn put(&self, path: &str, body: &Value) -> Result<Value, ShellError>;
    fn delete(&self, path: &str) -> Result<Value, ShellError>;
}

pub(crate) const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URL without trailing slash or trailing `/api` segment.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .to_string()
}

pub(crate) fn map_http_error(error: reqwest::Error) -> ShellError {
    if error.is_timeout() {
        ShellError::ApiRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ShellError::ApiRequestFailed(format!("Connection error: {}", error))
    } else {
        ShellError::ApiRequestFailed(format!("HTTP error: {}", error))
    }
}

pub(crate) fn status_error(status: StatusCode, path: &str, body: &str) -> ShellError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect());
    match status.as_u16() {
        401 | 403 => ShellError::ApiAuthFailed(format!("{} ({})", path, status)),
        404 => ShellError::ApiNotFound(path.to_string()),
        _ => ShellError::ApiRequestFailed(format!(
            "Request to {} failed with status {}: {}",
            path, status, detail
        )),
    }
}

/// Blocking HTTP client with bearer-token authentication
pub struct HttpManagementApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpManagementApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ShellError> {
        let client = Client::builder()
            .connect_timeout(API_CONNECT_TIMEOUT)
            .timeout(API_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShellError::ApiNotConfigured(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    /// Client for the configured API, or `None` when no URL is set.
    pub fn from_config(config: &ApiConfig) -> Result<Option<Self>, ShellError> {
        match &config.url {
            Some(url) => Self::new(url, config.token.clone()).map(Some),
            None => Ok(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder, path: &str) -> Result<Value, ShellError> {
        let request = match &self.token {
            Some(token) => request.header("Authorization", format!("APIToken {}", token)),
            None => request,
        };
        let response = request.send().map_err(map_http_error)?;
        let status = response.status();
        let body = response.text().map_err(map_http_error)?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "API response");
        if !status.is_success() {
            return Err(status_error(status, path, &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ManagementApi for HttpManagementApi {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ShellError> {
        self.send(self.client.get(self.url(path)).query(query), path)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ShellError> {
        self.send(self.client.post(self.url(path)).json(body), path)
    }

    fn put(&self, path: &str, body: &Value) -> Result<Value, ShellError> {
        self.send(self.client.put(self.url(path)).json(body), path)
    }

    fn delete(&self, path: &str) -> Result<Value, ShellError> {
        self.send(self.client.delete(self.url(path)), path)
    }
}
