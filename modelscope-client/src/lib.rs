//! ModelScope HTTP Client
//!
//! A small, type-safe client for the ModelScope API-Inference service.
//!
//! The client wraps the OpenAI-compatible chat and embedding endpoints plus
//! the asynchronous image generation task API. It holds only immutable
//! configuration (base URL, access token, a pooled `reqwest::Client`), so a
//! single instance can be cloned and shared across concurrently running jobs.
//!
//! # Example
//!
//! ```no_run
//! use modelscope_client::{ClientConfig, InferenceClient};
//! use modelscope_core::dto::image::GenerationRequest;
//! use modelscope_core::domain::job::JobRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InferenceClient::new(ClientConfig::new("ms-xxxxxxxx"))?;
//!
//! let request = JobRequest::new("a red fox in the snow");
//! let handle = client.submit_image_job(&GenerationRequest::from(&request)).await?;
//! let status = client.fetch_task_status(&handle).await?;
//! println!("{} is {}", handle, status.task_status);
//! # Ok(())
//! # }
//! ```

mod chat;
mod embeddings;
pub mod error;
mod images;
mod models;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Public endpoint of the API-Inference service
pub const DEFAULT_BASE_URL: &str = "https://api-inference.modelscope.cn/v1";

/// Connection settings for [`InferenceClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the version segment (e.g. "https://api-inference.modelscope.cn/v1")
    pub base_url: String,
    /// Access token sent as a bearer credential on every call
    pub access_token: String,
    /// Per-request timeout; `None` leaves the reqwest default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration for the public endpoint
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(ClientError::ConfigError(
                "access token cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }

        Ok(())
    }
}

/// HTTP client for the ModelScope inference API
///
/// Endpoint methods are organized by capability:
/// - Image generation (submit job, fetch task status)
/// - Chat completions (text and vision)
/// - Embeddings
/// - Model listing (also used to verify credentials)
#[derive(Debug, Clone)]
pub struct InferenceClient {
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token
    access_token: String,
    /// HTTP client instance
    client: Client,
}

impl InferenceClient {
    /// Create a new inference client
    ///
    /// # Arguments
    /// * `config` - Base URL, access token and timeout
    ///
    /// # Example
    /// ```
    /// use modelscope_client::{ClientConfig, InferenceClient};
    ///
    /// let client = InferenceClient::new(ClientConfig::new("ms-token")).unwrap();
    /// assert_eq!(client.base_url(), "https://api-inference.modelscope.cn/v1");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Self::with_client(config, client)
    }

    /// Create a new inference client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, connection pools, etc.
    /// The `request_timeout` of `config` is ignored; configure it on `client`.
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
            client,
        })
    }

    /// Get the base URL of the inference API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.client.get(url).bearer_auth(&self.access_token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.client.post(url).bearer_auth(&self.access_token)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx statuses become [`ClientError::ApiError`]; a body that cannot
    /// be read is a transport failure; a body of the wrong shape is a
    /// [`ClientError::ParseError`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Pulls a human-readable message out of an error body
///
/// Looks at `error.message`, then `message`, then a string `error`, and
/// finally falls back to the raw body when it is not JSON.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error").filter(|e| e.is_string()))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = InferenceClient::new(ClientConfig::new("token")).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = ClientConfig::new("token").with_base_url("http://localhost:8080/v1/");
        let client = InferenceClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.url("/tasks/abc"), "http://localhost:8080/v1/tasks/abc");
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = InferenceClient::with_client(ClientConfig::new("token"), Client::new()).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            InferenceClient::new(ClientConfig::new("  ")),
            Err(ClientError::ConfigError(_))
        ));
        assert!(matches!(
            InferenceClient::new(ClientConfig::new("t").with_base_url("ftp://host")),
            Err(ClientError::ConfigError(_))
        ));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"bad token"}}"#).as_deref(),
            Some("bad token")
        );
        assert_eq!(
            extract_error_message(r#"{"message":"quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(extract_error_message("upstream timeout").as_deref(), Some("upstream timeout"));
        assert_eq!(extract_error_message(r#"{"code":1}"#), None);
        assert_eq!(extract_error_message(""), None);
    }
}
