/// OpenAI-compatible chat-completion client.
///
/// This module provides `OpenAiClient` for making synchronous HTTP requests to a
/// `/chat/completions` endpoint, along with error types and a builder for configuration.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when requesting a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The API answered but the payload was not a usable completion
    #[error("Completion API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was supplied via the builder or `OPENAI_API_KEY`
    #[error("Missing API key: set OPENAI_API_KEY")]
    MissingApiKey,
}

impl LlmError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Text-completion capability used to translate questions.
///
/// This trait enables stubbing in unit tests and keeps the translation
/// pipeline independent of any particular provider.
pub trait CompletionClient: Send + Sync {
    /// Sends a system instruction and a user message, returning the reply text.
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Builder for constructing `OpenAiClient` instances.
///
/// # Examples
///
/// ```
/// use costnav::OpenAiClientBuilder;
///
/// let client = OpenAiClientBuilder::new()
///     .api_key("sk-test")
///     .base_url("http://localhost:8080/v1")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "gpt-3.5-turbo");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAiClientBuilder {
    /// Creates a new `OpenAiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL (e.g., "https://api.openai.com/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name (e.g., "gpt-4o-mini").
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OpenAiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Any setting not given to the builder falls back to its environment
    /// variable, then to a default:
    ///
    /// - `OPENAI_API_KEY` (required, no default)
    /// - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
    /// - `OPENAI_MODEL` (default `gpt-3.5-turbo`)
    /// - `OPENAI_TIMEOUT_SECS` (default 30)
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when no key is available and `InvalidUrl` when
    /// the base URL does not parse.
    pub fn build(self) -> Result<OpenAiClient, LlmError> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let base_url = self
            .base_url
            .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let model = self
            .model
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout = self.timeout.unwrap_or_else(|| {
            let secs = std::env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS);
            Duration::from_secs(secs)
        });

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(LlmError::Network)?;

        Ok(OpenAiClient {
            client,
            api_key,
            base_url,
            model,
        })
    }
}

/// Synchronous client for an OpenAI-compatible chat-completions API.
///
/// One request per call; failures are returned to the caller without retry.
/// It should be constructed using `OpenAiClientBuilder`.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = build_request_body(&self.model, system, user);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(LlmError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), %body, "completion request rejected");
            return Err(LlmError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(LlmError::from_reqwest)?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(LlmError::Serialization)?;
        extract_message_content(&json)
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.chat(system, user)
    }
}

/// Builds a deterministic (temperature 0) two-message chat request.
fn build_request_body(model: &str, system: &str, user: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": user},
        ],
        "temperature": 0,
    })
}

/// Pulls `choices[0].message.content` out of a chat-completions response.
fn extract_message_content(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(message) = json.pointer("/error/message").and_then(|m| m.as_str()) {
        return Err(LlmError::Api {
            message: message.to_string(),
        });
    }

    json.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::Api {
            message: "Missing 'choices[0].message.content' in API response".to_string(),
        })
}
