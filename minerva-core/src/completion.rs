//! Completion-service abstraction over a locally hosted language model.
//!
//! The pipeline only ever sees the [`CompletionService`] trait; the bundled
//! implementation talks to Ollama's `/api/generate` endpoint. Failures are
//! typed ([`CompletionError`]) so that callers can resolve every one of them
//! to a labeled fallback string instead of crashing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::OllamaConfig;
use crate::error::CompletionError;

/// Generation options passed with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// Context window the model should reserve.
    pub context_window: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 1500,
            context_window: 4096,
        }
    }
}

impl CompletionOptions {
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            context_window: config.context_window,
        }
    }
}

/// A service that turns a prompt into generated text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion. Timeouts, connection failures, and non-success
    /// statuses are all surfaced as [`CompletionError`]; the caller decides
    /// the fallback.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// Client for the Ollama HTTP API.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("Minerva/0.1")
            .build()
            .map_err(|e| CompletionError::Connection {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": options.max_tokens,
                "num_ctx": options.context_window,
            },
        });

        tracing::debug!("Ollama generate request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    CompletionError::Connection {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| CompletionError::Connection {
                    message: format!("Failed to parse Ollama response: {}", e),
                })?;

        let text = body
            .get("response")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock completion service for deterministic tests.
///
/// Returns queued responses in order; once the queue is empty it keeps
/// returning the last queued text. `failing()` simulates an unreachable
/// provider.
pub struct MockCompletionService {
    responses: Mutex<Vec<String>>,
    fail: bool,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A mock that always returns the given text.
    pub fn with_response(text: &str) -> Self {
        let mock = Self::new();
        mock.queue_response(text);
        mock
    }

    /// A mock whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Queue a response to be returned by a later `complete` call.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(text.to_string());
    }
}

impl Default for MockCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(
        &self,
        _prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        if self.fail {
            return Err(CompletionError::Connection {
                message: "mock provider is configured to fail".into(),
            });
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            Ok(responses.remove(0))
        } else if let Some(last) = responses.first() {
            Ok(last.clone())
        } else {
            Ok("Mock completion with no queued responses.".into())
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_queued_responses_in_order() {
        let mock = MockCompletionService::new();
        mock.queue_response("first");
        mock.queue_response("second");

        let opts = CompletionOptions::default();
        assert_eq!(mock.complete("p", &opts).await.unwrap(), "first");
        assert_eq!(mock.complete("p", &opts).await.unwrap(), "second");
        // Last response repeats.
        assert_eq!(mock.complete("p", &opts).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let mock = MockCompletionService::failing();
        let err = mock
            .complete("p", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Connection { .. }));
    }

    #[test]
    fn test_options_from_config() {
        let config = OllamaConfig::default();
        let opts = CompletionOptions::from_config(&config);
        assert!((opts.temperature - 0.4).abs() < f64::EPSILON);
        assert_eq!(opts.max_tokens, 1500);
        assert_eq!(opts.context_window, 4096);
    }

    #[test]
    fn test_ollama_client_model_name() {
        let client = OllamaClient::new(&OllamaConfig::default()).unwrap();
        assert_eq!(client.model_name(), "llama3.2:1b");
    }
}
