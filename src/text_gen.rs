//! Text-generation client: the enrichment service boundary
//!
//! Defines the client trait and response types for the external model.
//! Two implementations:
//! - `AnthropicClient`: calls the Messages API over HTTPS (production)
//! - `MockClient`: returns queued responses (testing)
//!
//! The credential is passed in by the caller; nothing here reads the
//! process environment.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// One prompt sent to the service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub max_tokens: u32,
    pub prompt: String,
}

/// Errors from text-generation client operations.
#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    #[error("text generation service not available: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Client trait for the text-generation service.
///
/// Abstracts over transport so the enrichment phase can be exercised
/// without network access.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Whether the client has what it needs to make calls (e.g. a credential).
    async fn is_available(&self) -> bool;

    /// Send one prompt and return the free-text reply.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic Messages API
pub struct AnthropicClient {
    http_client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl AnthropicClient {
    /// Create a client; without a key the client reports unavailable.
    pub fn new(api_key: Option<String>) -> Result<Self, TextGenError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: ANTHROPIC_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (proxies, test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextGenerationClient for AnthropicClient {
    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TextGenError::Unavailable("no API key configured".to_string()))?;

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} (model {})", url, request.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::ParseError(e.to_string()))?;

        let text: Vec<String> = parsed
            .content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text)
            .collect();

        if text.is_empty() {
            return Err(TextGenError::ParseError(
                "response contained no text blocks".to_string(),
            ));
        }
        Ok(text.join(""))
    }
}

/// Mock client for testing; returns queued responses in order.
pub struct MockClient {
    available: bool,
    responses: Mutex<VecDeque<Result<String, TextGenError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockClient {
    /// Create a mock client that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client that reports as unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    /// Queue a reply for the next call.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure for the next call.
    pub fn with_failure(self, error: TextGenError) -> Self {
        self.push(Err(error));
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn push(&self, response: Result<String, TextGenError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }
}

#[async_trait]
impl TextGenerationClient for MockClient {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenError> {
        if !self.available {
            return Err(TextGenError::Unavailable(
                "mock client configured as unavailable".to_string(),
            ));
        }

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(TextGenError::ParseError("no mock response queued".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: "test-model".to_string(),
            max_tokens: 100,
            prompt: prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn mock_returns_responses_in_order() {
        let client = MockClient::available()
            .with_response("first")
            .with_response("second");

        assert!(client.is_available().await);
        assert_eq!(client.generate(&request("a")).await.unwrap(), "first");
        assert_eq!(client.generate(&request("b")).await.unwrap(), "second");

        let seen: Vec<_> = client.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn mock_unavailable_client_returns_error() {
        let client = MockClient::unavailable();

        assert!(!client.is_available().await);
        let err = client.generate(&request("a")).await.unwrap_err();
        assert!(matches!(err, TextGenError::Unavailable(_)));
    }

    #[tokio::test]
    async fn mock_queued_failure_is_returned() {
        let client = MockClient::available()
            .with_failure(TextGenError::Unavailable("down".to_string()));
        assert!(client.generate(&request("a")).await.is_err());
    }

    #[tokio::test]
    async fn anthropic_client_without_key_is_unavailable() {
        let client = AnthropicClient::new(None).unwrap();
        assert!(!client.is_available().await);

        let blank = AnthropicClient::new(Some("  ".to_string())).unwrap();
        assert!(!blank.is_available().await);

        let err = client.generate(&request("a")).await.unwrap_err();
        assert!(matches!(err, TextGenError::Unavailable(_)));
    }

    #[test]
    fn messages_request_wire_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            messages: vec![RequestMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn messages_response_text_blocks_parse() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"id":"msg_1","content":[{"type":"text","text":"RELATIONSHIP: a -> b | semantic | 0.5"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.content.len(), 1);
        assert_eq!(parsed.content[0].text.as_deref(), Some("RELATIONSHIP: a -> b | semantic | 0.5"));
    }
}
