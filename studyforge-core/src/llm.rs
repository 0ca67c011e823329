//! LLM provider abstraction.
//!
//! Defines the `LlmProvider` trait for model-agnostic chat completions and a
//! mock implementation for tests. Only plain-text two-message exchanges are
//! needed here; tool calling and streaming are out of scope.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    /// Model override; the provider's configured model when `None`.
    pub model: Option<String>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// A chat completion response: the top completion's text, verbatim.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: Option<String>,
}

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// Mock LLM provider for testing: returns queued responses in order.
pub struct MockLlmProvider {
    model: String,
    responses: std::sync::Mutex<Vec<Result<CompletionResponse, LlmError>>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns the given text.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue(Ok(Self::text_response(text)));
        }
        provider
    }

    /// Create a provider that always fails with the given error constructor.
    pub fn with_error(make_error: impl Fn() -> LlmError) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue(Err(make_error()));
        }
        provider
    }

    /// Queue a result to be returned by the next `complete` call.
    /// Results are consumed oldest first.
    pub fn queue(&self, result: Result<CompletionResponse, LlmError>) {
        self.responses.lock().unwrap().push(result);
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: text.to_string(),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::ApiRequest {
                message: "MockLlmProvider has no queued responses".to_string(),
            });
        }
        responses.remove(0)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user(text)],
            temperature: 0.7,
            max_tokens: None,
            model: None,
        }
    }

    #[tokio::test]
    async fn test_mock_returns_queued_responses_in_order() {
        let provider = MockLlmProvider::new();
        provider.queue(Ok(MockLlmProvider::text_response("first")));
        provider.queue(Ok(MockLlmProvider::text_response("second")));

        let a = provider.complete(request("hi")).await.unwrap();
        let b = provider.complete(request("hi")).await.unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
    }

    #[tokio::test]
    async fn test_mock_exhausted_is_an_error() {
        let provider = MockLlmProvider::new();
        let result = provider.complete(request("hi")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_error_queue() {
        let provider = MockLlmProvider::with_error(|| LlmError::AuthFailed {
            provider: "mock".to_string(),
        });
        let err = provider.complete(request("hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }
}
