//! Report generation — the single LLM call of the pipeline.
//!
//! Sends a fixed system instruction plus the built prompt as a two-message
//! exchange and returns the top completion verbatim. No post-validation of
//! length, structure, or reference authenticity happens here; downstream
//! consumers must not assume the report conforms to the requested outline.

use crate::config::RetryConfig;
use crate::error::LlmError;
use crate::llm::{CompletionRequest, LlmProvider, Message};
use std::sync::Arc;
use tracing::{debug, info};

/// Fixed system instruction for the academic-writer persona.
const SYSTEM_INSTRUCTION: &str = "You are a highly knowledgeable AI academic writer.";

/// A generated report: untrusted free-form text from the model.
#[derive(Debug, Clone)]
pub struct Report {
    /// Raw report text, verbatim from the completion.
    pub content: String,
    /// The model that produced it.
    pub model: String,
}

/// Drives the generative text service to turn a prompt into a report.
pub struct ReportGenerator {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: Option<usize>,
}

impl ReportGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<usize>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Generate a report from the prompt with a single completion call.
    pub async fn generate(&self, prompt: &str) -> Result<Report, LlmError> {
        let request = CompletionRequest {
            messages: vec![Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            model: None,
        };

        debug!(model = self.provider.model_name(), "Sending report generation request");
        let response = self.provider.complete(request).await?;
        info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Report generated"
        );

        Ok(Report {
            content: response.content,
            model: response.model,
        })
    }

    /// Generate with retry on transient errors only.
    ///
    /// Backs off exponentially (1s, 2s, 4s, ..., capped at
    /// `retry.backoff_cap_secs`), honoring a server-provided retry-after when
    /// it is longer. Authentication and malformed-response errors are
    /// returned immediately. With the default `max_retries` of 0 this is the
    /// plain one-shot call.
    pub async fn generate_with_retry(
        &self,
        prompt: &str,
        retry: &RetryConfig,
    ) -> Result<Report, LlmError> {
        let mut last_error = None;

        for attempt in 0..=retry.max_retries {
            match self.generate(prompt).await {
                Ok(report) => return Ok(report),
                Err(e) if Self::is_retryable(&e) => {
                    if attempt < retry.max_retries {
                        let backoff_secs =
                            std::cmp::min(1u64 << attempt.min(63), retry.backoff_cap_secs);
                        let wait = match &e {
                            LlmError::RateLimited { retry_after_secs } => {
                                std::cmp::max(*retry_after_secs, backoff_secs)
                            }
                            _ => backoff_secs,
                        };
                        info!(
                            attempt = attempt + 1,
                            max_retries = retry.max_retries,
                            backoff_secs = wait,
                            error = %e,
                            "Retrying after transient error"
                        );
                        tokio::time::sleep(std::time::Duration::from_secs(wait)).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::Connection {
            message: "Max retries exceeded".to_string(),
        }))
    }

    /// Check whether an LLM error is transient and may be retried.
    pub fn is_retryable(error: &LlmError) -> bool {
        matches!(
            error,
            LlmError::RateLimited { .. } | LlmError::Timeout { .. } | LlmError::Connection { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_generate_returns_completion_verbatim() {
        let provider = Arc::new(MockLlmProvider::with_response(
            "**Introduction**\nML is...\n**References**\n1. ...",
        ));
        let generator = ReportGenerator::new(provider);
        let report = generator.generate("the prompt").await.unwrap();
        assert_eq!(
            report.content,
            "**Introduction**\nML is...\n**References**\n1. ..."
        );
        assert_eq!(report.model, "mock-model");
    }

    #[tokio::test]
    async fn test_generate_propagates_auth_failure() {
        let provider = Arc::new(MockLlmProvider::with_error(|| LlmError::AuthFailed {
            provider: "mock".to_string(),
        }));
        let generator = ReportGenerator::new(provider);
        let err = generator.generate("the prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_from_rate_limit() {
        let provider = MockLlmProvider::new();
        provider.queue(Err(LlmError::RateLimited {
            retry_after_secs: 2,
        }));
        provider.queue(Ok(MockLlmProvider::text_response("recovered")));
        let generator = ReportGenerator::new(Arc::new(provider));

        let retry = RetryConfig {
            max_retries: 2,
            backoff_cap_secs: 32,
        };
        let report = generator
            .generate_with_retry("the prompt", &retry)
            .await
            .unwrap();
        assert_eq!(report.content, "recovered");
    }

    #[tokio::test]
    async fn test_retry_never_retries_auth_failure() {
        let provider = MockLlmProvider::new();
        provider.queue(Err(LlmError::AuthFailed {
            provider: "mock".to_string(),
        }));
        // A queued success that must never be reached
        provider.queue(Ok(MockLlmProvider::text_response("unreachable")));
        let generator = ReportGenerator::new(Arc::new(provider));

        let retry = RetryConfig {
            max_retries: 5,
            backoff_cap_secs: 32,
        };
        let err = generator
            .generate_with_retry("the prompt", &retry)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_max_retries() {
        let provider = MockLlmProvider::with_error(|| LlmError::Connection {
            message: "refused".to_string(),
        });
        let generator = ReportGenerator::new(Arc::new(provider));

        let retry = RetryConfig {
            max_retries: 2,
            backoff_cap_secs: 32,
        };
        let err = generator
            .generate_with_retry("the prompt", &retry)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Connection { .. }));
    }

    #[test]
    fn test_is_retryable() {
        assert!(ReportGenerator::is_retryable(&LlmError::RateLimited {
            retry_after_secs: 5
        }));
        assert!(ReportGenerator::is_retryable(&LlmError::Timeout {
            timeout_secs: 60
        }));
        assert!(!ReportGenerator::is_retryable(&LlmError::AuthFailed {
            provider: "groq".to_string()
        }));
        assert!(!ReportGenerator::is_retryable(&LlmError::EmptyCompletion {
            model: "llama3-70b-8192".to_string()
        }));
    }
}
