//! Completion providers.
//!
//! A provider is the single capability the pipeline needs from a hosted model:
//! `complete(messages) -> text`, with failure signaled as a [`ProviderError`]
//! distinct from any text result. HTTP implementations live behind the
//! `anthropic` and `openai` cargo features.
//!
//! ## Security
//!
//! All providers hold their keys as [`ApiCredential`]s; see [`secrets`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "openai")]
mod openai;

pub use claimcheck_core::{ChatMessage, ContentBlock, MessageContent};
pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicProvider, AnthropicProviderFactory, ANTHROPIC_API_KEY_ENV};

#[cfg(feature = "openai")]
pub use openai::{
    OpenAiProvider, OpenAiProviderFactory, FIREWORKS_API_KEY_ENV, FIREWORKS_BASE_URL,
};

/// Errors from completion providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {}", human(.0))]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}", human(delay)),
        None => String::new(),
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// Model identifier, passed to the provider as-is
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Request timeout; `None` waits for the provider indefinitely
    pub timeout: Option<Duration>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: crate::config::DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.0,
            timeout: None,
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model that actually answered
    pub model: String,

    /// Stop reason
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The completion capability.
///
/// This is the ONLY place where model calls are made. Loaders and the prompt
/// builder never reach it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check if provider is usable (credentials present).
    async fn health_check(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// One HTTP client per process, shared by every provider.
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Map a transport-level reqwest failure.
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub(crate) fn map_send_error(error: reqwest::Error, timeout: Option<Duration>) -> ProviderError {
    match timeout {
        Some(limit) if error.is_timeout() => ProviderError::Timeout(limit),
        _ => ProviderError::HttpError(error.to_string()),
    }
}

/// Parse a `retry-after` header in seconds.
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub(crate) fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn test_completion_config_default_is_deterministic() {
        let config = CompletionConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.model, crate::config::DEFAULT_MODEL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = ProviderError::ApiError {
            status: 400,
            message: "image too large".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400 - image too large");
        assert_eq!(ProviderError::AuthError.to_string(), "Authentication failed");
    }

    #[test]
    fn test_rate_limit_message_formats_delay() {
        assert_eq!(
            ProviderError::RateLimited { retry_after: None }.to_string(),
            "Rate limit exceeded"
        );
        assert_eq!(
            ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(90))
            }
            .to_string(),
            "Rate limit exceeded, retry after 1m 30s"
        );
        assert_eq!(
            ProviderError::Timeout(Duration::from_secs(5)).to_string(),
            "Timeout after 5s"
        );
    }
}
