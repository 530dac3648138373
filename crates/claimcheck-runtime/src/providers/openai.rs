//! OpenAI-compatible Chat Completions provider.
//!
//! Speaks `POST {base_url}/chat/completions` with bearer auth. The default
//! endpoint is Fireworks, which serves the vision-capable Llama models the
//! validators are tuned for; any other compatible endpoint works through
//! `base_url`. [`ChatMessage`] already serializes in this wire shape, so turns
//! are sent as-is.

use super::{
    factory::ProviderFactory,
    http_client, map_send_error, retry_after,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Default API key variable.
pub const FIREWORKS_API_KEY_ENV: &str = "FIREWORKS_API_KEY";

/// Default endpoint.
pub const FIREWORKS_BASE_URL: &str = "https://api.fireworks.ai/inference/v1";

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    credential: ApiCredential,
    base_url: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(api_key, CredentialSource::Programmatic, "API key"),
            base_url: FIREWORKS_BASE_URL.to_string(),
        }
    }

    /// Build from provider options.
    ///
    /// - `api_key`: the key itself, else read from the variable named by
    ///   `api_key_env` (default `FIREWORKS_API_KEY`)
    /// - `base_url`: endpoint root, default Fireworks
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let env_var = config["api_key_env"]
            .as_str()
            .unwrap_or(FIREWORKS_API_KEY_ENV);
        let credential = ApiCredential::from_config_or_env(config, "api_key", env_var, "API key")?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(FIREWORKS_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            credential,
            base_url,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull a message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn into_completion(
    body: ChatCompletionResponse,
    requested_model: &str,
) -> Result<CompletionResponse, ProviderError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError("No choices in response".to_string()))?;

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        usage: TokenUsage {
            prompt_tokens: body.usage.prompt_tokens,
            completion_tokens: body.usage.completion_tokens,
        },
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
        stop_reason: choice.finish_reason,
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: &messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let mut builder = http_client()
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.expose())
            .header("content-type", "application/json");
        if let Some(limit) = config.timeout {
            builder = builder.timeout(limit);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, config.timeout))?;

        let status = response.status();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after: retry_after(&response),
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthError);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ProviderError::HttpError(e.to_string()))?;
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        into_completion(body, &config.model)
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for `type: openai`.
///
/// ```json
/// {
///   "api_key": "fw-...",
///   "api_key_env": "FIREWORKS_API_KEY",
///   "base_url": "https://api.fireworks.ai/inference/v1"
/// }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(OpenAiProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        let env_var = config["api_key_env"]
            .as_str()
            .unwrap_or(FIREWORKS_API_KEY_ENV);
        if !ApiCredential::is_available(config, "api_key", env_var) {
            return Err(ProviderError::NotConfigured(format!(
                "API key required: set 'api_key' in provider options or {} env",
                env_var
            )));
        }
        super::factory::validate_base_url(config)
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({
            "api_key_env": FIREWORKS_API_KEY_ENV,
            "base_url": FIREWORKS_BASE_URL
        })
    }

    fn description(&self) -> &'static str {
        "OpenAI-compatible Chat Completions (Fireworks by default)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_core::ContentBlock;

    #[test]
    fn test_request_uses_chat_completions_shape() {
        let messages = vec![
            ChatMessage::system("Validate."),
            ChatMessage::user_blocks(vec![
                ContentBlock::jpeg_base64("QUJD"),
                ContentBlock::text("A red bike"),
            ]),
        ];
        let request = ChatCompletionRequest {
            model: "accounts/fireworks/models/llama4-scout-instruct-basic",
            messages: &messages,
            max_tokens: 500,
            temperature: 0.0,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "Validate.");
        assert_eq!(json["messages"][1]["content"][0]["type"], "image_url");
        assert_eq!(
            json["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(json["messages"][1]["content"][1]["text"], "A red bike");
    }

    #[test]
    fn test_response_takes_first_choice() {
        let body: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "{\"accurate\": true, \"explanation\": \"ok\"}"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 812, "completion_tokens": 24}
        }))
        .unwrap();

        let response = into_completion(body, "m").unwrap();
        assert_eq!(response.content, "{\"accurate\": true, \"explanation\": \"ok\"}");
        assert_eq!(response.usage.total(), 836);
        assert_eq!(response.model, "m");
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_empty_choices_is_a_parse_error() {
        let body: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            into_completion(body, "m"),
            Err(ProviderError::ParseError(_))
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"message": "model not found"}}"#),
            "model not found"
        );
        assert_eq!(error_message("bad gateway\n"), "bad gateway");
    }

    #[test]
    fn test_from_config_reads_named_env_var() {
        std::env::set_var("CLAIMCHECK_TEST_OPENAI_KEY", "env-key");
        let provider = OpenAiProvider::from_config(&serde_json::json!({
            "api_key_env": "CLAIMCHECK_TEST_OPENAI_KEY",
            "base_url": "https://api.openai.com/v1/"
        }))
        .unwrap();

        assert_eq!(provider.base_url(), "https://api.openai.com/v1");
        assert_eq!(provider.credential.source(), CredentialSource::Environment);
        std::env::remove_var("CLAIMCHECK_TEST_OPENAI_KEY");
    }

    #[test]
    fn test_factory_defaults_to_fireworks() {
        let provider = OpenAiProvider::from_config(&serde_json::json!({"api_key": "k"})).unwrap();
        assert_eq!(provider.base_url(), FIREWORKS_BASE_URL);
        assert_eq!(OpenAiProviderFactory.provider_type(), "openai");
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret = "fw-super-secret-key";
        let debug = format!("{:?}", OpenAiProvider::new(secret));
        assert!(!debug.contains(secret));
    }
}
