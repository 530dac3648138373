//! Runtime configuration.
//!
//! Loaded from YAML or JSON. Every field has a default, so an empty document
//! is a valid configuration that talks to Fireworks with the key in
//! `FIREWORKS_API_KEY`. Completions are unbounded unless `timeout` is set.
//!
//! ```yaml
//! model: accounts/fireworks/models/llama4-scout-instruct-basic
//! max_tokens: 500
//! temperature: 0.0
//! timeout: 90s
//! history: accumulate
//! provider:
//!   type: openai
//!   options:
//!     api_key_env: FIREWORKS_API_KEY
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{CompletionConfig, LlmProvider, ProviderRegistry};
use crate::RuntimeError;

/// Vision-capable model every validator is tuned for.
pub const DEFAULT_MODEL: &str = "accounts/fireworks/models/llama4-scout-instruct-basic";

/// Errors from loading or checking configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the conversation sent to the model grows across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Every accepted user turn stays in the history for later messages.
    /// Model replies are not added back.
    #[default]
    Accumulate,

    /// Each completion sees only the system prompt and the current turn.
    Isolated,
}

/// Which provider to build, and its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Registry key, e.g. `openai` or `anthropic`
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Passed verbatim to the provider factory
    pub options: serde_json::Value,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_type: "openai".to_string(),
            options: serde_json::json!({}),
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,

    /// Optional per-request timeout: seconds, or a human string like `"45s"`
    #[serde(with = "duration_human", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    pub history: HistoryMode,
    pub provider: ProviderSettings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
            history: HistoryMode::default(),
            provider: ProviderSettings::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&source),
            _ => Self::from_yaml(&source),
        }
    }

    /// Alias of [`from_file`](Self::from_file) for YAML paths.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within [0, 2] (got {})",
                self.temperature
            )));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid("timeout must be positive".to_string()));
        }
        if self.provider.provider_type.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.type must not be empty".to_string()));
        }
        if !self.provider.options.is_object() {
            return Err(ConfigError::Invalid(
                "provider.options must be an object".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request settings handed to the provider.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }

    /// Build the configured provider from `registry`.
    pub fn build_provider(
        &self,
        registry: &ProviderRegistry,
    ) -> Result<Arc<dyn LlmProvider>, RuntimeError> {
        let provider_type = self.provider.provider_type.as_str();
        if !registry.has_provider(provider_type) {
            return Err(RuntimeError::ProviderNotConfigured(format!(
                "'{}' is not available in this build (available: {:?})",
                provider_type,
                registry.available_types()
            )));
        }
        registry.validate(provider_type, &self.provider.options)?;
        Ok(registry.create(provider_type, &self.provider.options)?)
    }
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Human(String),
    }

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Secs(secs)) => Ok(Some(Duration::from_secs(secs))),
            Some(Raw::Human(text)) => humantime::parse_duration(text.trim())
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.history, HistoryMode::Accumulate);
        assert_eq!(config.provider.provider_type, "openai");
    }

    #[test]
    fn test_yaml_with_human_timeout() {
        let config = RuntimeConfig::from_yaml(
            "model: gpt-4o-mini\ntimeout: 1m 30s\nhistory: isolated\nprovider:\n  type: anthropic\n  options:\n    api_key: k\n",
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.history, HistoryMode::Isolated);
        assert_eq!(config.provider.provider_type, "anthropic");
        assert_eq!(config.provider.options["api_key"], "k");
    }

    #[test]
    fn test_json_with_numeric_timeout() {
        let config = RuntimeConfig::from_json(r#"{"timeout": 12, "max_tokens": 256}"#).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(12)));
        assert_eq!(config.completion_config().max_tokens, 256);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            RuntimeConfig::from_yaml("max_tokens: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("temperature: 3.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("timeout: soon"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("history: forever"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_timeout_round_trips_as_human_string() {
        let config = RuntimeConfig {
            timeout: Some(Duration::from_secs(45)),
            ..RuntimeConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("timeout: 45s"));
        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_timeout_is_unbounded_unless_set() {
        let config = RuntimeConfig::from_yaml("model: m").unwrap();
        assert_eq!(config.timeout, None);
        assert_eq!(config.completion_config().timeout, None);
        assert!(!serde_yaml::to_string(&config).unwrap().contains("timeout"));

        assert_eq!(RuntimeConfig::from_yaml("timeout: null").unwrap().timeout, None);
        assert!(matches!(
            RuntimeConfig::from_yaml("timeout: 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_provider_is_not_configured() {
        let config = RuntimeConfig {
            provider: ProviderSettings {
                provider_type: "carrier-pigeon".to_string(),
                options: serde_json::json!({}),
            },
            ..RuntimeConfig::default()
        };
        let err = config.build_provider(&ProviderRegistry::new()).err().unwrap();
        assert!(matches!(err, RuntimeError::ProviderNotConfigured(_)));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_build_provider_checks_options_first() {
        let config = RuntimeConfig {
            provider: ProviderSettings {
                provider_type: "openai".to_string(),
                options: serde_json::json!({
                    "api_key": "test-key",
                    "base_url": "api.fireworks.ai/inference/v1"
                }),
            },
            ..RuntimeConfig::default()
        };
        let err = config
            .build_provider(&ProviderRegistry::with_defaults())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RuntimeError::Provider(crate::providers::ProviderError::NotConfigured(_))
        ));
    }
}
