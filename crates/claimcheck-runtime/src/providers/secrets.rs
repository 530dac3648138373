//! API keys for completion providers.
//!
//! Keys are wrapped in [`ApiCredential`] the moment they are read, so they
//! never show up in `Debug`/`Display` output or in tracing fields. The raw
//! value is only reachable through [`ApiCredential::expose`], which providers
//! call when setting the auth header.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The provider's `options` object
    Config,
    /// An environment variable
    Environment,
    /// Passed in by the caller
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A provider API key. Zeroed on drop, redacted when printed.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Read the key from `env_var`.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        match std::env::var(env_var) {
            Ok(value) if !value.is_empty() => {
                Ok(Self::new(value, CredentialSource::Environment, name))
            }
            _ => Err(ProviderError::NotConfigured(format!(
                "{} not set: configure '{}' environment variable",
                name, env_var
            ))),
        }
    }

    /// Read the key from `config[config_key]`, falling back to `env_var`.
    ///
    /// Empty strings count as absent in both places.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config[config_key].as_str().filter(|v| !v.is_empty()) {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        Self::from_env(env_var, name).map_err(|_| {
            ProviderError::NotConfigured(format!(
                "{} required: set '{}' in provider options or {} environment variable",
                name, config_key, env_var
            ))
        })
    }

    /// Whether [`from_config_or_env`](Self::from_config_or_env) would succeed.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config[config_key].as_str().is_some_and(|v| !v.is_empty())
            || std::env::var(env_var).is_ok_and(|v| !v.is_empty())
    }

    /// The raw key. Call only where the header is set; never store the result.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "fw-0123456789abcdef";

    #[test]
    fn test_credential_redacted_when_printed() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Config, "Fireworks API key");

        let debug = format!("{:?}", cred);
        let display = format!("{}", cred);
        assert!(!debug.contains(SECRET));
        assert!(!display.contains(SECRET));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(display, "Fireworks API key from config [REDACTED]");
    }

    #[test]
    fn test_credential_expose() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Test key");
        assert_eq!(cred.expose(), SECRET);
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_config_wins_over_env() {
        std::env::set_var("CLAIMCHECK_TEST_KEY_PRIORITY", "env-key");
        let config = serde_json::json!({"api_key": "config-key"});

        let cred = ApiCredential::from_config_or_env(
            &config,
            "api_key",
            "CLAIMCHECK_TEST_KEY_PRIORITY",
            "Test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "config-key");
        assert_eq!(cred.source(), CredentialSource::Config);

        std::env::remove_var("CLAIMCHECK_TEST_KEY_PRIORITY");
    }

    #[test]
    fn test_env_fallback() {
        std::env::set_var("CLAIMCHECK_TEST_KEY_FALLBACK", "env-key");
        let config = serde_json::json!({"api_key": ""});

        let cred = ApiCredential::from_config_or_env(
            &config,
            "api_key",
            "CLAIMCHECK_TEST_KEY_FALLBACK",
            "Test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);

        std::env::remove_var("CLAIMCHECK_TEST_KEY_FALLBACK");
    }

    #[test]
    fn test_missing_key_names_both_places() {
        let err = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "CLAIMCHECK_TEST_KEY_NONEXISTENT",
            "Test key",
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Test key"));
        assert!(msg.contains("api_key"));
        assert!(msg.contains("CLAIMCHECK_TEST_KEY_NONEXISTENT"));
    }

    #[test]
    fn test_is_available() {
        assert!(ApiCredential::is_available(
            &serde_json::json!({"api_key": "value"}),
            "api_key",
            "CLAIMCHECK_TEST_KEY_NONEXISTENT"
        ));
        assert!(!ApiCredential::is_available(
            &serde_json::json!({}),
            "api_key",
            "CLAIMCHECK_TEST_KEY_NONEXISTENT"
        ));
    }
}
