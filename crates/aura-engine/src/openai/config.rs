//! OpenAI client configuration.

use std::fmt;

use aura_config::ProviderConfig;

use crate::error::{FailureKind, TransportFailure};

pub(crate) const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI transport configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create config from the provider section, falling back to the
    /// environment when no key is configured.
    ///
    /// Resolution order:
    /// 1. `provider.api_key` from the config file
    /// 2. `OPENAI_API_KEY` env var
    /// 3. `~/.config/aura/api_key` (single-line key file)
    pub fn from_provider(provider: &ProviderConfig) -> Result<Self, TransportFailure> {
        let key = if !provider.api_key.is_empty() {
            provider.api_key.clone()
        } else {
            resolve_env_key()?
        };
        Ok(Self {
            api_key: key,
            api_base: provider.api_base.clone(),
        })
    }

    /// Create config from the environment alone.
    pub fn from_env() -> Result<Self, TransportFailure> {
        Ok(Self::new(resolve_env_key()?))
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

fn resolve_env_key() -> Result<String, TransportFailure> {
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    if let Some(key) = read_key_file() {
        return Ok(key);
    }

    Err(TransportFailure::new(
        FailureKind::Authentication,
        "OpenAI API not configured. Set OPENAI_API_KEY or write the key to \
         ~/.config/aura/api_key.",
    ))
}

/// Read the API key from `~/.config/aura/api_key`.
fn read_key_file() -> Option<String> {
    let path = dirs::config_dir()?.join("aura").join("api_key");
    let data = std::fs::read_to_string(path).ok()?;
    let key = data.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_key() {
        let config = OpenAiConfig::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn provider_key_wins_over_environment() {
        let provider = ProviderConfig {
            api_key: "sk-from-file".into(),
            api_base: "https://llm.example.com/v1".into(),
        };
        let config = OpenAiConfig::from_provider(&provider).unwrap();
        assert_eq!(config.api_key, "sk-from-file");
        assert_eq!(config.api_base, "https://llm.example.com/v1");
    }

    #[test]
    fn builder_overrides_api_base() {
        let config = OpenAiConfig::new("sk-x").with_api_base("http://localhost:8080/v1");
        assert_eq!(config.api_base, "http://localhost:8080/v1");
    }
}
