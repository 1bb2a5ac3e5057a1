//! OpenAI client struct, URL building, and response parsing.

use crate::{ChatCompletion, TokenUsage};

use super::config::OpenAiConfig;

/// OpenAI API client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    pub(crate) fn models_url(&self) -> String {
        format!("{}/models", self.config.api_base.trim_end_matches('/'))
    }

    /// Parse a 200 response body. Shape problems are not judged here: a
    /// missing choice comes back as `content: None` and the orchestrator
    /// decides what that means.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> ChatCompletion {
        let content = json["choices"].as_array().and_then(|choices| {
            choices
                .iter()
                .find_map(|choice| choice["message"]["content"].as_str().map(String::from))
        });

        let usage = json.get("usage").filter(|u| u.is_object()).map(|u| TokenUsage {
            prompt_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
        });

        ChatCompletion { content, usage }
    }
}
