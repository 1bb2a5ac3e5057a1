//! Conversation context budget configuration.

use serde::{Deserialize, Serialize};

/// Token budget for the conversation context window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Upper bound on tokens across history, prompt, and reply.
    pub max_context_tokens: u32,
    /// Safety margin reserved on top of the model's response allowance.
    pub reply_reserve_tokens: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: 4096,
            reply_reserve_tokens: 100,
        }
    }
}
