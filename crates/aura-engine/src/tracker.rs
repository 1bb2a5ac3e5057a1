//! Token usage tracking across model calls.

use std::collections::HashMap;

use crate::TokenUsage;

/// Tracks cumulative token usage per model, for diagnostics only — never
/// consulted for admission control.
#[derive(Debug, Clone)]
pub struct TokenTracker {
    /// Total usage across all models.
    total: TokenUsage,
    /// Usage broken down by model identifier.
    by_model: HashMap<String, TokenUsage>,
    /// Number of successful API calls recorded.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self {
            total: TokenUsage::default(),
            by_model: HashMap::new(),
            call_count: 0,
        }
    }

    /// Record token usage from an API call.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        self.total.prompt_tokens += usage.prompt_tokens;
        self.total.completion_tokens += usage.completion_tokens;
        self.call_count += 1;

        let entry = self.by_model.entry(model.to_string()).or_default();
        entry.prompt_tokens += usage.prompt_tokens;
        entry.completion_tokens += usage.completion_tokens;
    }

    /// Get total token usage.
    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    /// Get usage for a specific model.
    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    /// Get total tokens (prompt + completion).
    pub fn total_tokens(&self) -> u32 {
        self.total.total_tokens()
    }

    /// Get number of recorded calls.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        self.total = TokenUsage::default();
        self.by_model.clear();
        self.call_count = 0;
    }
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new()
    }
}
