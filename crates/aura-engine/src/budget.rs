//! Context token budgeting and history truncation.
//!
//! Token counts are heuristic estimates, deliberately conservative so the
//! shaped history always fits the provider's real window: the estimate is
//! the larger of a character-based and a word-based lower bound. A real
//! tokenizer can replace [`estimate_tokens`] without touching the selection
//! algorithm, which only consumes the estimate.

use aura_config::{ContextConfig, ModelConfig, ModelsConfig};
use tracing::debug;

use crate::context::{ChatMessage, ConversationContext};
use crate::quota::Tier;

/// Average characters per token assumed by the estimator.
const CHARS_PER_TOKEN: f64 = 3.5;
/// Average tokens per word assumed by the estimator.
const TOKENS_PER_WORD: f64 = 1.3;
/// Characters kept per token when cutting a partial message.
const PARTIAL_CHARS_PER_TOKEN: u32 = 3;
/// Minimum leftover budget worth spending on a partial message.
const MIN_PARTIAL_TOKENS: u32 = 50;
/// A trailing whitespace cut point is only honored past this share of the
/// allowed length.
const WHITESPACE_BACKOFF_RATIO: f64 = 0.8;

/// Conservative token estimate for a piece of text:
/// `max(ceil(chars/3.5), ceil(words × 1.3))`.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as f64;
    let words = text.split_whitespace().count() as f64;
    let by_chars = (chars / CHARS_PER_TOKEN).ceil() as u32;
    let by_words = (words * TOKENS_PER_WORD).ceil() as u32;
    by_chars.max(by_words)
}

/// Shapes conversation history into the token budget left over after the
/// prompt and the model's response allowance are reserved.
#[derive(Debug, Clone)]
pub struct TokenBudgeter {
    max_context_tokens: u32,
    reply_reserve_tokens: u32,
    models: ModelsConfig,
}

impl TokenBudgeter {
    pub fn new(context: &ContextConfig, models: ModelsConfig) -> Self {
        Self {
            max_context_tokens: context.max_context_tokens,
            reply_reserve_tokens: context.reply_reserve_tokens,
            models,
        }
    }

    /// Model parameters for a tier.
    pub fn model_for(&self, tier: Tier) -> &ModelConfig {
        match tier {
            Tier::Free => &self.models.free,
            Tier::Premium => &self.models.premium,
        }
    }

    /// Tokens available for history after reserving room for the new prompt
    /// and the model's response.
    pub fn available_budget(&self, prompt_tokens: u32, max_response_tokens: u32) -> u32 {
        self.max_context_tokens.saturating_sub(
            prompt_tokens + max_response_tokens + self.reply_reserve_tokens,
        )
    }

    /// Whether the full context plus `extra_prompt_tokens` would overflow
    /// the global window for this tier.
    pub fn needs_truncation(
        &self,
        context: &ConversationContext,
        tier: Tier,
        extra_prompt_tokens: u32,
    ) -> bool {
        let projected = context.token_count
            + extra_prompt_tokens
            + self.model_for(tier).max_response_tokens
            + self.reply_reserve_tokens;
        projected > self.max_context_tokens
    }

    /// Select the most recent messages fitting `budget`, capped at the
    /// tier's turn ceiling. When the next-older message does not fit whole
    /// and more than [`MIN_PARTIAL_TOKENS`] of budget remain, a truncated
    /// prefix of it is included instead. The result is chronological.
    pub fn truncate_history(
        &self,
        messages: &[ChatMessage],
        budget: u32,
        tier: Tier,
    ) -> Vec<ChatMessage> {
        let ceiling = tier.max_history_messages();
        let mut selected: Vec<ChatMessage> = Vec::new();
        let mut used = 0u32;

        for message in messages.iter().rev() {
            if selected.len() >= ceiling {
                break;
            }
            let cost = estimate_tokens(&message.content);
            if used + cost <= budget {
                selected.push(message.clone());
                used += cost;
                continue;
            }

            let remaining = budget - used;
            if remaining > MIN_PARTIAL_TOKENS {
                if let Some(partial) = truncate_message(message, remaining) {
                    selected.push(partial);
                }
            }
            debug!(
                kept = selected.len(),
                dropped = messages.len() - selected.len(),
                "history truncated to fit context budget"
            );
            break;
        }

        selected.reverse();
        selected
    }
}

/// Cut a message down to roughly `remaining_tokens` worth of characters,
/// preferring a whitespace boundary near the end of the allowed range.
/// Returns `None` when even the cut prefix would overshoot the budget.
fn truncate_message(message: &ChatMessage, remaining_tokens: u32) -> Option<ChatMessage> {
    let allowed = (remaining_tokens * PARTIAL_CHARS_PER_TOKEN) as usize;
    let chars: Vec<char> = message.content.chars().collect();
    let mut cut = allowed.min(chars.len());

    // Back off to the last whitespace, but only when it sits late enough
    // that we keep most of the allowed prefix.
    let threshold = (cut as f64 * WHITESPACE_BACKOFF_RATIO) as usize;
    if let Some(ws) = chars[..cut].iter().rposition(|c| c.is_whitespace()) {
        if ws > threshold {
            cut = ws;
        }
    }

    let mut content: String = chars[..cut].iter().collect();
    let keep = content.trim_end().len();
    content.truncate(keep);
    content.push_str("...");

    if estimate_tokens(&content) > remaining_tokens {
        return None;
    }
    Some(ChatMessage {
        role: message.role,
        content,
        timestamp: message.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::Utc;

    fn budgeter() -> TokenBudgeter {
        TokenBudgeter::new(&ContextConfig::default(), ModelsConfig::default())
    }

    fn message(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn history(turns: usize, words_per_message: usize) -> Vec<ChatMessage> {
        let filler = vec!["assistant"; words_per_message].join(" ");
        (0..turns * 2)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                message(role, &filler)
            })
            .collect()
    }

    #[test]
    fn estimate_dominates_both_lower_bounds() {
        let samples = [
            "",
            "hi",
            "what is the weather like in Berlin today",
            "a a a a a a a a a a a a",
            "supercalifragilisticexpialidocious",
            "Überraschung: ein etwas längerer Satz mit Umlauten überall",
        ];
        for text in samples {
            let estimate = estimate_tokens(text);
            let chars = text.chars().count() as f64;
            let words = text.split_whitespace().count() as f64;
            assert!(estimate >= (chars / 3.5).ceil() as u32, "char bound: {text:?}");
            assert!(estimate >= (words * 1.3).ceil() as u32, "word bound: {text:?}");
        }
    }

    #[test]
    fn empty_text_estimates_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn zero_budget_selects_nothing() {
        let budgeter = budgeter();
        let selected = budgeter.truncate_history(&history(5, 20), 0, Tier::Premium);
        assert!(selected.is_empty());
    }

    #[test]
    fn truncation_is_idempotent() {
        let budgeter = budgeter();
        let messages = history(8, 30);
        let once = budgeter.truncate_history(&messages, 400, Tier::Premium);
        let twice = budgeter.truncate_history(&once, 400, Tier::Premium);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.content, b.content);
        }
    }

    #[test]
    fn selected_estimate_never_exceeds_budget() {
        let budgeter = budgeter();
        let messages = history(10, 25);
        for budget in [60, 150, 400, 1000] {
            let selected = budgeter.truncate_history(&messages, budget, Tier::Premium);
            let total: u32 = selected.iter().map(|m| estimate_tokens(&m.content)).sum();
            assert!(total <= budget, "budget {budget}: used {total}");
        }
    }

    #[test]
    fn selection_prefers_most_recent_and_stays_chronological() {
        let budgeter = budgeter();
        let mut messages = history(3, 10);
        messages.push(message(Role::User, "newest question"));
        let selected = budgeter.truncate_history(&messages, 40, Tier::Premium);

        assert_eq!(selected.last().unwrap().content, "newest question");
        for pair in selected.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn free_tier_caps_history_at_ten_messages() {
        let budgeter = budgeter();
        let selected = budgeter.truncate_history(&history(15, 3), 100_000, Tier::Free);
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn premium_tier_caps_history_at_twenty_messages() {
        let budgeter = budgeter();
        let selected = budgeter.truncate_history(&history(15, 3), 100_000, Tier::Premium);
        assert_eq!(selected.len(), 20);
    }

    #[test]
    fn partial_message_is_cut_with_ellipsis() {
        let budgeter = budgeter();
        let long = vec!["background"; 200].join(" ");
        let mut messages = vec![message(Role::Assistant, &long)];
        messages.push(message(Role::User, "short question"));

        // Enough budget for the short message plus a meaningful partial.
        let selected = budgeter.truncate_history(&messages, 80, Tier::Premium);
        assert_eq!(selected.len(), 2);
        let partial = &selected[0];
        assert!(partial.content.ends_with("..."));
        assert!(partial.content.chars().count() < long.chars().count());
        // The cut backs off to a word boundary, so no split word before the
        // ellipsis.
        assert!(partial.content.trim_end_matches("...").ends_with("background"));
    }

    #[test]
    fn tiny_leftover_budget_drops_the_message_instead() {
        let budgeter = budgeter();
        let long = vec!["background"; 200].join(" ");
        let messages = vec![message(Role::Assistant, &long), message(Role::User, "hi")];

        // Budget covers "hi" but leaves under 50 tokens: nothing partial.
        let selected = budgeter.truncate_history(&messages, 30, Tier::Premium);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].content, "hi");
    }

    #[test]
    fn needs_truncation_compares_against_global_window() {
        let budgeter = budgeter();
        let user_id = aura_common::UserId::new("u1");
        let mut context = ConversationContext::new(user_id, Utc::now());
        assert!(!budgeter.needs_truncation(&context, Tier::Free, 50));

        let filler = vec!["word"; 2000].join(" ");
        context.push(message(Role::User, &filler));
        assert!(budgeter.needs_truncation(&context, Tier::Free, 50));
    }

    #[test]
    fn available_budget_reserves_prompt_response_and_margin() {
        let budgeter = budgeter();
        // 4096 − (100 prompt + 256 response + 100 reserve)
        assert_eq!(budgeter.available_budget(100, 256), 3640);
        // Saturates instead of underflowing.
        assert_eq!(budgeter.available_budget(5000, 256), 0);
    }
}
