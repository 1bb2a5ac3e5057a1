//! Conversation context and message history.

use aura_common::{SessionId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::estimate_tokens;
use crate::Role;

/// One message in a stored conversation. History only ever holds user and
/// assistant roles; system prompts are injected at request-build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

/// A user's multi-turn conversation, persisted between turns by the
/// caller's store. `token_count` tracks the estimated token sum of all
/// messages; messages stay in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub user_id: UserId,
    pub session_id: SessionId,
    messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub token_count: u32,
}

impl ConversationContext {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            session_id: SessionId::new(),
            messages: Vec::new(),
            created_at: now,
            last_updated: now,
            token_count: 0,
        }
    }

    /// Append a message, maintaining `token_count` and `last_updated`.
    pub fn push(&mut self, message: ChatMessage) {
        self.token_count = self
            .token_count
            .saturating_add(estimate_tokens(&message.content));
        self.last_updated = message.timestamp;
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Time since the last appended message.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_updated
    }

    /// Time since the conversation started.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_empty_with_zero_tokens() {
        let context = ConversationContext::new(UserId::new("u1"), Utc::now());
        assert!(context.is_empty());
        assert_eq!(context.token_count, 0);
        assert_eq!(context.created_at, context.last_updated);
    }

    #[test]
    fn push_accumulates_token_estimates() {
        let now = Utc::now();
        let mut context = ConversationContext::new(UserId::new("u1"), now);
        context.push(ChatMessage::user("what is rust", now));
        context.push(ChatMessage::assistant("a systems programming language", now));

        let expected =
            estimate_tokens("what is rust") + estimate_tokens("a systems programming language");
        assert_eq!(context.token_count, expected);
        assert_eq!(context.message_count(), 2);
    }

    #[test]
    fn push_advances_last_updated() {
        let start = Utc::now();
        let mut context = ConversationContext::new(UserId::new("u1"), start);
        let later = start + Duration::seconds(42);
        context.push(ChatMessage::user("hello", later));
        assert_eq!(context.last_updated, later);
        assert_eq!(context.created_at, start);
    }

    #[test]
    fn idle_and_age_are_measured_from_different_stamps() {
        let start = Utc::now();
        let mut context = ConversationContext::new(UserId::new("u1"), start);
        context.push(ChatMessage::user("hi", start + Duration::minutes(10)));

        let now = start + Duration::minutes(25);
        assert_eq!(context.age(now), Duration::minutes(25));
        assert_eq!(context.idle_for(now), Duration::minutes(15));
    }

    #[test]
    fn context_round_trips_through_json() {
        let now = Utc::now();
        let mut context = ConversationContext::new(UserId::new("u1"), now);
        context.push(ChatMessage::user("question", now));
        context.push(ChatMessage::assistant("answer", now));

        let json = serde_json::to_string(&context).unwrap();
        let back: ConversationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message_count(), 2);
        assert_eq!(back.token_count, context.token_count);
        assert_eq!(back.session_id, context.session_id);
        assert!(matches!(back.messages()[0].role, Role::User));
    }
}
