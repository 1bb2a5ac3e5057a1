//! Conversation-turn orchestration engine for Aura.
//!
//! Answers one spoken user question per turn by forwarding it to an LLM
//! chat-completion provider, with:
//! - Tiered daily usage limits with calendar-day rollover
//! - Token-budgeted conversation history shaping
//! - Retry/backoff with a typed failure taxonomy
//! - Session lifecycle decisions (continue, end, hard expiry)
//!
//! The engine is a library invoked by a request handler. It owns no
//! storage: contexts and usage records are read and written through the
//! traits in [`store`], and the caller renders all user-facing text.

pub mod budget;
pub mod context;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod quota;
pub mod retry;
pub mod session;
pub mod store;
pub mod tracker;

use std::time::Duration;

use async_trait::async_trait;

pub use budget::{estimate_tokens, TokenBudgeter};
pub use context::{ChatMessage, ConversationContext};
pub use error::{FailureKind, RequestOutcome, TransportFailure};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use orchestrator::Orchestrator;
pub use quota::{Admission, Tier, UsageGate, UsageState};
pub use retry::RetryPolicy;
pub use session::{SessionCoordinator, TurnDecision, TurnError};
pub use store::{ContextStore, EventSink, TurnEvent, UsageStore};
pub use tracker::TokenTracker;

/// Outbound chat-completion transport.
///
/// `send_chat` must abort the call once `deadline` elapses and report it as
/// a [`FailureKind::Timeout`]; the retry policy decides whether another
/// attempt follows.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat(
        &self,
        request: ChatRequest,
        deadline: Duration,
    ) -> Result<ChatCompletion, TransportFailure>;

    /// Lightweight availability probe. Never consulted on the main path.
    async fn is_available(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message as the provider sees it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

/// Structured chat-completion request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(rename = "max_tokens")]
    pub max_response_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

/// Reply from a chat-completion call, before shape validation.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// First choice's message content, if the reply carried one.
    pub content: Option<String>,
    /// Provider-reported token counters, when present.
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}
