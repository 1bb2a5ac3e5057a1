//! Conversation session lifecycle.
//!
//! The coordinator drives one turn as a strictly sequential pipeline:
//! quota check, context fetch (with hard expiry on access), model call,
//! append, end-of-session decision, persistence. Analytics are emitted on
//! a detached task and never affect the turn's result.

use std::sync::Arc;

use aura_common::{StoreError, UserId};
use aura_config::SessionConfig;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::context::{ChatMessage, ConversationContext};
use crate::error::TransportFailure;
use crate::orchestrator::Orchestrator;
use crate::quota::{Tier, UsageGate, UsageState};
use crate::store::{ContextStore, EventSink, TurnEvent, UsageStore};

/// Phrases that signal the user is wrapping up. Matched case-insensitively
/// as substrings of the assistant's reply.
const CLOSING_PHRASES: &[&str] = &[
    "goodbye",
    "bye bye",
    "see you later",
    "talk to you later",
    "take care",
    "have a great day",
    "have a good day",
    "farewell",
];

/// Outcome of one conversation turn. An at-limit result is a normal,
/// fully-defined outcome — not an error.
#[derive(Debug, Clone)]
pub enum TurnDecision {
    Answered {
        reply: String,
        should_end: bool,
        /// Questions left today; `None` for premium users.
        remaining_usage: Option<u32>,
    },
    LimitReached {
        limit: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Transport(#[from] TransportFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decide whether the session should end after this turn, in priority
/// order: closing phrase in the reply, message-count ceiling, then the
/// soft idle threshold against `last_updated`.
pub fn should_end_session(
    context: &ConversationContext,
    reply: &str,
    now: DateTime<Utc>,
    config: &SessionConfig,
) -> bool {
    let lowered = reply.to_lowercase();
    if CLOSING_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
        return true;
    }
    if context.message_count() >= config.max_turn_messages {
        return true;
    }
    context.idle_for(now) > Duration::minutes(config.idle_end_minutes)
}

pub struct SessionCoordinator {
    orchestrator: Orchestrator,
    contexts: Arc<dyn ContextStore>,
    usage: Arc<dyn UsageStore>,
    events: Option<Arc<dyn EventSink>>,
    gate: UsageGate,
    session: SessionConfig,
}

impl SessionCoordinator {
    pub fn new(
        orchestrator: Orchestrator,
        contexts: Arc<dyn ContextStore>,
        usage: Arc<dyn UsageStore>,
        config: &aura_config::AuraConfig,
    ) -> Self {
        Self {
            orchestrator,
            contexts,
            usage,
            events: None,
            gate: UsageGate::new(&config.limits),
            session: config.session.clone(),
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Process one user question end to end.
    pub async fn handle_turn(
        &self,
        user_id: &UserId,
        prompt: &str,
    ) -> Result<TurnDecision, TurnError> {
        let now = Utc::now();

        let mut usage = match self.usage.load(user_id).await? {
            Some(state) => state,
            None => UsageState::new(user_id.clone(), now),
        };

        let admission = self.gate.check_at(&mut usage, now);
        if !admission.allowed {
            debug!(user = %user_id, "daily limit reached");
            // Persist anyway: the admission check may have rolled the
            // counter over to a new day.
            self.usage.save(&usage).await?;
            return Ok(TurnDecision::LimitReached {
                limit: self.gate.daily_limit(),
            });
        }

        let mut context = match self.load_active_context(user_id, now).await? {
            Some(context) => context,
            None => ConversationContext::new(user_id.clone(), now),
        };

        let reply = self
            .orchestrator
            .generate(prompt, Some(&context), usage.tier)
            .await?;

        context.push(ChatMessage::user(prompt, now));
        context.push(ChatMessage::assistant(reply.clone(), Utc::now()));

        let should_end = should_end_session(&context, &reply, Utc::now(), &self.session);

        self.gate.increment_at(&mut usage, now);
        self.contexts.save(&context).await?;
        self.usage.save(&usage).await?;

        self.emit_turn_event(&context, usage.tier, should_end);

        Ok(TurnDecision::Answered {
            reply,
            should_end,
            remaining_usage: self.gate.remaining(&usage),
        })
    }

    /// Explicit stop: discard the stored conversation.
    pub async fn end_session(&self, user_id: &UserId) -> Result<(), TurnError> {
        info!(user = %user_id, "ending session on request");
        self.contexts.clear(user_id).await?;
        Ok(())
    }

    /// Load the stored context, discarding it when it sat idle past the
    /// hard expiry. The 2-hour hard expiry is evaluated on access and is
    /// distinct from the 30-minute soft should-end heuristic.
    async fn load_active_context(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<ConversationContext>, TurnError> {
        let Some(context) = self.contexts.load(user_id).await? else {
            return Ok(None);
        };

        let idle = context.idle_for(now);
        if idle > Duration::minutes(self.session.hard_expiry_minutes) {
            info!(
                user = %user_id,
                idle_minutes = idle.num_minutes(),
                "discarding expired conversation context"
            );
            self.contexts.clear(user_id).await?;
            return Ok(None);
        }
        Ok(Some(context))
    }

    /// Fire-and-forget analytics. The task is detached; a failing sink is
    /// logged at debug and dropped.
    fn emit_turn_event(&self, context: &ConversationContext, tier: Tier, session_ended: bool) {
        let Some(sink) = &self.events else {
            return;
        };
        let sink = Arc::clone(sink);
        let event = TurnEvent {
            user_id: context.user_id.clone(),
            session_id: context.session_id.clone(),
            tier,
            message_count: context.message_count(),
            session_ended,
            timestamp: Utc::now(),
        };
        tokio::spawn(async move {
            if let Err(e) = sink.record(event).await {
                debug!("turn event dropped: {e}");
            }
        });
    }
}
