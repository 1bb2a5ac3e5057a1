//! Persistence and side-channel seams.
//!
//! The engine owns no storage. Contexts and usage records live wherever
//! the embedding service keeps them; these traits are the only surface the
//! engine sees. Concurrent turns for one user race at the storage
//! boundary — conditional writes are the implementation's job, not ours.

use async_trait::async_trait;
use aura_common::{SessionId, StoreError, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::ConversationContext;
use crate::quota::{Tier, UsageState};

/// Persisted conversation contexts, keyed by user.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn load(&self, user_id: &UserId) -> Result<Option<ConversationContext>, StoreError>;
    async fn save(&self, context: &ConversationContext) -> Result<(), StoreError>;
    async fn clear(&self, user_id: &UserId) -> Result<(), StoreError>;
}

/// Persisted usage records, keyed by user.
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn load(&self, user_id: &UserId) -> Result<Option<UsageState>, StoreError>;
    async fn save(&self, state: &UsageState) -> Result<(), StoreError>;
}

/// One completed turn, for analytics.
#[derive(Debug, Clone, Serialize)]
pub struct TurnEvent {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub tier: Tier,
    pub message_count: usize,
    pub session_ended: bool,
    pub timestamp: DateTime<Utc>,
}

/// Best-effort analytics sink. The coordinator records events on a
/// detached task; a failing sink is logged and discarded, never surfaced
/// into the turn's result.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record(&self, event: TurnEvent) -> Result<(), StoreError>;
}
