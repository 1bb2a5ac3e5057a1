//! Conversation session lifecycle thresholds.

use serde::{Deserialize, Serialize};

/// Session lifecycle thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// A conversation should end once it holds this many messages.
    pub max_turn_messages: usize,
    /// Idle time after which a session should end (soft, reprompt decision).
    pub idle_end_minutes: i64,
    /// Idle time after which a stored context is discarded on access.
    pub hard_expiry_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turn_messages: 20,
            idle_end_minutes: 30,
            hard_expiry_minutes: 120,
        }
    }
}
