//! Per-user daily usage limits.
//!
//! The gate issues decisions, never errors: an at-limit result is a normal
//! outcome the caller turns into an upsell or apology. Calendar-day
//! rollover uses UTC as the reference zone — deployments in every region
//! reset at the same instant, matching the UTC stamps the engine stores.

use aura_common::UserId;
use aura_config::LimitsConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Subscription tier governing model choice and usage limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    /// Turn ceiling for shaped history, independent of the token math.
    pub fn max_history_messages(self) -> usize {
        match self {
            Tier::Free => 10,
            Tier::Premium => 20,
        }
    }
}

/// Persisted per-user usage record. Created on first encounter as free
/// tier with a zero count; never deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageState {
    pub user_id: UserId,
    pub tier: Tier,
    pub daily_usage_count: u32,
    /// The count is only meaningful relative to this stamp's UTC calendar
    /// day.
    pub last_reset_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UsageState {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            tier: Tier::Free,
            daily_usage_count: 0,
            last_reset_date: now,
            subscription_id: None,
            expires_at: None,
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Questions left today for free tier; `None` for premium, where the
    /// count is irrelevant.
    pub remaining: Option<u32>,
}

/// Daily quota state machine for free-tier users. Premium bypasses it
/// entirely.
#[derive(Debug, Clone)]
pub struct UsageGate {
    daily_limit: u32,
}

impl UsageGate {
    pub fn new(config: &LimitsConfig) -> Self {
        Self {
            daily_limit: config.free_daily_limit,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Admission check. Rolls the counter over FIRST when the UTC calendar
    /// day changed, so the first check after midnight sees a fresh quota.
    pub fn check(&self, state: &mut UsageState) -> Admission {
        self.check_at(state, Utc::now())
    }

    pub fn check_at(&self, state: &mut UsageState, now: DateTime<Utc>) -> Admission {
        roll_over_if_new_day(state, now);
        match state.tier {
            Tier::Premium => Admission {
                allowed: true,
                remaining: None,
            },
            Tier::Free => Admission {
                allowed: state.daily_usage_count < self.daily_limit,
                remaining: Some(self.daily_limit.saturating_sub(state.daily_usage_count)),
            },
        }
    }

    /// Consume one question. Premium increments are no-ops; the rollover
    /// check still runs first.
    pub fn increment(&self, state: &mut UsageState) {
        self.increment_at(state, Utc::now());
    }

    pub fn increment_at(&self, state: &mut UsageState, now: DateTime<Utc>) {
        roll_over_if_new_day(state, now);
        if state.tier == Tier::Free {
            state.daily_usage_count += 1;
        }
    }

    /// Questions left today, without mutating the record.
    pub fn remaining(&self, state: &UsageState) -> Option<u32> {
        match state.tier {
            Tier::Premium => None,
            Tier::Free => Some(self.daily_limit.saturating_sub(state.daily_usage_count)),
        }
    }
}

fn roll_over_if_new_day(state: &mut UsageState, now: DateTime<Utc>) {
    if state.last_reset_date.date_naive() != now.date_naive() {
        debug!(user = %state.user_id, "daily quota rollover");
        state.daily_usage_count = 0;
        state.last_reset_date = now;
    }
}
