//! Daily usage limit configuration.

use serde::{Deserialize, Serialize};

/// Per-user daily usage limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Questions a free-tier user may ask per calendar day (UTC).
    /// Premium users are never limited.
    pub free_daily_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_daily_limit: 5,
        }
    }
}
