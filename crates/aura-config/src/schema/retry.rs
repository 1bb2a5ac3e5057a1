//! Retry and timeout configuration for outbound model calls.

use serde::{Deserialize, Serialize};

/// Retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (2 means 3 attempts total).
    pub max_retries: u32,
    /// Base backoff delay, doubled per attempt.
    pub base_delay_ms: u64,
    /// Ceiling on a single backoff delay.
    pub max_delay_ms: u64,
    /// Global wall-clock deadline for one model call.
    pub request_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 2000,
            request_timeout_ms: 8000,
        }
    }
}
