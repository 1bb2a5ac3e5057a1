//! Retry policy for outbound model calls.
//!
//! Up to `max_retries` additional attempts after the first, with
//! exponential backoff (≤10% jitter, capped) between them. Earlier
//! attempts run under a shrunken deadline so the whole call stays inside
//! one wall-clock budget while still leaving headroom to retry; the final
//! attempt gets the full timeout. Only [`FailureKind::is_retryable`] kinds
//! are retried, and exhaustion surfaces the last observed failure — a
//! retry loop never converts failure into success.

use std::future::Future;
use std::time::Duration;

use aura_config::RetryConfig;
use rand::Rng;
use tracing::debug;

use crate::error::{RequestOutcome, TransportFailure};

/// How much of the global timeout each earlier attempt gives up.
const DEADLINE_SHRINK_PER_ATTEMPT: Duration = Duration::from_millis(1000);
/// Floor for a shrunken per-attempt deadline.
const MIN_ATTEMPT_DEADLINE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    request_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Backoff before the attempt after `attempt` (0-based):
    /// `min(base × 2^attempt + jitter, max_delay)` where jitter is at most
    /// 10% of the exponential term.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        let jitter_cap = (exponential.as_millis() as u64) / 10;
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_cap));
        (exponential + jitter).min(self.max_delay)
    }

    /// Deadline for one attempt. Earlier attempts shrink by 1s each so
    /// retries fit inside the global timeout; the final attempt gets the
    /// full timeout since nothing runs after it.
    pub fn attempt_deadline(&self, attempt: u32) -> Duration {
        if attempt >= self.max_retries {
            return self.request_timeout;
        }
        self.request_timeout
            .saturating_sub(DEADLINE_SHRINK_PER_ATTEMPT.saturating_mul(attempt))
            .max(MIN_ATTEMPT_DEADLINE)
            .min(self.request_timeout)
    }

    /// Drive `op` through the retry loop. The closure receives the attempt
    /// index and that attempt's deadline.
    ///
    /// An explicit loop rather than recursion: the attempt index carries
    /// all state, so the stack stays flat however many retries run.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TransportFailure>
    where
        F: FnMut(u32, Duration) -> Fut,
        Fut: Future<Output = Result<T, TransportFailure>>,
    {
        let mut attempt = 0;
        loop {
            let deadline = self.attempt_deadline(attempt);
            match RequestOutcome::classify(op(attempt, deadline).await) {
                RequestOutcome::Success(value) => return Ok(value),
                RequestOutcome::FatalFailure(failure) => {
                    debug!(kind = %failure.kind, attempt, "model call failed, not retryable");
                    return Err(failure);
                }
                RequestOutcome::RetryableFailure(failure) => {
                    if attempt >= self.max_retries {
                        debug!(kind = %failure.kind, attempt, "retries exhausted");
                        return Err(failure);
                    }
                    let delay = self.backoff_delay(attempt);
                    debug!(
                        kind = %failure.kind,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "model call failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
