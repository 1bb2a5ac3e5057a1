//! Failure taxonomy for outbound model calls.
//!
//! Every transport failure is classified into a [`FailureKind`] at the
//! orchestrator boundary. The kind alone decides retry eligibility; the
//! caller uses it to pick a spoken error message. Kinds the engine cannot
//! classify surface as `Unknown` and are never retried.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse category explaining why a model call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Authentication,
    RateLimit,
    Timeout,
    Network,
    Server,
    Validation,
    QuotaExceeded,
    ModelUnavailable,
    ContentFilter,
    Unknown,
}

impl FailureKind {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::RateLimit
                | FailureKind::Server
                | FailureKind::Timeout
                | FailureKind::Network
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Authentication => "authentication",
            FailureKind::RateLimit => "rate limit",
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::Server => "server",
            FailureKind::Validation => "validation",
            FailureKind::QuotaExceeded => "quota exceeded",
            FailureKind::ModelUnavailable => "model unavailable",
            FailureKind::ContentFilter => "content filter",
            FailureKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// A classified transport failure, optionally carrying the HTTP status and
/// a diagnostic detail from the provider.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind} failure: {message}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP response from the error body and status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail: String = body.chars().take(200).collect();
        Self {
            kind: classify_status(status, body),
            status: Some(status),
            message: format!("HTTP {status}: {detail}"),
        }
    }

    /// Classify a reqwest-level failure (never reached the HTTP layer,
    /// or the connection died mid-flight).
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::Network
        };
        Self::new(kind, err.to_string())
    }
}

/// Map an HTTP status plus error body onto a [`FailureKind`].
///
/// The body matters in two places: a 429 carrying an `insufficient_quota`
/// code is an exhausted account, not a transient rate limit, and a 404 only
/// means the model is gone when the body says so.
pub fn classify_status(status: u16, body: &str) -> FailureKind {
    match status {
        401 | 403 => FailureKind::Authentication,
        408 => FailureKind::Timeout,
        429 => {
            if body.contains("insufficient_quota") {
                FailureKind::QuotaExceeded
            } else {
                FailureKind::RateLimit
            }
        }
        404 => {
            if body.contains("model_not_found") || body.contains("does not exist") {
                FailureKind::ModelUnavailable
            } else {
                FailureKind::Validation
            }
        }
        400 => {
            if body.contains("content_filter") || body.contains("content_policy") {
                FailureKind::ContentFilter
            } else {
                FailureKind::Validation
            }
        }
        s if (402..500).contains(&s) => FailureKind::Validation,
        s if (500..600).contains(&s) => FailureKind::Server,
        _ => FailureKind::Unknown,
    }
}

/// Classification of one transport attempt, as consumed by the retry loop.
#[derive(Debug)]
pub enum RequestOutcome<T> {
    Success(T),
    RetryableFailure(TransportFailure),
    FatalFailure(TransportFailure),
}

impl<T> RequestOutcome<T> {
    pub fn classify(result: Result<T, TransportFailure>) -> Self {
        match result {
            Ok(value) => RequestOutcome::Success(value),
            Err(failure) if failure.kind.is_retryable() => {
                RequestOutcome::RetryableFailure(failure)
            }
            Err(failure) => RequestOutcome::FatalFailure(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds_are_exactly_the_transient_four() {
        let retryable = [
            FailureKind::RateLimit,
            FailureKind::Server,
            FailureKind::Timeout,
            FailureKind::Network,
        ];
        let fatal = [
            FailureKind::Authentication,
            FailureKind::Validation,
            FailureKind::QuotaExceeded,
            FailureKind::ModelUnavailable,
            FailureKind::ContentFilter,
            FailureKind::Unknown,
        ];
        for kind in retryable {
            assert!(kind.is_retryable(), "{kind} should be retryable");
        }
        for kind in fatal {
            assert!(!kind.is_retryable(), "{kind} should not be retryable");
        }
    }

    #[test]
    fn classifies_auth_statuses() {
        assert_eq!(classify_status(401, ""), FailureKind::Authentication);
        assert_eq!(classify_status(403, ""), FailureKind::Authentication);
    }

    #[test]
    fn classifies_rate_limit_vs_quota() {
        assert_eq!(classify_status(429, "slow down"), FailureKind::RateLimit);
        assert_eq!(
            classify_status(429, r#"{"error":{"code":"insufficient_quota"}}"#),
            FailureKind::QuotaExceeded
        );
    }

    #[test]
    fn classifies_model_not_found() {
        assert_eq!(
            classify_status(404, r#"{"error":{"code":"model_not_found"}}"#),
            FailureKind::ModelUnavailable
        );
        assert_eq!(classify_status(404, "no such route"), FailureKind::Validation);
    }

    #[test]
    fn classifies_content_filter() {
        assert_eq!(
            classify_status(400, r#"{"error":{"code":"content_filter"}}"#),
            FailureKind::ContentFilter
        );
        assert_eq!(classify_status(400, "bad request"), FailureKind::Validation);
    }

    #[test]
    fn classifies_server_errors_as_retryable() {
        for status in [500, 502, 503, 529] {
            let kind = classify_status(status, "");
            assert_eq!(kind, FailureKind::Server);
            assert!(kind.is_retryable());
        }
    }

    #[test]
    fn unexpected_status_is_unknown() {
        assert_eq!(classify_status(301, ""), FailureKind::Unknown);
        assert!(!classify_status(301, "").is_retryable());
    }

    #[test]
    fn from_status_truncates_long_bodies() {
        let body = "x".repeat(1000);
        let failure = TransportFailure::from_status(500, &body);
        assert_eq!(failure.status, Some(500));
        assert!(failure.message.len() < 300);
    }

    #[test]
    fn outcome_classification_follows_retryability() {
        let ok: Result<u32, TransportFailure> = Ok(7);
        assert!(matches!(
            RequestOutcome::classify(ok),
            RequestOutcome::Success(7)
        ));

        let transient: Result<u32, TransportFailure> =
            Err(TransportFailure::new(FailureKind::RateLimit, "429"));
        assert!(matches!(
            RequestOutcome::classify(transient),
            RequestOutcome::RetryableFailure(_)
        ));

        let fatal: Result<u32, TransportFailure> =
            Err(TransportFailure::new(FailureKind::Authentication, "401"));
        assert!(matches!(
            RequestOutcome::classify(fatal),
            RequestOutcome::FatalFailure(_)
        ));
    }

    #[test]
    fn display_includes_kind_and_detail() {
        let failure = TransportFailure::from_status(503, "upstream connect error");
        assert_eq!(
            failure.to_string(),
            "server failure: HTTP 503: upstream connect error"
        );
    }
}
