//! Full configuration validation.
//!
//! Validates numeric ranges and cross-field constraints. Errors are
//! collected into a single `ConfigError` so a bad file reports everything
//! wrong with it at once.

use crate::schema::{AuraConfig, ModelConfig};
use aura_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AuraConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.limits.free_daily_limit == 0 {
        errors.push("limits.free_daily_limit must be at least 1".into());
    }

    validate_range(
        &mut errors,
        "context.max_context_tokens",
        config.context.max_context_tokens,
        512,
        1_000_000,
    );
    if config.context.reply_reserve_tokens >= config.context.max_context_tokens {
        errors.push(format!(
            "context.reply_reserve_tokens = {} must be below max_context_tokens = {}",
            config.context.reply_reserve_tokens, config.context.max_context_tokens
        ));
    }

    validate_range(&mut errors, "retry.max_retries", config.retry.max_retries, 0, 10);
    if config.retry.base_delay_ms == 0 {
        errors.push("retry.base_delay_ms must be at least 1".into());
    }
    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        errors.push(format!(
            "retry.base_delay_ms = {} exceeds max_delay_ms = {}",
            config.retry.base_delay_ms, config.retry.max_delay_ms
        ));
    }
    if config.retry.request_timeout_ms < 1000 {
        errors.push(format!(
            "retry.request_timeout_ms = {} is below the 1000ms minimum",
            config.retry.request_timeout_ms
        ));
    }

    validate_model(&mut errors, "models.free", &config.models.free, config);
    validate_model(&mut errors, "models.premium", &config.models.premium, config);

    if !config.provider.api_base.starts_with("http") {
        errors.push(format!(
            "provider.api_base = {:?} is not an http(s) URL",
            config.provider.api_base
        ));
    }

    if config.session.max_turn_messages < 2 {
        errors.push("session.max_turn_messages must be at least 2 (one full turn)".into());
    }
    if config.session.idle_end_minutes < 1 {
        errors.push("session.idle_end_minutes must be at least 1".into());
    }
    if config.session.hard_expiry_minutes <= config.session.idle_end_minutes {
        errors.push(format!(
            "session.hard_expiry_minutes = {} must exceed idle_end_minutes = {}",
            config.session.hard_expiry_minutes, config.session.idle_end_minutes
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, name: &str, model: &ModelConfig, config: &AuraConfig) {
    if model.model.is_empty() {
        errors.push(format!("{name}.model must not be empty"));
    }
    if model.max_response_tokens == 0 {
        errors.push(format!("{name}.max_response_tokens must be at least 1"));
    }
    if model.max_response_tokens + config.context.reply_reserve_tokens
        >= config.context.max_context_tokens
    {
        errors.push(format!(
            "{name}.max_response_tokens = {} leaves no context budget under max_context_tokens = {}",
            model.max_response_tokens, config.context.max_context_tokens
        ));
    }
    validate_range_f64(errors, &format!("{name}.temperature"), model.temperature, 0.0, 2.0);
    if model.top_p <= 0.0 || model.top_p > 1.0 {
        errors.push(format!(
            "{name}.top_p = {} is out of range (0.0, 1.0]",
            model.top_p
        ));
    }
}

/// Push an error if `value` is outside `[min, max]` (integer).
fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is outside `[min, max]` (float).
fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
