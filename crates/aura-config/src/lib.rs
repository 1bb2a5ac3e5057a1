//! Aura configuration system.
//!
//! Provides TOML-based configuration for the conversation engine: usage
//! limits, context token budget, retry policy, per-tier model table,
//! provider endpoint, and session thresholds. All sections use sensible
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aura_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("daily limit: {}", config.limits.free_daily_limit);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AuraConfig, ContextConfig, LimitsConfig, ModelConfig, ModelsConfig, ProviderConfig,
    RetryConfig, SessionConfig,
};

use aura_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<AuraConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
