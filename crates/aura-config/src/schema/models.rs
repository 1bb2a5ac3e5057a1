//! Per-tier model parameters.

use serde::{Deserialize, Serialize};

/// Model parameters for one subscription tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider model identifier.
    pub model: String,
    /// Maximum tokens the model may generate for one reply.
    pub max_response_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            max_response_tokens: 256,
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

/// Tier-keyed model table. Tier is the only input; everything else about a
/// model call derives from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub free: ModelConfig,
    pub premium: ModelConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            free: ModelConfig::default(),
            premium: ModelConfig {
                model: "gpt-4o".into(),
                max_response_tokens: 512,
                temperature: 0.7,
                top_p: 1.0,
            },
        }
    }
}
