//! Configuration schema types for Aura.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults matching the engine's documented
//! constants.

mod context;
mod limits;
mod models;
mod provider;
mod retry;
mod session;

pub use context::*;
pub use limits::*;
pub use models::*;
pub use provider::*;
pub use retry::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Aura.
///
/// All options have sensible defaults matching current behavior.
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AuraConfig {
    pub limits: LimitsConfig,
    pub context: ContextConfig,
    pub retry: RetryConfig,
    pub models: ModelsConfig,
    pub provider: ProviderConfig,
    pub session: SessionConfig,
}
