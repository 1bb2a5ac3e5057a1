pub mod errors;
pub mod id;

pub use errors::{AuraError, ConfigError, StoreError};
pub use id::{new_correlation_id, new_id, SessionId, UserId};

pub type Result<T> = std::result::Result<T, AuraError>;
