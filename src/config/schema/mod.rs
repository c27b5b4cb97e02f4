pub(crate) mod core;
mod effects;
mod messages;
mod moderation;
mod storage;

pub use core::Config;
pub use effects::{EffectsConfig, LightningConfig, ParticlesConfig, SoundsConfig};
pub use messages::MessagesConfig;
pub use moderation::{ApiConfig, CacheConfig, DEFAULT_ORACLE_ENDPOINT};
pub use storage::{DEFAULT_LOG_FORMAT, LoggingConfig, PersistenceConfig};
