pub mod hot_reload;
pub mod schema;

pub use hot_reload::ConfigHandle;
pub use schema::{
    ApiConfig, CacheConfig, Config, DEFAULT_LOG_FORMAT, DEFAULT_ORACLE_ENDPOINT, EffectsConfig,
    LightningConfig, LoggingConfig, MessagesConfig, ParticlesConfig, PersistenceConfig,
    SoundsConfig,
};
