use super::super::{
    ApiConfig, CacheConfig, EffectsConfig, LoggingConfig, MessagesConfig, PersistenceConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_true")]
    pub enable_warnings: bool,

    #[serde(default = "default_max_warnings")]
    pub max_warnings: u32,

    #[serde(default = "default_true")]
    pub enable_effects: bool,

    #[serde(default = "default_true")]
    pub enable_logging: bool,

    /// Rate limiter window in milliseconds
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Actors allowed to use the admin command surface
    #[serde(default)]
    pub admins: Vec<String>,

    /// Directory for warnings and the violation log; `~` is expanded.
    /// Defaults to the directory holding config.toml.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub effects: EffectsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,
}

fn default_true() -> bool {
    true
}

fn default_max_warnings() -> u32 {
    3
}

fn default_check_interval() -> u64 {
    100
}

pub(crate) fn default_config_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".newlife")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_dir().join("config.toml"),
            enable_warnings: true,
            max_warnings: default_max_warnings(),
            enable_effects: true,
            enable_logging: true,
            check_interval: default_check_interval(),
            admins: Vec::new(),
            data_dir: None,
            cache: CacheConfig::default(),
            api: ApiConfig::default(),
            effects: EffectsConfig::default(),
            logging: LoggingConfig::default(),
            messages: MessagesConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl Config {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval)
    }

    /// Resolved data directory: the expanded `data-dir` or the config file's
    /// parent directory.
    pub fn data_dir(&self) -> PathBuf {
        match self.data_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(dir.trim()).into_owned())
            }
            _ => self
                .config_path
                .parent()
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
        }
    }

    pub fn warnings_path(&self) -> PathBuf {
        self.data_dir().join(&self.persistence.file)
    }

    pub fn violation_log_path(&self) -> PathBuf {
        self.data_dir().join(&self.logging.file)
    }

    pub fn is_admin(&self, actor_id: &str) -> bool {
        self.admins.iter().any(|admin| admin == actor_id)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_warnings == 0 {
            return Err(ConfigError::Validation(
                "max-warnings must be at least 1".into(),
            ));
        }
        if self.cache.max_size == 0 {
            return Err(ConfigError::Validation(
                "cache.max-size must be at least 1".into(),
            ));
        }
        if self.api.timeout == 0 {
            return Err(ConfigError::Validation(
                "api.timeout must be greater than zero".into(),
            ));
        }
        let endpoint = url::Url::parse(&self.api.endpoint).map_err(|e| {
            ConfigError::Validation(format!("api.endpoint {:?} is not a URL: {e}", self.api.endpoint))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.endpoint must use http or https, got {}",
                endpoint.scheme()
            )));
        }
        if self.persistence.autosave_secs == 0 {
            return Err(ConfigError::Validation(
                "persistence.autosave-secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
