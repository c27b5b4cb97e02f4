use super::Config;
use super::types::default_config_dir;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let config_dir = default_config_dir();
        Self::load_or_init_at(&config_dir.join("config.toml"))
    }

    /// Load `config_path`, writing a default file first if it does not exist.
    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let mut config = if config_path.exists() {
            Self::load_from_path(config_path)?
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`. Env overrides and validation are left to
    /// the caller so an override can correct a value on disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            ConfigError::Load(format!("failed to parse config at {}: {e}", path.display()))
        })?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str)
            .map_err(ConfigError::from)
            .context("Failed to write config file")?;
        Ok(())
    }
}
