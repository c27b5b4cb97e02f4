use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LOG_FORMAT: &str = "[%date%] %type% - %player%: %message%";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Violation log file name, relative to the data directory
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Line template: `%date%`, `%type%`, `%player%`, `%message%`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_file() -> String {
    "violations.log".into()
}

fn default_log_format() -> String {
    DEFAULT_LOG_FORMAT.into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PersistenceConfig {
    /// Warning counts file name, relative to the data directory
    #[serde(default = "default_warnings_file")]
    pub file: String,
    /// Seconds between periodic saves (default: 300)
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,
}

fn default_warnings_file() -> String {
    "warnings.json".into()
}

fn default_autosave_secs() -> u64 {
    300
}

impl PersistenceConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            file: default_warnings_file(),
            autosave_secs: default_autosave_secs(),
        }
    }
}
