use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://www.purgomalum.com/service/containsprofanity";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Maximum number of cached verdicts (default: 1000)
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
    /// Seconds a verdict stays valid after it was written (default: 3600)
    #[serde(default = "default_expire_after_write")]
    pub expire_after_write: u64,
}

fn default_cache_max_size() -> usize {
    1000
}

fn default_expire_after_write() -> u64 {
    3600
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expire_after_write)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_cache_max_size(),
            expire_after_write: default_expire_after_write(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Classification oracle endpoint, queried as `GET <endpoint>?text=...`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Hard timeout for one oracle call in milliseconds (default: 5000)
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ORACLE_ENDPOINT.into()
}

fn default_api_timeout() -> u64 {
    5000
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_api_timeout(),
        }
    }
}
