use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Config;

/// Live-reloadable configuration holder.
///
/// Wraps `Config` in an `ArcSwap` so message handling never blocks on a
/// reload and the admin `reload` command atomically swaps the pointer.
pub struct ConfigHandle {
    inner: Arc<ArcSwap<Config>>,
    path: PathBuf,
}

impl ConfigHandle {
    /// Create a new handle seeded with `config`.
    pub fn new(config: Config) -> Self {
        let path = config.config_path.clone();
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
            path,
        }
    }

    /// Load current config snapshot. Lock-free.
    pub fn load(&self) -> arc_swap::Guard<Arc<Config>> {
        self.inner.load()
    }

    /// Return a clone of the current `Arc<Config>`.
    pub fn load_full(&self) -> Arc<Config> {
        self.inner.load_full()
    }

    /// Re-read config from disk and swap it in.
    ///
    /// On any read, parse or validation error the active snapshot is kept.
    pub fn reload(&self) -> anyhow::Result<Arc<Config>> {
        let mut fresh = Config::load_from_path(&self.path)?;
        fresh.apply_env_overrides();
        fresh.validate()?;
        let fresh = Arc::new(fresh);
        self.inner.store(Arc::clone(&fresh));
        tracing::info!(path = %self.path.display(), "config reloaded");
        Ok(fresh)
    }

    /// Manually swap in a new config (e.g. after programmatic mutation).
    pub fn store(&self, config: Config) {
        self.inner.store(Arc::new(config));
    }

    /// Config file path used by [`reload`](Self::reload).
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for ConfigHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            path: self.path.clone(),
        }
    }
}
