use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ModerationError;

/// `actor_id -> warning count` persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct WarningStore {
    path: PathBuf,
}

impl WarningStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file → empty map. Unreadable or corrupt file → error.
    pub fn load(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading warnings: {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing warnings: {}", self.path.display()))
    }

    /// Write `warnings` atomically (temp file + rename).
    pub async fn save(&self, warnings: &BTreeMap<String, u32>) -> Result<(), ModerationError> {
        let data = serde_json::to_vec_pretty(warnings)
            .map_err(|e| ModerationError::PersistenceWrite(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error("creating directory", &e))?;
        }

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| self.write_error("writing temp file", &e))?;

        if let Err(rename_error) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(self.write_error("replacing file", &rename_error));
        }
        Ok(())
    }

    fn write_error(&self, step: &str, error: &std::io::Error) -> ModerationError {
        ModerationError::PersistenceWrite(format!("{step} {}: {error}", self.path.display()))
    }
}
