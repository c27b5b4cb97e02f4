use chrono::{DateTime, Local};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::ModerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Violation,
}

#[derive(Debug, Clone)]
pub struct ViolationRecord {
    pub timestamp: DateTime<Local>,
    pub actor_id: String,
    pub text: String,
    pub kind: ViolationKind,
}

impl ViolationRecord {
    pub fn violation(actor_id: &str, text: &str) -> Self {
        Self {
            timestamp: Local::now(),
            actor_id: actor_id.to_string(),
            text: text.to_string(),
            kind: ViolationKind::Violation,
        }
    }

    /// Render with a `%date%` / `%type%` / `%player%` / `%message%` template.
    /// Line breaks in the message are flattened so one record is one line.
    pub fn render(&self, format: &str) -> String {
        let message = self.text.replace(['\r', '\n'], " ");
        format
            .replace("%date%", &self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
            .replace("%type%", &self.kind.to_string())
            .replace("%player%", &self.actor_id)
            .replace("%message%", &message)
    }
}

pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ModerationError>> + Send + 'a>>;

/// Append-only destination for confirmed violations.
pub trait ViolationSink: Send + Sync {
    fn record<'a>(&'a self, record: &'a ViolationRecord) -> SinkFuture<'a>;
}

/// Appends one rendered line per record to a text file.
pub struct FileViolationLog {
    path: PathBuf,
    format: String,
    write_lock: Mutex<()>,
}

impl FileViolationLog {
    pub fn new(path: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: format.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: &ViolationRecord) -> Result<(), ModerationError> {
        let mut line = record.render(&self.format);
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(&e))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.write_error(&e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.write_error(&e))?;
        file.flush().await.map_err(|e| self.write_error(&e))
    }

    fn write_error(&self, error: &std::io::Error) -> ModerationError {
        ModerationError::LogWrite(format!("{}: {error}", self.path.display()))
    }
}

impl ViolationSink for FileViolationLog {
    fn record<'a>(&'a self, record: &'a ViolationRecord) -> SinkFuture<'a> {
        Box::pin(self.append(record))
    }
}

impl std::fmt::Debug for FileViolationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileViolationLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
