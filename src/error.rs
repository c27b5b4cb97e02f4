use std::time::Duration;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `newlife`.
///
/// Neither is fatal to the host: log failures are reported, persistence
/// failures are retried on the next save. Classifier failures never reach
/// this level; the pipeline fails open on them.
#[derive(Debug, Error)]
pub enum ModerationError {
    // ── Violation log sink ──────────────────────────────────────────────
    #[error("violation log write failed: {0}")]
    LogWrite(String),

    // ── Warning persistence ─────────────────────────────────────────────
    #[error("warning persistence write failed: {0}")]
    PersistenceWrite(String),
}

// ─── Classifier errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("oracle timed out after {}ms", .0.as_millis())]
    OracleTimeout(Duration),

    #[error("oracle returned malformed response: {0:?}")]
    OracleMalformedResponse(String),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
