//! Crate error type.
//!
//! Range and configuration problems are rejected before a session starts;
//! store failures are recoverable and carry the backend's reason so callers
//! can decide whether to retry or fall back.

use thiserror::Error;

/// Errors surfaced by the memorisation engine and its stores.
#[derive(Debug, Error)]
pub enum HifzError {
    /// The requested verse range resolves to zero verses.
    #[error("verse range {start}..={end} is empty for a document of {total} verses")]
    RangeEmpty { start: i64, end: i64, total: usize },

    /// Guided sessions need at least one verse per chunk.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(i64),

    /// A guided phase was configured with zero repetitions.
    #[error("repeat count for {phase} must be at least 1, got {value}")]
    InvalidRepeat { phase: &'static str, value: u32 },

    /// No document with this slug exists in the corpus.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// Persisting a session result failed. Nothing is retried automatically.
    #[error("failed to save session result: {0}")]
    StoreWriteFailed(String),

    /// Loading the session history failed.
    #[error("failed to load session history: {0}")]
    StoreReadFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl HifzError {
    /// Returns `true` for failures the caller can recover from by retrying
    /// or switching stores.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HifzError::StoreWriteFailed(_) | HifzError::StoreReadFailed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HifzError>;
