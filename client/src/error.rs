//! Error types for the sync client.
//!
//! No error here is escalated to a user-visible failure: the system
//! always prefers stale-but-consistent local data over blocking the
//! caller. Transport failures are retried on the next cycle; a
//! malformed remote payload aborts that collection's cycle and leaves
//! local state untouched.

use thiserror::Error;

/// All possible errors from a sync cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network unreachable, timeout, connection reset. Retried on the
    /// next cycle, never fatal.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote returned a payload that is not a JSON record array.
    /// Aborts the affected collection's cycle; other collections
    /// continue.
    #[error("malformed remote payload: {0}")]
    Parse(String),

    /// The remote answered with a non-success status.
    #[error("remote rejected request: {0}")]
    Api(String),

    /// The local store rejected a write.
    #[error(transparent)]
    Store(#[from] tally_engine::Error),

    #[error("invalid sync configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether the next sync cycle is expected to succeed without any
    /// intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Parse(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Parse(err.to_string())
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
