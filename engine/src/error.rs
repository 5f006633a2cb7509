//! Error types for the Tally engine.

use crate::RecordId;
use thiserror::Error;

/// All possible errors from the Tally engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A record without complete replication metadata reached the store.
    /// Records must pass through [`crate::sanitize`] or the [`crate::Record`]
    /// constructors before being persisted.
    #[error("record has incomplete replication metadata: {0}")]
    IncompleteRecord(RecordId),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
