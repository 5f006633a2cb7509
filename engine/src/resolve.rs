//! Last-write-wins conflict resolution.
//!
//! The `(version, updatedAt)` tuple gives a total order over all copies
//! of a record: higher version wins, wall-clock breaks ties. Equal
//! tuples are treated as a no-op merge, which makes repeated
//! application of the same remote snapshot idempotent.

use crate::Record;
use serde::{Deserialize, Serialize};

/// Which copy of a record survives a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// The local copy stays (also used for no-op merges of equal tuples)
    LocalWins,
    /// The remote copy strictly dominates and overwrites local state
    RemoteWins,
}

/// Resolve a conflict between the local and remote copy of one record.
///
/// Remote wins only on strict lexicographic dominance of
/// `(version, updatedAt)`; a tie keeps the local copy, so applying the
/// same snapshot twice changes nothing.
pub fn resolve(local: &Record, remote: &Record) -> Resolution {
    if remote.lww_key() > local.lww_key() {
        Resolution::RemoteWins
    } else {
        Resolution::LocalWins
    }
}
