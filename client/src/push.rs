//! Push stage: drain local writes to the remote.
//!
//! Push collects the collection's dirty records (unsynced edits and
//! pending tombstones), merges them into the fetched remote snapshot
//! by id, and writes the snapshot back only if it changed. The merge
//! is keyed by id, so retrying after a failure converges on the same
//! remote state.

use crate::error::Result;
use crate::remote::Remote;
use serde_json::Value;
use tally_engine::{Record, RecordStore, SyncStatus};

/// What a push accomplished, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Records transitioned from unsynced to synced
    pub pushed: usize,
    /// Tombstones acknowledged by the remote and hard-removed locally
    pub tombstones_cleared: usize,
    /// Whether the remote snapshot was written back
    pub wrote_remote: bool,
}

/// Push one collection's dirty records to the remote.
///
/// With nothing dirty this returns without contacting the remote at
/// all. On any failure the dirty flags are left untouched and the next
/// cycle retries the same records.
pub async fn push<S, R>(store: &mut S, remote: &R, collection: &str) -> Result<PushReport>
where
    S: RecordStore,
    R: Remote + ?Sized,
{
    let (unsynced, pending_delete): (Vec<Record>, Vec<Record>) = store
        .get_all(collection)
        .into_iter()
        .filter(Record::is_dirty)
        .partition(|record| record.status == SyncStatus::Unsynced);

    if unsynced.is_empty() && pending_delete.is_empty() {
        return Ok(PushReport::default());
    }

    // Read-modify-write of the whole collection document. Records we
    // did not touch are carried through byte-for-byte.
    let mut snapshot = remote.fetch(collection).await?;
    let mut changed = false;

    for record in &unsynced {
        let value = serde_json::to_value(record)?;
        match position_of(&snapshot, &record.id) {
            Some(index) => {
                if snapshot[index] != value {
                    snapshot[index] = value;
                    changed = true;
                }
            }
            None => {
                snapshot.push(value);
                changed = true;
            }
        }
    }
    for record in &pending_delete {
        if let Some(index) = position_of(&snapshot, &record.id) {
            snapshot.remove(index);
            changed = true;
        }
    }

    if changed {
        remote.replace(collection, snapshot).await?;
    }

    // The remote now reflects every dirty record: flip the flags.
    let mut report = PushReport {
        wrote_remote: changed,
        ..PushReport::default()
    };
    for mut record in unsynced {
        record.mark_synced();
        store.upsert(collection, record)?;
        report.pushed += 1;
    }
    for record in pending_delete {
        store.remove(collection, &record.id);
        report.tombstones_cleared += 1;
    }

    tracing::debug!(
        collection,
        pushed = report.pushed,
        tombstones_cleared = report.tombstones_cleared,
        wrote_remote = report.wrote_remote,
        "push completed"
    );

    Ok(report)
}

/// Position of the record with the given id in a raw snapshot.
fn position_of(snapshot: &[Value], id: &str) -> Option<usize> {
    snapshot
        .iter()
        .position(|value| value.get("id").and_then(Value::as_str) == Some(id))
}
