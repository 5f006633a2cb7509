//! Pull stage: absorb the remote snapshot into the local store.
//!
//! Every remote record is sanitized first - remote data may originate
//! from legacy writers without replication metadata - then merged
//! under the last-write-wins order. Finally, local records the remote
//! no longer lists are reconciled as server-side deletions. Each
//! record's merge is independently idempotent, so a failure mid-loop
//! leaves a state the next cycle completes from.

use crate::error::Result;
use crate::remote::Remote;
use std::collections::HashSet;
use tally_engine::{resolve, sanitize, RecordStore, Resolution, Sanitized, Timestamp};

/// What a pull accomplished, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullReport {
    /// Remote records upserted locally (new or dominant)
    pub merged: usize,
    /// Fully-synced local records removed because the remote no longer
    /// lists them
    pub removed: usize,
    /// Remote records whose replication metadata had to be healed
    pub healed: usize,
    /// Remote records whose stored fingerprint disagreed with their
    /// content (repaired silently, logged)
    pub anomalies: usize,
}

/// Pull one collection's remote snapshot into the local store.
///
/// `now` is the wall-clock used when healing records that lack an
/// `_updatedAt` of their own.
pub async fn pull<S, R>(
    store: &mut S,
    remote: &R,
    collection: &str,
    now: Timestamp,
) -> Result<PullReport>
where
    S: RecordStore,
    R: Remote + ?Sized,
{
    let snapshot = remote.fetch(collection).await?;

    let mut report = PullReport::default();
    let mut remote_ids: HashSet<String> = HashSet::with_capacity(snapshot.len());

    for value in snapshot {
        let Sanitized {
            mut record,
            healed,
            hash_mismatch,
        } = sanitize(value, now);

        if healed {
            report.healed += 1;
        }
        if hash_mismatch {
            report.anomalies += 1;
            tracing::warn!(
                collection,
                id = %record.id,
                "stored fingerprint disagreed with record content, repaired"
            );
        }

        // The remote copy is by definition acknowledged; a stale
        // _syncStatus written by another terminal must not leak into
        // this terminal's dirty tracking.
        record.mark_synced();
        remote_ids.insert(record.id.clone());

        let apply = match store.get(collection, &record.id) {
            None => true,
            Some(local) => resolve(&local, &record) == Resolution::RemoteWins,
        };
        if apply {
            store.upsert(collection, record)?;
            report.merged += 1;
        }
    }

    // Reconcile server-side deletions: a fully-synced local record the
    // remote no longer lists was deleted by another terminal. Dirty
    // records (unsynced or pending-delete) are protected - they simply
    // have not been pushed yet.
    for local in store.get_all(collection) {
        if !local.is_dirty() && !remote_ids.contains(&local.id) {
            store.remove(collection, &local.id);
            report.removed += 1;
        }
    }

    tracing::debug!(
        collection,
        merged = report.merged,
        removed = report.removed,
        healed = report.healed,
        anomalies = report.anomalies,
        "pull completed"
    );

    Ok(report)
}
