//! Sync orchestrator: sequences push-then-pull per collection.
//!
//! The orchestrator performs no conflict logic itself; it is a
//! sequencing and fan-out layer over [`push`] and [`pull`]. Within one
//! collection push always precedes pull, so a cycle drains local
//! writes before absorbing remote state and a fresh local edit cannot
//! disappear behind a stale snapshot. Collections are independent: a
//! failure in one is logged and recorded, and the rest still run.

use crate::clock::unix_timestamp_now;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::pull::{pull, PullReport};
use crate::push::{push, PushReport};
use crate::remote::{HttpRemote, Remote};
use tally_engine::RecordStore;

/// Outcome of one collection's sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub collection: String,
    pub push: PushReport,
    pub pull: PullReport,
}

/// Outcome of a full sync pass over every registered collection.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Collections that completed push and pull
    pub completed: Vec<CollectionOutcome>,
    /// Collections whose cycle aborted, with the error that stopped it
    pub failed: Vec<(String, SyncError)>,
}

impl SyncSummary {
    /// Whether every registered collection completed its cycle.
    pub fn is_fully_synced(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The sync engine's single externally-visible entry point.
///
/// Feature modules read and write only through the store this syncer
/// owns; [`Syncer::sync`] reconciles that store with the remote. Call
/// it on explicit user action, on network-reconnect events, and before
/// any feature computation that needs a fresh snapshot (opening a
/// procurement view, checking for an already-open shift).
///
/// A cycle takes `&mut self`, so overlapping cycles over the same
/// store are ruled out at compile time; callers that share a syncer
/// await the in-flight cycle instead of restarting it.
pub struct Syncer<S, R> {
    store: S,
    remote: R,
    collections: Vec<String>,
}

impl<S: RecordStore> Syncer<S, HttpRemote> {
    /// Build a syncer over HTTP from a loaded configuration (see
    /// [`SyncConfig::from_env`]). Fails if the configured endpoint is
    /// not a valid http(s) URL.
    pub fn from_config(store: S, config: &SyncConfig) -> Result<Self> {
        let remote = HttpRemote::new(config.endpoint.as_str())?;
        Ok(Self::new(store, remote, config.collections.iter().cloned()))
    }
}

impl<S, R> Syncer<S, R>
where
    S: RecordStore,
    R: Remote,
{
    /// Create a syncer over a store, a remote, and the collections to
    /// replicate (in sync order).
    pub fn new(
        store: S,
        remote: R,
        collections: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            store,
            remote,
            collections: collections.into_iter().map(Into::into).collect(),
        }
    }

    /// The local store; feature modules read through this.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the local store for feature-module writes
    /// (create unsynced records, tombstone deletions).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The registered collections, in sync order.
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Run push-then-pull for every registered collection.
    pub async fn sync(&mut self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let collections = self.collections.clone();

        for collection in collections {
            match self.sync_collection(&collection).await {
                Ok(outcome) => summary.completed.push(outcome),
                Err(err) => {
                    tracing::warn!(
                        collection = %collection,
                        error = %err,
                        retryable = err.is_retryable(),
                        "sync cycle aborted for collection"
                    );
                    summary.failed.push((collection, err));
                }
            }
        }

        summary
    }

    /// Run one collection's push-then-pull cycle, for callers that
    /// need a freshness guarantee on a single collection.
    pub async fn sync_collection(&mut self, collection: &str) -> Result<CollectionOutcome> {
        let push_report = push(&mut self.store, &self.remote, collection).await?;
        let pull_report = pull(
            &mut self.store,
            &self.remote,
            collection,
            unix_timestamp_now(),
        )
        .await?;

        Ok(CollectionOutcome {
            collection: collection.to_string(),
            push: push_report,
            pull: pull_report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_engine::MemoryStore;

    #[test]
    fn from_config_wires_endpoint_and_collections() {
        let config = SyncConfig::new("https://api.example.com/sync/", ["items", "shifts"]);
        let syncer = Syncer::from_config(MemoryStore::new(), &config).unwrap();

        assert_eq!(syncer.collections(), ["items", "shifts"]);
    }

    #[test]
    fn from_config_rejects_invalid_endpoint() {
        let config = SyncConfig::new("api.example.com/sync", ["items"]);
        let result = Syncer::from_config(MemoryStore::new(), &config);

        assert!(matches!(result, Err(SyncError::Config(_))));
    }
}
