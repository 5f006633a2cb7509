//! The local record store abstraction.
//!
//! Every feature module reads and writes through a [`RecordStore`]; the
//! sync stages reconcile it against the remote. The store itself
//! performs no merge logic: `upsert` overwrites unconditionally and
//! callers resolve conflicts first (see [`crate::resolve`]).

use crate::{error::Result, Error, Record};
use std::collections::HashMap;

/// Keyed, per-collection record storage.
///
/// Contract notes:
/// - `get_all` includes tombstoned records; callers filter with
///   [`Record::is_active`] when they want live data only.
/// - `upsert` overwrites any existing record with the same id. The one
///   check it performs is completeness of the replication metadata:
///   partially-initialized records never persist.
/// - `remove` is a hard local delete, used only for fully reconciled
///   tombstones - never as the primary deletion mechanism.
pub trait RecordStore {
    /// Get a record by collection and id, tombstoned or not.
    fn get(&self, collection: &str, id: &str) -> Option<Record>;

    /// Get every record in a collection, tombstones included.
    fn get_all(&self, collection: &str) -> Vec<Record>;

    /// Insert or overwrite a record. Rejects records with incomplete
    /// replication metadata.
    fn upsert(&mut self, collection: &str, record: Record) -> Result<()>;

    /// Hard-delete a record locally. A no-op if the record is absent.
    fn remove(&mut self, collection: &str, id: &str);

    /// Names of the collections that currently hold records.
    fn collection_names(&self) -> Vec<String>;
}

/// In-memory [`RecordStore`] implementation.
///
/// Persistence is the host application's concern; see
/// [`crate::StoreSnapshot`] for the export/import seam.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, HashMap<String, Record>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total record count across all collections, tombstones included.
    pub fn record_count(&self) -> usize {
        self.collections.values().map(|c| c.len()).sum()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Option<Record> {
        self.collections.get(collection)?.get(id).cloned()
    }

    fn get_all(&self, collection: &str) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .collections
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default();
        // Deterministic order regardless of insertion history.
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    fn upsert(&mut self, collection: &str, record: Record) -> Result<()> {
        if !record.is_complete() {
            return Err(Error::IncompleteRecord(record.id));
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&mut self, collection: &str, id: &str) {
        if let Some(records) = self.collections.get_mut(collection) {
            records.remove(id);
        }
    }

    fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncStatus;
    use serde_json::json;

    fn test_record(id: &str, name: &str) -> Record {
        Record::new(id, json!({"name": name}).as_object().unwrap().clone(), 1000)
    }

    #[test]
    fn upsert_and_get() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-1", "Espresso")).unwrap();

        let record = store.get("items", "item-1").unwrap();
        assert_eq!(record.payload["name"], "Espresso");
        assert!(store.get("items", "item-2").is_none());
        assert!(store.get("customers", "item-1").is_none());
    }

    #[test]
    fn upsert_overwrites_unconditionally() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-1", "Espresso")).unwrap();

        // Lower-versioned content still overwrites: conflict resolution
        // is the caller's job, not the store's.
        let mut replacement = test_record("item-1", "Ristretto");
        replacement.status = SyncStatus::Synced;
        store.upsert("items", replacement).unwrap();

        let record = store.get("items", "item-1").unwrap();
        assert_eq!(record.payload["name"], "Ristretto");
        assert_eq!(record.status, SyncStatus::Synced);
    }

    #[test]
    fn upsert_rejects_incomplete_records() {
        let mut store = MemoryStore::new();

        let mut incomplete = test_record("item-1", "Espresso");
        incomplete.hash.clear();

        let result = store.upsert("items", incomplete);
        assert!(matches!(result, Err(Error::IncompleteRecord(id)) if id == "item-1"));
        assert!(store.get("items", "item-1").is_none());
    }

    #[test]
    fn get_all_includes_tombstones() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-1", "Espresso")).unwrap();

        let mut deleted = test_record("item-2", "Ristretto");
        deleted.tombstone(2000);
        store.upsert("items", deleted).unwrap();

        let all = store.get_all("items");
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|r| r.is_active()).count(), 1);
    }

    #[test]
    fn get_all_is_sorted_by_id() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-b", "B")).unwrap();
        store.upsert("items", test_record("item-a", "A")).unwrap();
        store.upsert("items", test_record("item-c", "C")).unwrap();

        let ids: Vec<_> = store.get_all("items").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["item-a", "item-b", "item-c"]);
    }

    #[test]
    fn remove_is_a_hard_delete() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-1", "Espresso")).unwrap();

        store.remove("items", "item-1");
        assert!(store.get("items", "item-1").is_none());
        assert!(store.get_all("items").is_empty());

        // Removing again is a no-op.
        store.remove("items", "item-1");
        store.remove("ghosts", "item-1");
    }

    #[test]
    fn collections_are_independent() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("x", "Espresso")).unwrap();
        store.upsert("customers", test_record("x", "Alice")).unwrap();

        store.remove("items", "x");

        assert!(store.get("items", "x").is_none());
        assert!(store.get("customers", "x").is_some());
        assert_eq!(store.collection_names(), vec!["customers", "items"]);
    }

    #[test]
    fn record_count() {
        let mut store = MemoryStore::new();
        assert_eq!(store.record_count(), 0);

        store.upsert("items", test_record("item-1", "Espresso")).unwrap();
        store.upsert("customers", test_record("cust-1", "Alice")).unwrap();
        assert_eq!(store.record_count(), 2);
    }
}
