//! Snapshot types for persisting and restoring the local store.
//!
//! The engine never touches disk; snapshots are the bridge between an
//! in-memory [`MemoryStore`](crate::MemoryStore) and whatever
//! persistence the host application provides. Serialization order is
//! deterministic so that identical states produce identical bytes.

use crate::{error::Result, CollectionName, Error, MemoryStore, Record, RecordId, RecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of the local store.
///
/// Uses BTreeMap instead of HashMap for deterministic serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// All records organized by collection, then by record id
    pub collections: BTreeMap<CollectionName, BTreeMap<RecordId, Record>>,
}

impl StoreSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            collections: BTreeMap::new(),
        }
    }

    /// Capture the full state of a store.
    pub fn capture(store: &MemoryStore) -> Self {
        let mut snapshot = Self::new();
        for collection in store.collection_names() {
            for record in store.get_all(&collection) {
                snapshot.add_record(&collection, record);
            }
        }
        snapshot
    }

    /// Restore the snapshot into a fresh store.
    ///
    /// Every record re-passes the store's completeness check, so a
    /// hand-edited or corrupted snapshot cannot smuggle in
    /// partially-initialized records.
    pub fn restore(self) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();
        for (collection, records) in self.collections {
            for (_, record) in records {
                store.upsert(&collection, record)?;
            }
        }
        Ok(store)
    }

    /// Add a record to the snapshot.
    pub fn add_record(&mut self, collection: &str, record: Record) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(record.id.clone(), record);
    }

    /// Get a record from the snapshot.
    pub fn get_record(&self, collection: &str, id: &str) -> Option<&Record> {
        self.collections.get(collection)?.get(id)
    }

    /// Count total records across all collections.
    pub fn record_count(&self) -> usize {
        self.collections.values().map(|c| c.len()).sum()
    }

    /// Count active (non-tombstoned) records.
    pub fn active_record_count(&self) -> usize {
        self.collections
            .values()
            .flat_map(|c| c.values())
            .filter(|r| r.is_active())
            .count()
    }

    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON, rejecting snapshots written by a newer
    /// format than this build understands.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        Ok(snapshot)
    }
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Export the current store state as a snapshot.
    pub fn export_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::capture(self)
    }

    /// Build a store from a snapshot.
    pub fn import_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        snapshot.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_record(id: &str, name: &str) -> Record {
        Record::new(id, json!({"name": name}).as_object().unwrap().clone(), 1000)
    }

    #[test]
    fn create_empty_snapshot() {
        let snapshot = StoreSnapshot::new();
        assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(snapshot.record_count(), 0);
    }

    #[test]
    fn capture_and_restore_roundtrip() {
        let mut store = MemoryStore::new();
        store.upsert("items", test_record("item-1", "Espresso")).unwrap();
        store.upsert("customers", test_record("cust-1", "Alice")).unwrap();

        let mut deleted = test_record("item-2", "Ristretto");
        deleted.tombstone(2000);
        store.upsert("items", deleted).unwrap();

        let snapshot = store.export_snapshot();
        assert_eq!(snapshot.record_count(), 3);
        assert_eq!(snapshot.active_record_count(), 2);

        let restored = MemoryStore::import_snapshot(snapshot).unwrap();
        assert_eq!(restored.record_count(), 3);
        assert_eq!(
            restored.get("items", "item-1").unwrap().payload["name"],
            "Espresso"
        );
        assert!(restored.get("items", "item-2").unwrap().deleted);
    }

    #[test]
    fn json_roundtrip() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.add_record("items", test_record("item-1", "Espresso"));

        let json = snapshot.to_json().unwrap();
        let restored = StoreSnapshot::from_json(&json).unwrap();

        assert_eq!(snapshot, restored);
    }

    #[test]
    fn deterministic_serialization() {
        let mut snapshot1 = StoreSnapshot::new();
        let mut snapshot2 = StoreSnapshot::new();

        // Add records in different order
        snapshot1.add_record("items", test_record("item-a", "A"));
        snapshot1.add_record("items", test_record("item-b", "B"));

        snapshot2.add_record("items", test_record("item-b", "B"));
        snapshot2.add_record("items", test_record("item-a", "A"));

        assert_eq!(snapshot1.to_json().unwrap(), snapshot2.to_json().unwrap());
    }

    #[test]
    fn restore_rejects_incomplete_records() {
        let mut snapshot = StoreSnapshot::new();
        let mut broken = test_record("item-1", "Espresso");
        broken.hash.clear();
        snapshot.add_record("items", broken);

        assert!(matches!(
            snapshot.restore(),
            Err(Error::IncompleteRecord(_))
        ));
    }

    #[test]
    fn reject_future_format_version() {
        let json = r#"{
            "formatVersion": 999,
            "collections": {}
        }"#;

        let result = StoreSnapshot::from_json(json);
        assert!(matches!(result, Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn malformed_json_is_an_invalid_snapshot() {
        assert!(matches!(
            StoreSnapshot::from_json("{ nope"),
            Err(Error::InvalidSnapshot(_))
        ));
    }
}
