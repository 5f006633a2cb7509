//! Record types and lifecycle mutations.

use crate::{fingerprint, RecordId, Timestamp, Version};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire names of the replication metadata fields.
pub(crate) const FIELD_ID: &str = "id";
pub(crate) const FIELD_VERSION: &str = "_version";
pub(crate) const FIELD_UPDATED_AT: &str = "_updatedAt";
pub(crate) const FIELD_DELETED: &str = "_deleted";
pub(crate) const FIELD_HASH: &str = "_hash";
pub(crate) const FIELD_SYNC_STATUS: &str = "_syncStatus";

/// Tri-state sync flag for a local record.
///
/// Only the sync engine transitions a record out of `PendingDelete`;
/// feature modules set `Unsynced` on creation/edit and `PendingDelete`
/// on deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    /// Created or edited locally, awaiting push
    #[default]
    Unsynced,
    /// Acknowledged by the remote
    Synced,
    /// Tombstoned locally, awaiting remote removal
    PendingDelete,
}

/// A replicated data record: an opaque domain payload plus the
/// replication metadata every record of every collection carries.
///
/// The struct serializes to the flat wire format used by the remote
/// store: metadata fields are prefixed with `_` and the payload fields
/// sit alongside them at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier within the record's collection
    pub id: RecordId,
    /// Version number, incremented on each push-intended mutation
    #[serde(rename = "_version")]
    pub version: Version,
    /// Wall-clock of the last mutation (seconds since epoch)
    #[serde(rename = "_updatedAt")]
    pub updated_at: Timestamp,
    /// Tombstone flag; deleted records stay in the replication stream
    /// until both sides have observed the deletion
    #[serde(rename = "_deleted", default)]
    pub deleted: bool,
    /// Deterministic fingerprint of the record content (see [`fingerprint`])
    #[serde(rename = "_hash", default)]
    pub hash: String,
    /// Local write flag
    #[serde(rename = "_syncStatus", default)]
    pub status: SyncStatus,
    /// The domain payload, kept opaque to the engine
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Record {
    /// Create a new locally-authored record at version 1.
    pub fn new(id: impl Into<RecordId>, payload: Map<String, Value>, now: Timestamp) -> Self {
        let mut record = Self {
            id: id.into(),
            version: 1,
            updated_at: now,
            deleted: false,
            hash: String::new(),
            status: SyncStatus::Unsynced,
            payload,
        };
        record.hash = fingerprint(&record);
        record
    }

    /// Check if the record is active (not tombstoned).
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Check if the record is awaiting acknowledgement by the remote.
    pub fn is_dirty(&self) -> bool {
        self.status != SyncStatus::Synced
    }

    /// The last-write-wins ordering key. Conflict resolution compares
    /// these tuples lexicographically; see [`crate::resolve`].
    pub fn lww_key(&self) -> (Version, Timestamp) {
        (self.version, self.updated_at)
    }

    /// Check that every replication field is populated. The store
    /// rejects records for which this is false.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && self.version >= 1 && self.updated_at > 0 && !self.hash.is_empty()
    }

    /// Apply a local edit: replace the payload, bump the version,
    /// refresh the timestamp and fingerprint, and flag for push.
    pub fn touch(&mut self, payload: Map<String, Value>, now: Timestamp) {
        self.payload = payload;
        self.version += 1;
        self.updated_at = now;
        self.status = SyncStatus::Unsynced;
        self.hash = fingerprint(self);
    }

    /// Tombstone the record: mark deleted, bump the version, and flag
    /// for remote removal. The row itself is kept until the deletion
    /// has been observed by both sides.
    pub fn tombstone(&mut self, now: Timestamp) {
        self.deleted = true;
        self.version += 1;
        self.updated_at = now;
        self.status = SyncStatus::PendingDelete;
        self.hash = fingerprint(self);
    }

    /// Mark the record as acknowledged by the remote.
    pub fn mark_synced(&mut self) {
        self.status = SyncStatus::Synced;
    }
}
