//! Deterministic record fingerprinting.
//!
//! The fingerprint detects records whose replication metadata was
//! injected after the fact and backs future integrity checks. It is
//! computed over the record content with `_hash` excluded, so it is
//! stable across recomputation cycles. `_syncStatus` is also excluded:
//! status transitions are local bookkeeping, not mutations.

use crate::record::{FIELD_DELETED, FIELD_ID, FIELD_UPDATED_AT, FIELD_VERSION};
use crate::Record;
use serde_json::{Map, Value};

/// Compute the fingerprint of a record.
///
/// The canonical form is the JSON serialization of the payload merged
/// with the identity and replication fields. `serde_json`'s `Map` is
/// BTreeMap-backed, so keys serialize in sorted order at every nesting
/// level and the result is deterministic across replicas.
pub fn fingerprint(record: &Record) -> String {
    let mut doc: Map<String, Value> = record.payload.clone();
    doc.insert(FIELD_ID.into(), Value::from(record.id.clone()));
    doc.insert(FIELD_VERSION.into(), Value::from(record.version));
    doc.insert(FIELD_UPDATED_AT.into(), Value::from(record.updated_at));
    doc.insert(FIELD_DELETED.into(), Value::from(record.deleted));

    // Serializing a JSON value to a string cannot fail: all keys are
    // strings and there is no IO involved.
    let canonical =
        serde_json::to_vec(&Value::Object(doc)).expect("JSON value serialization is infallible");

    blake3::hash(&canonical).to_hex().to_string()
}
