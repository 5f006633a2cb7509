//! Self-healing record sanitization.
//!
//! Every record entering or leaving the store passes through
//! [`sanitize`]. Remote data may originate from legacy writers that
//! never populated the replication fields; locally created records may
//! predate the current metadata model. Sanitization repairs both: it is
//! total, never fails, and sanitizing its own output is a fixed point.

use crate::record::{
    FIELD_DELETED, FIELD_HASH, FIELD_ID, FIELD_SYNC_STATUS, FIELD_UPDATED_AT, FIELD_VERSION,
};
use crate::{fingerprint, Record, SyncStatus, Timestamp};
use serde_json::{Map, Value};

/// Outcome of sanitizing a raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    /// The healed record, with all replication fields populated and a
    /// freshly computed fingerprint.
    pub record: Record,
    /// Whether any replication field had to be defaulted or injected.
    pub healed: bool,
    /// Whether a stored fingerprint was present but disagreed with the
    /// recomputed one. This is an integrity anomaly: it is repaired
    /// silently, but callers should log it.
    pub hash_mismatch: bool,
}

/// Normalize any JSON value into a complete, consistent record.
///
/// Rules:
/// - non-object input becomes an empty payload;
/// - `_version` defaults to 1, `_updatedAt` to `now`, `_deleted` to
///   false, `_syncStatus` to synced - each only if absent or invalid,
///   existing valid values are never overwritten;
/// - a numeric `id` (legacy writers) is coerced to its decimal string;
/// - a missing `id` is derived deterministically from the healed
///   content, so repeated sanitization assigns the same identity;
/// - `_hash` is recomputed; a disagreeing stored hash is reported via
///   [`Sanitized::hash_mismatch`].
pub fn sanitize(value: Value, now: Timestamp) -> Sanitized {
    let mut fields = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let (id, id_healed) = take_id(&mut fields);
    let version = fields
        .remove(FIELD_VERSION)
        .and_then(|v| v.as_u64())
        .filter(|v| *v >= 1);
    let updated_at = fields
        .remove(FIELD_UPDATED_AT)
        .and_then(|v| v.as_u64())
        .filter(|t| *t > 0);
    let deleted = fields.remove(FIELD_DELETED).and_then(|v| v.as_bool());
    let stored_hash = take_string(&mut fields, FIELD_HASH);
    let status = fields
        .remove(FIELD_SYNC_STATUS)
        .and_then(|v| serde_json::from_value::<SyncStatus>(v).ok());

    let mut healed = id_healed
        || version.is_none()
        || updated_at.is_none()
        || deleted.is_none()
        || status.is_none()
        || stored_hash.is_none();

    let mut record = Record {
        id: id.unwrap_or_default(),
        version: version.unwrap_or(1),
        updated_at: updated_at.unwrap_or(now),
        deleted: deleted.unwrap_or(false),
        hash: String::new(),
        status: status.unwrap_or(SyncStatus::Synced),
        payload: fields,
    };

    if record.id.is_empty() {
        // Derive a stable identity from the healed content so that
        // sanitizing the same malformed record twice yields the same id.
        let seed = fingerprint(&record);
        record.id = format!("auto-{}", &seed[..16]);
        healed = true;
    }

    let expected = fingerprint(&record);
    let hash_mismatch = matches!(&stored_hash, Some(stored) if *stored != expected);
    record.hash = expected;

    Sanitized {
        record,
        healed,
        hash_mismatch,
    }
}

/// Extract the record identity. Legacy writers assign numeric ids;
/// those are coerced to their decimal string rather than discarded, so
/// the record keeps its identity across healing.
fn take_id(fields: &mut Map<String, Value>) -> (Option<String>, bool) {
    match fields.remove(FIELD_ID) {
        Some(Value::String(id)) if !id.is_empty() => (Some(id), false),
        Some(Value::Number(id)) => (Some(id.to_string()), true),
        _ => (None, true),
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    fields
        .remove(key)
        .and_then(|v| v.as_str().map(str::to_owned))
        .filter(|s| !s.is_empty())
}
