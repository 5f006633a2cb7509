//! # Tally Engine
//!
//! The offline-first replication core for Tally terminals.
//!
//! Every terminal works against a local copy of its data while a single
//! remote store remains the eventual source of truth. This crate provides
//! the pieces that make those copies converge: the record metadata model,
//! the local record store abstraction, self-healing sanitization, and
//! last-write-wins conflict resolution.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or platform
//! - **Explicit time**: wall-clock timestamps are always passed in, never read
//! - **Self-healing**: malformed records are repaired, never rejected
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! Data is stored as [`Record`]s: an opaque JSON payload plus replication
//! metadata that every record of every collection carries:
//!
//! - `id` - identity, unique within its collection
//! - `_version` - monotonically incremented on each local mutation
//! - `_updatedAt` - wall-clock seconds, tie-breaker for equal versions
//! - `_deleted` - tombstone flag; deletions are soft until both sides confirm
//! - `_hash` - deterministic fingerprint of the record content
//! - `_syncStatus` - tri-state local write flag ([`SyncStatus`])
//!
//! ### Sanitization
//!
//! [`sanitize`] turns *any* JSON value into a complete, consistent record.
//! Remote data may originate from legacy writers that never populated the
//! replication fields; sanitization repairs them instead of failing.
//!
//! ### Conflict Resolution
//!
//! [`resolve`] implements last-write-wins over the `(version, updatedAt)`
//! tuple. The order is total, so any two replicas that observe the same
//! records converge regardless of merge order. The trade-off is inherited
//! from the protocol: a concurrent local edit with a lagging wall clock can
//! lose to a same-version remote write.
//!
//! ## Quick Start
//!
//! ```rust
//! use tally_engine::{MemoryStore, Record, RecordStore};
//! use serde_json::json;
//!
//! let mut store = MemoryStore::new();
//!
//! let payload = json!({"name": "Espresso", "price": 250});
//! let record = Record::new("item-1", payload.as_object().unwrap().clone(), 1_700_000_000);
//!
//! store.upsert("items", record).unwrap();
//! assert!(store.get("items", "item-1").is_some());
//! ```
//!
//! ## Persistence
//!
//! The engine never touches disk. Use [`MemoryStore::export_snapshot`] and
//! [`MemoryStore::import_snapshot`] with [`StoreSnapshot`] to let the host
//! application persist the local copy between runs; snapshots serialize to
//! JSON with deterministic ordering.

pub mod error;
pub mod fingerprint;
pub mod record;
pub mod resolve;
pub mod sanitize;
pub mod snapshot;
pub mod store;

// Re-export main types at crate root
pub use error::Error;
pub use fingerprint::fingerprint;
pub use record::{Record, SyncStatus};
pub use resolve::{resolve, Resolution};
pub use sanitize::{sanitize, Sanitized};
pub use snapshot::{StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use store::{MemoryStore, RecordStore};

/// Type aliases for clarity
pub type RecordId = String;
pub type CollectionName = String;
pub type Version = u64;
pub type Timestamp = u64;
