//! # Tally Client
//!
//! Terminal-side sync layer for Tally. Drives the pure
//! [`tally_engine`] core against a remote whole-document store over
//! HTTP, so a terminal can work offline and reconcile later.
//!
//! ## Protocol
//!
//! The remote exposes one endpoint per deployment:
//!
//! - `GET <endpoint>?collection=<name>` returns the full array of
//!   records for that collection
//! - `POST <endpoint>?collection=<name>` with a JSON array body
//!   replaces the entire collection
//!
//! The [`Remote`] trait abstracts this seam; [`HttpRemote`] is the
//! production implementation.
//!
//! ## Sync cycle
//!
//! [`Syncer::sync`] runs push-then-pull per registered collection:
//! push drains local writes (unsynced records and pending tombstones)
//! to the remote, pull absorbs the remote snapshot through
//! sanitization and last-write-wins resolution. A failure in one
//! collection is logged and does not block the others; every step is
//! idempotent, so the next cycle simply retries.
//!
//! Call `sync()` on explicit user action, on network-reconnect events,
//! and before any computation that needs a fresh snapshot. A cycle
//! borrows the syncer mutably, so two cycles over the same store
//! cannot interleave.

pub mod clock;
pub mod config;
pub mod error;
pub mod pull;
pub mod push;
pub mod remote;
pub mod sync;

pub use clock::unix_timestamp_now;
pub use config::{ConfigError, SyncConfig};
pub use error::{Result, SyncError};
pub use pull::{pull, PullReport};
pub use push::{push, PushReport};
pub use remote::{HttpRemote, Remote};
pub use sync::{CollectionOutcome, SyncSummary, Syncer};
