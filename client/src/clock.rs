//! Wall-clock access for the sync stages.
//!
//! The engine takes timestamps as explicit parameters; this is the one
//! place the client reads the system clock.

use std::time::{SystemTime, UNIX_EPOCH};
use tally_engine::Timestamp;

/// Current wall-clock time in seconds since the unix epoch.
pub fn unix_timestamp_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
