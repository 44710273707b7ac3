//! Wall-clock helpers shared by presence and the event producers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in seconds. A clock before the epoch reads as 0.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
