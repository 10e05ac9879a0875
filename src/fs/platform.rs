//! Platform-dependent timestamp queries

use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Creation time of a file.
///
/// Uses the birth time when the platform and filesystem report one,
/// otherwise falls back to the last modification time.
pub fn creation_time(metadata: &Metadata) -> SystemTime {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(UNIX_EPOCH)
}

/// Modification time, or the epoch when the platform cannot report it
pub fn modification_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(UNIX_EPOCH)
}

/// Seconds since the Unix epoch as a float (negative before the epoch)
pub fn unix_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}
