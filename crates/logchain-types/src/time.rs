use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as unix seconds.
///
/// Entry and anchor timestamps are plain unix seconds; callers that need
/// monotonicity within a chain clamp against the previous timestamp rather
/// than trusting the clock.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
