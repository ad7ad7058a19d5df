use tokio::time::Instant;

// tokio's Instant is monotonic and follows the paused clock in tests.
pub fn now_instant() -> Instant {
    Instant::now()
}

/// Milliseconds since `start`, saturating at `u64::MAX`.
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
