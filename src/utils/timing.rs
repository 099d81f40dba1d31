//! Human-like randomized delays
//!
//! Search engines fingerprint perfectly regular interaction timing. Every
//! scripted pause in the crawler goes through [`human_sleep`] so the cadence
//! stays jittered. None of these delays are correctness requirements.

use rand::Rng;
use std::time::Duration;

/// Scale applied to every delay in the page extraction stage
pub const EXTRACTION_DELAY_SCALE: f64 = 1.2;

/// Pick a delay of `base ± jitter` milliseconds, clamped at zero
#[must_use]
pub fn jittered_delay(base_ms: u64, jitter_ms: u64) -> Duration {
    let jitter = i64::try_from(jitter_ms).unwrap_or(i64::MAX);
    let delta = if jitter == 0 {
        0
    } else {
        rand::rng().random_range(-jitter..=jitter)
    };
    let base = i64::try_from(base_ms).unwrap_or(i64::MAX);
    Duration::from_millis(base.saturating_add(delta).max(0).unsigned_abs())
}

/// Sleep for `base ± jitter` milliseconds
pub async fn human_sleep(base_ms: u64, jitter_ms: u64) {
    tokio::time::sleep(jittered_delay(base_ms, jitter_ms)).await;
}

/// Apply [`EXTRACTION_DELAY_SCALE`] to a millisecond value
#[must_use]
pub fn scaled_ms(ms: u64) -> u64 {
    (ms as f64 * EXTRACTION_DELAY_SCALE).round() as u64
}
