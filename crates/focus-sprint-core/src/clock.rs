//! Wall-clock reads.
//!
//! Every timestamp in the crate is epoch milliseconds (`i64`). The engine never
//! reads the clock itself; the controller passes `now` in.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or_default()
    }
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Seconds left until `end_ms`, rounded half up like the display does.
///
/// Rounding (not truncation) keeps repeated pause/start cycles from drifting
/// a second each time.
pub fn seconds_until(end_ms: i64, now_ms: i64) -> i64 {
    let delta = end_ms.saturating_sub(now_ms) as f64 / 1000.0;
    (delta + 0.5).floor() as i64
}
