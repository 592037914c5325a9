use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every state change in the session state machine produces an Event.
/// Hosts render from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: i64,
        end_timestamp_ms: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    /// A running session crossed its end instant.
    TimerCompleted {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Moved to the next mode in the cycle, by expiry or skip.
    ModeAdvanced {
        from: Mode,
        to: Mode,
        long_break_countdown: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: Mode,
        duration_secs: i64,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    LongBreakIntervalChanged {
        interval: u32,
        long_break_countdown: u32,
        at: DateTime<Utc>,
    },
}
