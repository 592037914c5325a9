use serde::{Deserialize, Serialize};

use super::mode::Mode;

/// Minimal record needed to rebuild a session after a restart.
///
/// A running session stores its absolute end instant; a paused one stores the
/// seconds it had left. Exactly one of the two is present in a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub mode: Mode,
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
    /// Missing in records written before the long-break cycle existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_countdown: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotTiming {
    Running { end_timestamp_ms: i64 },
    Paused { remaining_secs: i64 },
}

impl PersistedSnapshot {
    pub fn running(mode: Mode, end_timestamp_ms: i64, long_break_countdown: u32) -> Self {
        Self {
            mode,
            running: true,
            end_timestamp_ms: Some(end_timestamp_ms),
            remaining_secs: None,
            long_break_countdown: Some(i64::from(long_break_countdown)),
        }
    }

    pub fn paused(mode: Mode, remaining_secs: i64, long_break_countdown: u32) -> Self {
        Self {
            mode,
            running: false,
            end_timestamp_ms: None,
            remaining_secs: Some(remaining_secs),
            long_break_countdown: Some(i64::from(long_break_countdown)),
        }
    }

    /// `None` when the record lacks the field its `running` flag requires.
    pub fn timing(&self) -> Option<SnapshotTiming> {
        if self.running {
            self.end_timestamp_ms
                .map(|end_timestamp_ms| SnapshotTiming::Running { end_timestamp_ms })
        } else {
            self.remaining_secs
                .map(|remaining_secs| SnapshotTiming::Paused { remaining_secs })
        }
    }
}
