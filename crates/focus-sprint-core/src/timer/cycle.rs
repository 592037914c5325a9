//! Long-break cycle counter.
//!
//! `countdown` is the number of focus sessions still to finish before the next
//! long break. It always stays within `0..=interval`.

use serde::{Deserialize, Serialize};

use super::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongBreakCycle {
    interval: u32,
    countdown: u32,
}

impl LongBreakCycle {
    /// A fresh cycle. An interval of zero is raised to one.
    pub fn new(interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            countdown: interval,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Focus sessions finished in the current cycle, for the cycle dots.
    pub fn completed(&self) -> u32 {
        self.interval - self.countdown
    }

    /// Restore a persisted countdown, clamped into range.
    pub fn restore_countdown(&mut self, countdown: Option<i64>) {
        self.countdown = match countdown {
            Some(c) => c.clamp(0, i64::from(self.interval)) as u32,
            None => self.interval,
        };
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
        self.countdown = self.countdown.min(self.interval);
    }

    /// Book-keep leaving `from` and pick the mode that follows it.
    pub fn next_mode(&mut self, from: Mode) -> Mode {
        match from {
            Mode::Focus => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    Mode::LongBreak
                } else {
                    Mode::Break
                }
            }
            Mode::Break => Mode::Focus,
            Mode::LongBreak => {
                self.countdown = self.interval;
                Mode::Focus
            }
        }
    }
}

impl Default for LongBreakCycle {
    fn default() -> Self {
        Self::new(3)
    }
}
