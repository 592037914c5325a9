//! Session state machine.
//!
//! The engine is a wall-clock-based state machine over three modes. It does
//! not own a thread or a clock: every operation that depends on time takes
//! `now_ms`, and the caller is responsible for calling `tick()` once per
//! second while a session runs.
//!
//! ## State Transitions
//!
//! ```text
//! Focus --(countdown > 0)--> Break --> Focus
//! Focus --(countdown = 0)--> LongBreak --> Focus (countdown refilled)
//! ```
//!
//! Each mode is crossed with `running`. While running, the end instant is
//! authoritative and the current mode's remaining seconds are derived from it.
//! While paused, the stored remaining seconds are authoritative.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::cycle::LongBreakCycle;
use super::mode::{Mode, PerMode};
use super::snapshot::{PersistedSnapshot, SnapshotTiming};
use crate::clock::seconds_until;
use crate::events::Event;

/// Which transitions start the next session on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoStart {
    pub breaks: bool,
    pub focus: bool,
}

impl AutoStart {
    fn applies_to(self, mode: Mode) -> bool {
        if mode.is_break() {
            self.breaks
        } else {
            self.focus
        }
    }
}

/// Result of one 1 Hz tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is running.
    Idle,
    /// Still counting down; nothing mutated.
    Counting { time_left: i64, total: i64 },
    /// The end instant has passed. The caller notifies, then advances.
    Expired { mode: Mode },
}

/// What the restart recovery did with the persisted snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// No snapshot; defaults are in place.
    Fresh,
    /// Paused session restored verbatim.
    Paused { remaining_secs: i64 },
    /// Running session resumed with the same budget it had left.
    Resumed { time_left: i64 },
    /// The session ended while nobody was watching; advanced once.
    Expired { mode: Mode, advanced: Event },
}

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TimerStatus {
    pub mode: Mode,
    pub running: bool,
    pub time_left_secs: i64,
    pub total_secs: i64,
    /// 0.0 .. 1.0 through the current session.
    pub progress: f64,
    pub display: String,
    pub end_timestamp_ms: Option<i64>,
    pub cycle_completed: u32,
    pub long_break_interval: u32,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: Mode,
    /// Target duration per mode, seconds.
    durations: PerMode<i64>,
    /// Seconds left per mode. Stale for the current mode while running.
    remaining: PerMode<i64>,
    running: bool,
    end_timestamp_ms: Option<i64>,
    cycle: LongBreakCycle,
    auto_start: AutoStart,
}

impl TimerEngine {
    /// Fresh engine in paused Focus with full durations.
    pub fn new(durations: PerMode<i64>, long_break_interval: u32, auto_start: AutoStart) -> Self {
        Self {
            mode: Mode::Focus,
            durations,
            remaining: durations,
            running: false,
            end_timestamp_ms: None,
            cycle: LongBreakCycle::new(long_break_interval),
            auto_start,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn end_timestamp_ms(&self) -> Option<i64> {
        self.end_timestamp_ms
    }

    pub fn duration(&self, mode: Mode) -> i64 {
        self.durations.get(mode)
    }

    /// Stored remaining seconds for `mode`. Not authoritative for the current
    /// mode while running; use [`time_left`](Self::time_left) for that.
    pub fn stored_remaining(&self, mode: Mode) -> i64 {
        self.remaining.get(mode)
    }

    pub fn cycle(&self) -> &LongBreakCycle {
        &self.cycle
    }

    pub fn auto_start(&self) -> AutoStart {
        self.auto_start
    }

    /// Seconds left in the current session as of `now_ms`.
    pub fn time_left(&self, now_ms: i64) -> i64 {
        match (self.running, self.end_timestamp_ms) {
            (true, Some(end)) => seconds_until(end, now_ms),
            _ => self.remaining.get(self.mode),
        }
    }

    pub fn status(&self, now_ms: i64) -> TimerStatus {
        let time_left = self.time_left(now_ms);
        let total = self.durations.get(self.mode);
        let progress = if total <= 0 {
            0.0
        } else {
            (1.0 - time_left as f64 / total as f64).clamp(0.0, 1.0)
        };
        TimerStatus {
            mode: self.mode,
            running: self.running,
            time_left_secs: time_left,
            total_secs: total,
            progress,
            display: format_clock(time_left),
            end_timestamp_ms: self.end_timestamp_ms,
            cycle_completed: self.cycle.completed(),
            long_break_interval: self.cycle.interval(),
        }
    }

    /// Record to persist after a state change.
    pub fn snapshot(&self, now_ms: i64) -> PersistedSnapshot {
        let countdown = self.cycle.countdown();
        match (self.running, self.end_timestamp_ms) {
            (true, Some(end)) => PersistedSnapshot::running(self.mode, end, countdown),
            _ => PersistedSnapshot::paused(self.mode, self.time_left(now_ms), countdown),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down the current mode. No-op when already running or
    /// when the mode has no time left.
    pub fn start(&mut self, now_ms: i64) -> Option<Event> {
        if self.running {
            return None;
        }
        let duration = self.remaining.get(self.mode);
        if duration <= 0 {
            debug!(mode = %self.mode, duration, "refusing to start non-positive session");
            return None;
        }
        let end = now_ms.saturating_add(duration.saturating_mul(1000));
        self.running = true;
        self.end_timestamp_ms = Some(end);
        debug!(mode = %self.mode, duration, end, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: duration,
            end_timestamp_ms: end,
            at: at(now_ms),
        })
    }

    pub fn pause(&mut self, now_ms: i64) -> Option<Event> {
        if !self.running {
            return None;
        }
        let left = self.time_left(now_ms).max(0);
        self.remaining.set(self.mode, left);
        self.running = false;
        self.end_timestamp_ms = None;
        debug!(mode = %self.mode, left, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: left,
            at: at(now_ms),
        })
    }

    /// Call once per second while running. Never mutates.
    pub fn tick(&self, now_ms: i64) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        let time_left = self.time_left(now_ms);
        if time_left < 0 {
            TickOutcome::Expired { mode: self.mode }
        } else {
            TickOutcome::Counting {
                time_left,
                total: self.durations.get(self.mode),
            }
        }
    }

    /// Move to the next mode in the cycle and reset its countdown. Starts it
    /// straight away when the matching auto-start flag is set.
    pub fn advance(&mut self, now_ms: i64) -> Event {
        let from = self.mode;
        let next = self.cycle.next_mode(from);
        self.mode = next;
        self.remaining.set(next, self.durations.get(next));
        self.running = false;
        self.end_timestamp_ms = None;

        let auto_started = self.auto_start.applies_to(next) && self.start(now_ms).is_some();
        debug!(%from, to = %next, countdown = self.cycle.countdown(), auto_started, "mode advanced");
        Event::ModeAdvanced {
            from,
            to: next,
            long_break_countdown: self.cycle.countdown(),
            auto_started,
            at: at(now_ms),
        }
    }

    /// Jump straight to `target`, discarding any progress it had.
    pub fn switch_mode(&mut self, target: Mode, now_ms: i64) -> Event {
        self.mode = target;
        self.remaining.set(target, self.durations.get(target));
        self.running = false;
        self.end_timestamp_ms = None;
        debug!(mode = %target, "mode switched");
        Event::ModeSwitched {
            mode: target,
            at: at(now_ms),
        }
    }

    /// Refill the current mode and stop.
    pub fn reset(&mut self, now_ms: i64) -> Event {
        self.remaining.set(self.mode, self.durations.get(self.mode));
        self.running = false;
        self.end_timestamp_ms = None;
        debug!(mode = %self.mode, "timer reset");
        Event::TimerReset {
            mode: self.mode,
            at: at(now_ms),
        }
    }

    /// Set a mode's target duration.
    ///
    /// When `mode` is current, the session keeps the same fraction left: half
    /// way through a 20 minute focus edited to 30 leaves 15 minutes. Other
    /// modes' stored remaining values are left alone until they are entered.
    pub fn change_duration(&mut self, mode: Mode, new_secs: i64, now_ms: i64) -> Event {
        let old = self.durations.get(mode);
        self.durations.set(mode, new_secs);

        let mut remaining_secs = self.remaining.get(mode);
        if mode == self.mode {
            let left_before = self.time_left(now_ms);
            let ratio = if old > 0 {
                left_before as f64 / old as f64
            } else {
                1.0
            };
            let new_left = (new_secs as f64 * ratio).round() as i64;
            if self.running {
                self.end_timestamp_ms = Some(now_ms.saturating_add(new_left.saturating_mul(1000)));
            } else {
                self.remaining.set(mode, new_left);
            }
            remaining_secs = new_left;
            debug!(%mode, old, new_secs, left_before, new_left, "session rescaled");
        }
        Event::DurationChanged {
            mode,
            duration_secs: new_secs,
            remaining_secs,
            at: at(now_ms),
        }
    }

    pub fn change_long_break_interval(&mut self, interval: u32, now_ms: i64) -> Event {
        self.cycle.set_interval(interval);
        Event::LongBreakIntervalChanged {
            interval: self.cycle.interval(),
            long_break_countdown: self.cycle.countdown(),
            at: at(now_ms),
        }
    }

    pub fn set_auto_start(&mut self, auto_start: AutoStart) {
        self.auto_start = auto_start;
    }

    /// Rebuild state from a persisted snapshot after a restart.
    ///
    /// A running session resumes with the time it had left, re-anchored to
    /// `now_ms`. If its end instant already passed, the engine advances exactly
    /// once instead of starting with a negative duration.
    pub fn restore(&mut self, snapshot: &PersistedSnapshot, now_ms: i64) -> Recovery {
        let Some(timing) = snapshot.timing() else {
            return Recovery::Fresh;
        };
        self.mode = snapshot.mode;
        self.running = false;
        self.end_timestamp_ms = None;
        self.cycle.restore_countdown(snapshot.long_break_countdown);

        match timing {
            SnapshotTiming::Running { end_timestamp_ms } => {
                let time_left = seconds_until(end_timestamp_ms, now_ms);
                if time_left > 0 {
                    self.remaining.set(self.mode, time_left);
                    self.start(now_ms);
                    Recovery::Resumed { time_left }
                } else {
                    let mode = self.mode;
                    let advanced = self.advance(now_ms);
                    Recovery::Expired { mode, advanced }
                }
            }
            SnapshotTiming::Paused { remaining_secs } => {
                self.remaining.set(self.mode, remaining_secs);
                Recovery::Paused { remaining_secs }
            }
        }
    }
}

/// `m:ss`, the way the countdown is shown. Negative values show as `0:00`.
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn at(now_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms).unwrap_or_default()
}
