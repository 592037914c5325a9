mod cycle;
mod engine;
pub mod interval;
mod mode;
mod snapshot;

pub use cycle::LongBreakCycle;
pub use engine::{format_clock, AutoStart, Recovery, TickOutcome, TimerEngine, TimerStatus};
pub use interval::{IntervalHandle, IntervalScheduler, IntervalSlot};
pub use mode::{Mode, PerMode};
pub use snapshot::{PersistedSnapshot, SnapshotTiming};
