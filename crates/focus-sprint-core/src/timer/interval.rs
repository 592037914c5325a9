//! The repeating 1 Hz tick signal, as a host capability.
//!
//! The host decides how ticks are delivered (a tokio task, a UI timer, a test
//! harness). The controller only ever holds one handle and cancels it before
//! arming another.

/// A live repeating timer. Cancelling twice is harmless.
pub trait IntervalHandle: Send {
    fn cancel(&mut self);
}

/// Arms a repeating timer that calls back into the controller's `tick()`
/// once per second.
pub trait IntervalScheduler: Send {
    fn schedule(&mut self) -> Box<dyn IntervalHandle>;
}

/// Owned slot for the single active interval.
#[derive(Default)]
pub struct IntervalSlot {
    handle: Option<Box<dyn IntervalHandle>>,
}

impl IntervalSlot {
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel any previous interval, then arm a new one.
    pub fn arm(&mut self, scheduler: &mut dyn IntervalScheduler) {
        self.clear();
        self.handle = Some(scheduler.schedule());
    }

    pub fn clear(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Drop for IntervalSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Scheduler that never fires. Used by one-shot hosts that exit right after
/// a command; the next load re-derives everything from the snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

struct NoopHandle;

impl IntervalHandle for NoopHandle {
    fn cancel(&mut self) {}
}

impl IntervalScheduler for NoopScheduler {
    fn schedule(&mut self) -> Box<dyn IntervalHandle> {
        Box::new(NoopHandle)
    }
}
