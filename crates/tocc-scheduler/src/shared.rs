//! Thread-safe handle around a scheduler

use crate::outcome::ScheduleOutcome;
use crate::scheduler::{FinalHistory, TimestampScheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use tocc_primitives::Operation;

/// Scheduler shared between threads
///
/// Every call holds the lock for its full duration, so operations from
/// different threads are serialized in lock order and timestamps stay
/// globally ordered. The resulting history is whatever interleaving the
/// lock produced.
#[derive(Clone, Default)]
pub struct SharedScheduler {
    inner: Arc<Mutex<TimestampScheduler>>,
}

impl SharedScheduler {
    /// Create a handle around a fresh scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing scheduler
    pub fn from_scheduler(scheduler: TimestampScheduler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }

    /// Schedule one operation
    pub fn schedule(&self, op: Operation) -> ScheduleOutcome {
        self.inner.lock().schedule(op)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FinalHistory {
        self.inner.lock().snapshot()
    }

    /// Run `f` against the scheduler while holding the lock
    pub fn with<R>(&self, f: impl FnOnce(&TimestampScheduler) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl std::fmt::Debug for SharedScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedScheduler")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
