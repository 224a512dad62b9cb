//! Deferred task scheduling for terminal stations.
//!
//! The announcer does not block the chain: it hands its deferred action to a
//! [`Scheduler`] and returns. [`TokioScheduler`] runs tasks on the current
//! runtime after a delay; [`ManualScheduler`] queues them so tests can
//! advance the schedule deterministically with [`flush`](ManualScheduler::flush).

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A deferred, run-once task.
pub type Task = Box<dyn FnOnce() + Send>;

/// Scheduling seam handed to terminal stations.
pub trait Scheduler: Send + Sync {
    /// Queue `task` to run after `delay`. Must not block the caller.
    fn schedule(&self, delay: Duration, task: Task);
}

// ---------------------------------------------------------------------------
// TokioScheduler
// ---------------------------------------------------------------------------

/// Runs tasks on the current Tokio runtime. `schedule` must be called from
/// within a runtime context.
#[derive(Debug, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

struct Deferred {
    delay: Duration,
    task: Task,
}

/// Queues tasks instead of running them on a timer; tests drive the schedule
/// by calling [`flush`](ManualScheduler::flush).
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<Vec<Deferred>>,
}

fn lock(queue: &Mutex<Vec<Deferred>>) -> MutexGuard<'_, Vec<Deferred>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Delays of the waiting tasks, in schedule order.
    pub fn scheduled_delays(&self) -> Vec<Duration> {
        lock(&self.queue).iter().map(|d| d.delay).collect()
    }

    /// Run every queued task in schedule order and return how many ran.
    ///
    /// The queue is drained before any task executes, so a task that
    /// schedules further work leaves that work for the next flush.
    pub fn flush(&self) -> usize {
        let drained = std::mem::take(&mut *lock(&self.queue));
        let count = drained.len();
        for deferred in drained {
            (deferred.task)();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        lock(&self.queue).push(Deferred { delay, task });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
