//! Frame scheduling. A scheduled frame waits out a delay, then waits for the
//! host's next paint opportunity, then runs its task. Both waits belong to a
//! single [`ScheduledTask`], and cancelling it at any point before the task
//! starts means the task never runs.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(test)]
pub(crate) mod manual;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    fn schedule_frame(&self, delay: Duration, task: Task) -> Box<dyn ScheduledTask>;
    /// Monotonic time in milliseconds.
    fn now(&self) -> f64;
}

pub trait ScheduledTask {
    /// Revokes both waits and releases the task unrun. Idempotent; a no-op
    /// once the task has run.
    fn cancel(&mut self);
    fn is_pending(&self) -> bool;
}
