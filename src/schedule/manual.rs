use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::{ScheduledTask, Scheduler, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Timer,
    Frame,
    Done,
    Cancelled,
}

struct Slot {
    delay: Duration,
    stage: Rc<Cell<Stage>>,
    task: Rc<RefCell<Option<Task>>>,
}

/// Scheduler driven by hand from tests. Time only moves when a timer stage is
/// fired.
#[derive(Clone, Default)]
pub(crate) struct ManualScheduler {
    slots: Rc<RefCell<Vec<Slot>>>,
    now: Rc<Cell<f64>>,
    scheduled: Rc<Cell<usize>>,
}

impl ManualScheduler {
    /// Frames armed so far, cancelled ones included.
    pub fn scheduled(&self) -> usize {
        self.scheduled.get()
    }

    pub fn pending(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|s| matches!(s.stage.get(), Stage::Timer | Stage::Frame))
            .count()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.slots.borrow().last().map(|s| s.delay)
    }

    /// Expires every pending timer, advancing the clock by the longest delay.
    pub fn fire_timers(&self) {
        let slots = self.slots.borrow();
        let mut longest = Duration::ZERO;
        for slot in slots.iter().filter(|s| s.stage.get() == Stage::Timer) {
            slot.stage.set(Stage::Frame);
            longest = longest.max(slot.delay);
        }
        self.now.set(self.now.get() + longest.as_nanos() as f64 / 1e6);
    }

    /// Runs every task waiting for a paint opportunity. Returns how many ran.
    pub fn fire_frames(&self) -> usize {
        let ready: Vec<Task> = {
            let mut slots = self.slots.borrow_mut();
            let ready = slots
                .iter_mut()
                .filter(|s| s.stage.get() == Stage::Frame)
                .filter_map(|s| {
                    s.stage.set(Stage::Done);
                    s.task.borrow_mut().take()
                })
                .collect();
            slots.retain(|s| matches!(s.stage.get(), Stage::Timer | Stage::Frame));
            ready
        };
        let ran = ready.len();
        for task in ready {
            task();
        }
        ran
    }

    /// One full wait: timers, then frames.
    pub fn step(&self) -> usize {
        self.fire_timers();
        self.fire_frames()
    }
}

struct ManualTask {
    stage: Rc<Cell<Stage>>,
    task: Rc<RefCell<Option<Task>>>,
}

impl Scheduler for ManualScheduler {
    fn schedule_frame(&self, delay: Duration, task: Task) -> Box<dyn ScheduledTask> {
        let stage = Rc::new(Cell::new(Stage::Timer));
        let task = Rc::new(RefCell::new(Some(task)));
        self.slots.borrow_mut().push(Slot {
            delay,
            stage: Rc::clone(&stage),
            task: Rc::clone(&task),
        });
        self.scheduled.set(self.scheduled.get() + 1);
        Box::new(ManualTask { stage, task })
    }

    fn now(&self) -> f64 {
        self.now.get()
    }
}

impl ScheduledTask for ManualTask {
    fn cancel(&mut self) {
        if matches!(self.stage.get(), Stage::Timer | Stage::Frame) {
            self.stage.set(Stage::Cancelled);
            self.task.borrow_mut().take();
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self.stage.get(), Stage::Timer | Stage::Frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_runs_after_both_stages() {
        let scheduler = ManualScheduler::default();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let handle = scheduler.schedule_frame(
            Duration::from_millis(40),
            Box::new(move || flag.set(true)),
        );
        assert_eq!(scheduler.fire_frames(), 0);
        scheduler.fire_timers();
        assert!(handle.is_pending());
        assert!(!ran.get());
        assert_eq!(scheduler.fire_frames(), 1);
        assert!(ran.get());
        assert!(!handle.is_pending());
        assert_eq!(scheduler.now(), 40.0);
    }

    #[test]
    fn cancel_between_stages_prevents_task() {
        let scheduler = ManualScheduler::default();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let mut handle =
            scheduler.schedule_frame(Duration::from_millis(10), Box::new(move || flag.set(true)));
        scheduler.fire_timers();
        handle.cancel();
        assert_eq!(scheduler.fire_frames(), 0);
        assert!(!ran.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancel_between_stages_releases_task() {
        let scheduler = ManualScheduler::default();
        let captured = Rc::new(());
        let held = Rc::clone(&captured);
        let mut handle =
            scheduler.schedule_frame(Duration::from_millis(10), Box::new(move || drop(held)));
        scheduler.fire_timers();
        assert_eq!(Rc::strong_count(&captured), 2);
        handle.cancel();
        assert_eq!(Rc::strong_count(&captured), 1);
    }
}
