//! The render loop: advance the engine, read its buffer, repaint, re-arm.
//!
//! At most one frame is ever scheduled. Every transition that stops the loop
//! cancels the pending frame before anything else is armed, and the loop
//! parameters are read when a cycle starts, not when it was scheduled.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::LoopParams;
use crate::engine::Engine;
use crate::fps::{FpsSummary, FrameClock};
use crate::rendering::{DrawingSurface, Palette, paint_cells, paint_grid};
use crate::schedule::{ScheduledTask, Scheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopPhase {
    Stopped,
    Scheduled,
    Running,
}

/// What a finished cycle publishes to the status display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub generation: u64,
    pub fps: Option<FpsSummary>,
}

impl FrameReport {
    pub fn generation_label(&self) -> String {
        format!("Generation: {}", self.generation)
    }

    pub fn fps_label(&self) -> String {
        match self.fps {
            Some(FpsSummary { mean, min, max, .. }) => format!("Fps: {mean} | {min} | {max}"),
            None => "Fps: -".to_owned(),
        }
    }
}

pub type FrameListener = Box<dyn FnMut(&FrameReport)>;

struct LoopState<E, S> {
    engine: Rc<RefCell<E>>,
    surface: Rc<RefCell<S>>,
    scheduler: Rc<dyn Scheduler>,
    palette: Palette,
    params: LoopParams,
    running: bool,
    phase: LoopPhase,
    pending: Option<Box<dyn ScheduledTask>>,
    clock: FrameClock,
    generation: u64,
    cycles: u64,
    listener: Option<FrameListener>,
}

pub struct AnimationController<E: Engine + 'static, S: DrawingSurface + 'static> {
    state: Rc<RefCell<LoopState<E, S>>>,
}

impl<E: Engine + 'static, S: DrawingSurface + 'static> AnimationController<E, S> {
    pub fn new(
        engine: Rc<RefCell<E>>,
        surface: Rc<RefCell<S>>,
        scheduler: Rc<dyn Scheduler>,
        palette: Palette,
        params: LoopParams,
        active: bool,
    ) -> Self {
        let now = scheduler.now();
        let state = Rc::new(RefCell::new(LoopState {
            engine,
            surface,
            scheduler,
            palette,
            params,
            running: active,
            phase: LoopPhase::Stopped,
            pending: None,
            clock: FrameClock::new(now),
            generation: 0,
            cycles: 0,
            listener: None,
        }));
        if active {
            LoopState::arm(&state);
        }
        Self { state }
    }

    pub fn phase(&self) -> LoopPhase {
        self.state.borrow().phase
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Cycles completed since construction.
    pub fn cycles(&self) -> u64 {
        self.state.borrow().cycles
    }

    pub fn fps(&self) -> Option<FpsSummary> {
        self.state.borrow().clock.summary()
    }

    pub fn params(&self) -> LoopParams {
        self.state.borrow().params
    }

    /// Called after every cycle and whenever the displayed generation is reset.
    /// The listener must not call back into the controller.
    pub fn set_listener(&self, listener: FrameListener) {
        self.state.borrow_mut().listener = Some(listener);
    }

    pub fn set_running(&self, running: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.running == running {
                return;
            }
            state.running = running;
            if !running {
                state.stop();
                return;
            }
            let now = state.scheduler.now();
            state.clock.reset(now);
        }
        LoopState::arm(&self.state);
    }

    /// Stops the loop, swaps in new parameters and, if running, arms a fresh
    /// cycle.
    pub fn reconfigure(&self, params: LoopParams) {
        let running = {
            let mut state = self.state.borrow_mut();
            state.stop();
            state.params = params;
            let now = state.scheduler.now();
            state.clock.reset(now);
            state.running
        };
        if running {
            LoopState::arm(&self.state);
        }
    }

    /// Sets the displayed generation without touching the engine.
    pub fn reset_generation(&self, generation: u64) {
        let report = {
            let mut state = self.state.borrow_mut();
            state.generation = generation;
            FrameReport {
                generation,
                fps: state.clock.summary(),
            }
        };
        LoopState::notify(&self.state, &report);
    }

    /// Paints the engine's current buffer without advancing it.
    pub fn repaint(&self) {
        self.state.borrow().paint();
    }
}

impl<E: Engine + 'static, S: DrawingSurface + 'static> Drop for AnimationController<E, S> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.running = false;
            state.stop();
        }
    }
}

impl<E: Engine + 'static, S: DrawingSurface + 'static> LoopState<E, S> {
    fn stop(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.cancel();
        }
        self.phase = LoopPhase::Stopped;
    }

    fn arm(this: &Rc<RefCell<Self>>) {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
        let mut state = this.borrow_mut();
        if state.phase != LoopPhase::Stopped || !state.running {
            return;
        }
        let delay = state.params.frame_interval();
        let pending = state.scheduler.schedule_frame(
            delay,
            Box::new(move || {
                if let Some(this) = weak.upgrade() {
                    Self::run_cycle(&this);
                }
            }),
        );
        state.pending = Some(pending);
        state.phase = LoopPhase::Scheduled;
    }

    fn run_cycle(this: &Rc<RefCell<Self>>) {
        let report = {
            let mut state = this.borrow_mut();
            if state.phase != LoopPhase::Scheduled || !state.running {
                return;
            }
            state.pending = None;
            state.phase = LoopPhase::Running;

            let generation = state.engine.borrow_mut().tick();
            state.paint();

            let now = state.scheduler.now();
            state.clock.sample(now);
            state.generation = generation;
            state.cycles += 1;
            state.phase = LoopPhase::Stopped;
            log::trace!("cycle {} painted generation {generation}", state.cycles);

            FrameReport {
                generation,
                fps: state.clock.summary(),
            }
        };
        Self::notify(this, &report);
        Self::arm(this);
    }

    fn paint(&self) {
        let LoopParams {
            dimensions,
            shape,
            sizing,
            ..
        } = self.params;
        let engine = self.engine.borrow();
        let cells = engine.cells();
        let mut surface = self.surface.borrow_mut();
        surface.clear();
        paint_grid(&mut *surface, &self.palette, shape, dimensions, &sizing);
        paint_cells(
            &mut *surface,
            &self.palette,
            shape,
            dimensions,
            &sizing,
            &cells,
        );
    }

    fn notify(this: &Rc<RefCell<Self>>, report: &FrameReport) {
        let listener = this.borrow_mut().listener.take();
        if let Some(mut listener) = listener {
            listener(report);
            let mut state = this.borrow_mut();
            if state.listener.is_none() {
                state.listener = Some(listener);
            }
        }
    }
}
