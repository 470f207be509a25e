use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use super::{ScheduledTask, Scheduler, Task};

/// `setTimeout` followed by `requestAnimationFrame`.
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new() -> Result<Self, anyhow::Error> {
        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        Ok(Self { window })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Timer,
    Frame(i32),
    Done,
    Cancelled,
}

struct FrameRequest {
    stage: Cell<Stage>,
    timeout: RefCell<Option<Timeout>>,
    // Owned here so a cancelled frame's callback is freed with the request.
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

pub struct ScheduledFrame {
    request: Rc<FrameRequest>,
    window: Window,
}

impl Scheduler for BrowserScheduler {
    fn schedule_frame(&self, delay: Duration, task: Task) -> Box<dyn ScheduledTask> {
        let request = Rc::new(FrameRequest {
            stage: Cell::new(Stage::Timer),
            timeout: RefCell::new(None),
            frame: RefCell::new(None),
        });

        let weak = Rc::downgrade(&request);
        let window = self.window.clone();
        let millis = delay.as_millis().min(u32::MAX as u128) as u32;
        let timeout = Timeout::new(millis, move || {
            let Some(request) = weak.upgrade() else {
                return;
            };
            if request.stage.get() != Stage::Timer {
                return;
            }
            let weak = Rc::downgrade(&request);
            let on_frame: Closure<dyn FnMut(f64)> = Closure::once(move |_timestamp: f64| {
                let Some(request) = weak.upgrade() else {
                    return;
                };
                if !matches!(request.stage.get(), Stage::Frame(_)) {
                    return;
                }
                request.stage.set(Stage::Done);
                drop(request);
                task();
            });
            match window.request_animation_frame(on_frame.as_ref().unchecked_ref()) {
                Ok(id) => {
                    request.stage.set(Stage::Frame(id));
                    *request.frame.borrow_mut() = Some(on_frame);
                }
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {e:?}");
                    request.stage.set(Stage::Cancelled);
                }
            }
        });
        *request.timeout.borrow_mut() = Some(timeout);

        Box::new(ScheduledFrame {
            request,
            window: self.window.clone(),
        })
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

impl ScheduledTask for ScheduledFrame {
    fn cancel(&mut self) {
        match self.request.stage.replace(Stage::Cancelled) {
            Stage::Timer => {
                if let Some(timeout) = self.request.timeout.borrow_mut().take() {
                    timeout.cancel();
                }
            }
            Stage::Frame(id) => {
                if let Err(e) = self.window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame({id}) failed: {e:?}");
                }
                self.request.frame.borrow_mut().take();
            }
            Stage::Done => self.request.stage.set(Stage::Done),
            Stage::Cancelled => {}
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self.request.stage.get(), Stage::Timer | Stage::Frame(_))
    }
}

impl Drop for ScheduledFrame {
    fn drop(&mut self) {
        self.cancel();
    }
}
