//! The exported view handle and its DOM wiring.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::{Context, anyhow};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlInputElement, HtmlSelectElement, MouseEvent};

use crate::config::{DEFAULT_TARGET_FPS, RuleSpec};
use crate::engine::CellState;
use crate::engine::js::JsEngine;
use crate::error::ConfigurationError;
use crate::geometry::{CellSizing, Shape};
use crate::interaction::{ClientRect, InteractionController};
use crate::rendering::canvas::CanvasSurface;
use crate::schedule::browser::BrowserScheduler;

type Controller = InteractionController<JsEngine, CanvasSurface>;

const CELLS_STATUS_ID: &str = "cells-renderer";
const FPS_STATUS_ID: &str = "fps-renderer";

fn js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

fn config_error(e: ConfigurationError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn document() -> Result<Document, anyhow::Error> {
    web_sys::window()
        .context("no window")?
        .document()
        .context("no document")
}

fn find<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    let element = document.get_element_by_id(id)?;
    match element.dyn_into::<T>() {
        Ok(el) => Some(el),
        Err(_) => {
            log::warn!("element `{id}` has an unexpected type, ignoring it");
            None
        }
    }
}

/// An event listener that is removed from its target when dropped.
struct DomListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl DomListener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, anyhow::Error> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("failed to listen for `{event}`: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove `{}` listener: {e:?}", self.event);
        }
    }
}

/// Runs `f` against the controller if it is still mounted and not busy.
fn with_controller(weak: &Weak<RefCell<Controller>>, f: impl FnOnce(&mut Controller)) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => log::warn!("view is busy, dropping event"),
    }
}

/// A life view mounted on a canvas.
#[wasm_bindgen]
pub struct LifeView {
    controller: Rc<RefCell<Controller>>,
    canvas: web_sys::HtmlCanvasElement,
    listeners: Vec<DomListener>,
}

#[wasm_bindgen]
impl LifeView {
    /// Mounts a view on the canvas with id `canvas_id`, drawing the given
    /// `Universe` whose cells live in `memory`.
    #[wasm_bindgen]
    pub fn mount(
        canvas_id: &str,
        universe: JsValue,
        memory: JsValue,
        target_fps: Option<u32>,
        running: Option<bool>,
    ) -> Result<LifeView, JsValue> {
        let engine = JsEngine::new(universe, memory).map_err(js_error)?;
        let surface = CanvasSurface::from_element_id(canvas_id).map_err(js_error)?;
        let canvas = surface.canvas().clone();
        let scheduler = BrowserScheduler::new().map_err(js_error)?;

        let controller = InteractionController::new(
            Rc::new(RefCell::new(engine)),
            Rc::new(RefCell::new(surface)),
            Rc::new(scheduler),
            CellSizing::default(),
            target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            running.unwrap_or(true),
        )
        .map_err(config_error)?;

        let document = document().map_err(js_error)?;
        let cells_status: Option<Element> = find(&document, CELLS_STATUS_ID);
        let fps_status: Option<Element> = find(&document, FPS_STATUS_ID);
        controller.set_frame_listener(Box::new(move |report| {
            if let Some(el) = &cells_status {
                el.set_text_content(Some(&report.generation_label()));
            }
            if let Some(el) = &fps_status {
                el.set_text_content(Some(&report.fps_label()));
            }
        }));

        Ok(LifeView {
            controller: Rc::new(RefCell::new(controller)),
            canvas,
            listeners: Vec::new(),
        })
    }

    /// Hooks up the control panel and canvas clicks. Controls missing from
    /// the page are skipped.
    #[wasm_bindgen]
    pub fn bind_controls(&mut self) -> Result<(), JsValue> {
        self.listeners.clear();
        let listeners = self.attach_listeners().map_err(js_error)?;
        log::debug!("bound {} control listeners", listeners.len());
        self.listeners = listeners;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn toggle_play(&self) -> bool {
        self.controller.borrow_mut().toggle_play()
    }

    #[wasm_bindgen]
    pub fn set_target_fps(&self, fps: u32) -> Result<(), JsValue> {
        self.controller
            .borrow_mut()
            .set_target_fps(fps)
            .map_err(config_error)
    }

    #[wasm_bindgen]
    pub fn recreate(
        &self,
        born: &str,
        survive: &str,
        width: u32,
        height: u32,
        cell_form_factor: u8,
    ) -> Result<(), JsValue> {
        let shape = Shape::try_from(cell_form_factor)
            .map_err(|e| config_error(ConfigurationError::from(e)))?;
        self.controller
            .borrow_mut()
            .recreate(RuleSpec::new(born, survive), (width, height), shape)
            .map_err(config_error)
    }

    #[wasm_bindgen]
    pub fn clear(&self) {
        self.controller.borrow_mut().clear();
    }

    /// Toggles the cell under a viewport position. Returns whether it is now
    /// alive.
    #[wasm_bindgen]
    pub fn click(&self, client_x: f64, client_y: f64) -> bool {
        let rect = client_rect(&self.canvas);
        let toggled = self
            .controller
            .borrow_mut()
            .handle_client_click(rect, client_x, client_y);
        toggled.state == CellState::Alive
    }

    #[wasm_bindgen]
    pub fn generation(&self) -> f64 {
        self.controller.borrow().animation().generation() as f64
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.controller.borrow().config().running
    }

    /// Stops the loop and removes every listener this view added.
    #[wasm_bindgen]
    pub fn unmount(self) {
        log::info!("unmounting view");
        drop(self);
    }
}

impl LifeView {
    fn attach_listeners(&self) -> Result<Vec<DomListener>, anyhow::Error> {
        let document = document()?;
        let weak = Rc::downgrade(&self.controller);
        let mut listeners = Vec::new();

        if let Some(input) = find::<HtmlInputElement>(&document, "fps") {
            let weak = weak.clone();
            let source = input.clone();
            listeners.push(DomListener::attach(&input, "blur", move |_| {
                let value = source.value_as_number();
                with_controller(&weak, |c| {
                    // NaN and negatives saturate to 0 and are rejected
                    if let Err(e) = c.set_target_fps(value as u32) {
                        log::warn!("{e}");
                    }
                });
            })?);
        }

        if let Some(button) = find::<Element>(&document, "play-stop-button") {
            let weak = weak.clone();
            let source = button.clone();
            listeners.push(DomListener::attach(&button, "click", move |_| {
                with_controller(&weak, |c| {
                    let running = c.toggle_play();
                    source.set_text_content(Some(if running { "Stop" } else { "Play" }));
                });
            })?);
        }

        if let Some(button) = find::<Element>(&document, "recreate-button") {
            let form = RecreateForm::find(&document);
            let weak = weak.clone();
            listeners.push(DomListener::attach(&button, "click", move |_| {
                let Some(form) = &form else {
                    log::warn!("recreate form is incomplete");
                    return;
                };
                with_controller(&weak, |c| {
                    if let Err(e) = form.submit(c) {
                        log::warn!("{e}");
                    }
                });
            })?);
        }

        if let Some(button) = find::<Element>(&document, "clear-button") {
            let weak = weak.clone();
            listeners.push(DomListener::attach(&button, "click", move |_| {
                with_controller(&weak, |c| c.clear());
            })?);
        }

        let canvas = self.canvas.clone();
        listeners.push(DomListener::attach(&self.canvas, "click", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = client_rect(&canvas);
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            with_controller(&weak, |c| {
                c.handle_client_click(rect, x, y);
            });
        })?);

        Ok(listeners)
    }
}

fn client_rect(canvas: &web_sys::HtmlCanvasElement) -> ClientRect {
    let rect = canvas.get_bounding_client_rect();
    ClientRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// The rule, size and shape inputs read when the recreate button is pressed.
struct RecreateForm {
    born: HtmlInputElement,
    survive: HtmlInputElement,
    width: HtmlInputElement,
    height: HtmlInputElement,
    shape: HtmlSelectElement,
}

impl RecreateForm {
    fn find(document: &Document) -> Option<Self> {
        Some(Self {
            born: find(document, "born")?,
            survive: find(document, "survives")?,
            width: find(document, "width")?,
            height: find(document, "height")?,
            shape: find(document, "cell-form-factor-select")?,
        })
    }

    fn submit(&self, controller: &mut Controller) -> Result<(), ConfigurationError> {
        let code = self.shape.value().parse::<u8>().unwrap_or(0);
        let shape = Shape::try_from(code)?;
        controller.recreate(
            RuleSpec::new(self.born.value(), self.survive.value()),
            (
                self.width.value_as_number() as u32,
                self.height.value_as_number() as u32,
            ),
            shape,
        )
    }
}
