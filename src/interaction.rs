//! User commands over the view: play/pause, frame rate, recreate, clear and
//! click-to-toggle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{AnimationController, FrameListener};
use crate::config::{RuleSpec, ViewConfig, validate_target_fps};
use crate::engine::{CellState, Engine};
use crate::error::ConfigurationError;
use crate::geometry::{CellCoord, CellSizing, GridDimensions, Point, Shape, surface_bounds, to_cell};
use crate::rendering::{DrawingSurface, Palette, SurfaceSize, paint_single_cell};
use crate::schedule::Scheduler;

/// On-screen placement of the surface, used to turn client coordinates into
/// surface pixels when the element is scaled by layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn to_surface(&self, surface: SurfaceSize, client_x: f64, client_y: f64) -> Point {
        let scale = |px: u32, extent: f64| {
            if extent > 0.0 { px as f64 / extent } else { 1.0 }
        };
        Point::new(
            (client_x - self.left) * scale(surface.w_px, self.width),
            (client_y - self.top) * scale(surface.h_px, self.height),
        )
    }
}

/// Result of a click: the cell it resolved to and that cell's new state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toggled {
    pub cell: CellCoord,
    pub state: CellState,
}

pub struct InteractionController<E: Engine + 'static, S: DrawingSurface + 'static> {
    config: ViewConfig,
    sizing: CellSizing,
    palette: Palette,
    engine: Rc<RefCell<E>>,
    surface: Rc<RefCell<S>>,
    animation: AnimationController<E, S>,
}

impl<E: Engine + 'static, S: DrawingSurface + 'static> InteractionController<E, S> {
    /// Reads the initial configuration from the engine, sizes the surface for
    /// it and starts the loop unless `running` is false.
    pub fn new(
        engine: Rc<RefCell<E>>,
        surface: Rc<RefCell<S>>,
        scheduler: Rc<dyn Scheduler>,
        sizing: CellSizing,
        target_fps: u32,
        running: bool,
    ) -> Result<Self, ConfigurationError> {
        let config = ViewConfig::from_engine(&*engine.borrow(), target_fps, running)?;
        let palette = Palette::default();
        resize_surface(&mut *surface.borrow_mut(), config.shape, config.dimensions, &sizing);

        let animation = AnimationController::new(
            Rc::clone(&engine),
            Rc::clone(&surface),
            scheduler,
            palette.clone(),
            config.loop_params(sizing),
            running,
        );
        animation.repaint();

        log::info!(
            "mounted {}x{} {:?} grid, B{}/S{}, {} fps, {}",
            config.dimensions.width(),
            config.dimensions.height(),
            config.shape,
            config.rules.born,
            config.rules.survive,
            config.target_fps,
            if running { "running" } else { "paused" }
        );

        Ok(Self {
            config,
            sizing,
            palette,
            engine,
            surface,
            animation,
        })
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn sizing(&self) -> CellSizing {
        self.sizing
    }

    pub fn animation(&self) -> &AnimationController<E, S> {
        &self.animation
    }

    pub fn set_frame_listener(&self, listener: FrameListener) {
        self.animation.set_listener(listener);
    }

    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), ConfigurationError> {
        let fps = validate_target_fps(fps)?;
        if fps == self.config.target_fps {
            return Ok(());
        }
        self.config.target_fps = fps;
        self.animation
            .reconfigure(self.config.loop_params(self.sizing));
        log::debug!("target fps set to {fps}");
        Ok(())
    }

    pub fn toggle_play(&mut self) -> bool {
        self.config.running = !self.config.running;
        self.animation.set_running(self.config.running);
        log::info!(
            "simulation {}",
            if self.config.running { "resumed" } else { "paused" }
        );
        self.config.running
    }

    pub fn recreate(
        &mut self,
        rules: RuleSpec,
        dimensions: (u32, u32),
        shape: Shape,
    ) -> Result<(), ConfigurationError> {
        let (width, height) = dimensions;
        GridDimensions::new(width, height)?;

        let restarted = {
            let mut engine = self.engine.borrow_mut();
            engine.restart(&rules.born, &rules.survive, width, height, shape);
            // the engine may clamp what it was asked for
            let restarted = GridDimensions::new(engine.width(), engine.height());
            if restarted.is_err() {
                let previous = &self.config;
                engine.restart(
                    &previous.rules.born,
                    &previous.rules.survive,
                    previous.dimensions.width(),
                    previous.dimensions.height(),
                    previous.shape,
                );
            }
            restarted
        };
        let dimensions = match restarted {
            Ok(dimensions) => dimensions,
            Err(e) => {
                log::warn!(
                    "engine could not hold a {width}x{height} grid, restored the previous one"
                );
                self.animation.reset_generation(0);
                self.animation.repaint();
                return Err(e);
            }
        };

        self.config.dimensions = dimensions;
        self.config.rules = rules;
        self.config.shape = shape;

        resize_surface(
            &mut *self.surface.borrow_mut(),
            shape,
            dimensions,
            &self.sizing,
        );
        self.animation
            .reconfigure(self.config.loop_params(self.sizing));
        self.animation.reset_generation(0);
        self.animation.repaint();

        log::info!(
            "recreated {}x{} {:?} grid with B{}/S{}",
            dimensions.width(),
            dimensions.height(),
            shape,
            self.config.rules.born,
            self.config.rules.survive
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.engine.borrow_mut().clear_universe();
        self.animation.repaint();
        log::info!("universe cleared");
    }

    /// Toggles the cell under a surface pixel and paints it straight away,
    /// without waiting for the next cycle.
    pub fn handle_click(&mut self, x: f64, y: f64) -> Toggled {
        let ViewConfig {
            dimensions, shape, ..
        } = self.config;
        let cell = to_cell(shape, Point::new(x, y), dimensions, &self.sizing);
        let state = self.engine.borrow_mut().cell_toggle(cell.col, cell.row);
        paint_single_cell(
            &mut *self.surface.borrow_mut(),
            &self.palette,
            shape,
            cell,
            &self.sizing,
            state,
        );
        log::debug!("({x:.1}, {y:.1}) toggled {cell:?} to {state:?}");
        Toggled { cell, state }
    }

    /// Like [`handle_click`](Self::handle_click), for coordinates relative to
    /// the viewport.
    pub fn handle_client_click(
        &mut self,
        rect: ClientRect,
        client_x: f64,
        client_y: f64,
    ) -> Toggled {
        let size = self.surface.borrow().query_size();
        let p = rect.to_surface(size, client_x, client_y);
        self.handle_click(p.x, p.y)
    }
}

fn resize_surface(
    surface: &mut impl DrawingSurface,
    shape: Shape,
    dims: GridDimensions,
    sizing: &CellSizing,
) {
    let size = SurfaceSize::covering(surface_bounds(shape, dims, sizing));
    surface.resize(size);
}
