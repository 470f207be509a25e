//! Rendering and interaction for a life-like cellular automaton drawn on
//! square, hexagonal or triangular tilings.
//!
//! The automaton itself lives behind [`engine::Engine`]; this crate maps cells
//! to polygons and back, paints them, drives the render loop and turns user
//! commands into engine calls.

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod fps;
pub mod geometry;
pub mod interaction;
pub mod rendering;
pub mod schedule;
pub mod util;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use animation::{AnimationController, FrameReport, LoopPhase};
pub use config::{RuleSpec, ViewConfig};
pub use engine::{CellBuffer, CellState, Engine};
pub use error::{ConfigurationError, UnsupportedShapeError};
pub use geometry::{CellCoord, CellSizing, GridDimensions, Point, Shape};
pub use interaction::InteractionController;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::Output::call(console_log::log))
        .apply();
}
