use crate::util::Color;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
mod painter;
#[cfg(test)]
pub(crate) mod recording;

pub use painter::{PaintStats, paint_cells, paint_grid, paint_single_cell};

const GRID_COLOR: Color = Color::from_u32(0xCCCCCC);
const DEAD_COLOR: Color = Color::from_u32(0xFFFFFF);
const ALIVE_COLOR: Color = Color::from_u32(0x000000);

/// Style strings for the three semantic colors, formatted once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub grid: String,
    pub dead: String,
    pub alive: String,
}

impl Palette {
    pub fn new(grid: Color, dead: Color, alive: Color) -> Self {
        Self {
            grid: grid.to_style(),
            dead: dead.to_style(),
            alive: alive.to_style(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(GRID_COLOR, DEAD_COLOR, ALIVE_COLOR)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub w_px: u32,
    pub h_px: u32,
}

impl SurfaceSize {
    /// Whole-pixel surface for fractional bounds, rounding up so nothing is cut
    /// off.
    pub fn covering((w, h): (f64, f64)) -> Self {
        Self {
            w_px: w.max(0.0).ceil() as u32,
            h_px: h.max(0.0).ceil() as u32,
        }
    }
}

/// A 2D path-drawing target, shaped after the canvas 2d context.
pub trait DrawingSurface {
    fn query_size(&self) -> SurfaceSize;
    fn resize(&mut self, size: SurfaceSize);
    fn clear(&mut self);
    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
}
