//! The simulation engine the view renders. It owns the authoritative cell
//! buffer and the rules; the view only advances, reads, toggles, clears and
//! restarts it.

use std::borrow::Cow;

use crate::error::UnsupportedShapeError;
use crate::geometry::{CellCoord, Shape};

#[cfg(target_arch = "wasm32")]
pub mod js;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Dead,
    Alive,
}

impl CellState {
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            CellState::Dead
        } else {
            CellState::Alive
        }
    }

    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }
}

/// Read-only view of the engine's row-major cell buffer. The borrow ties the
/// view to the engine, so it cannot outlive the next mutating call.
#[derive(Clone, Debug)]
pub struct CellBuffer<'a> {
    width: u32,
    bytes: Cow<'a, [u8]>,
}

impl<'a> CellBuffer<'a> {
    pub fn borrowed(width: u32, bytes: &'a [u8]) -> Self {
        Self {
            width,
            bytes: Cow::Borrowed(bytes),
        }
    }

    pub fn owned(width: u32, bytes: Vec<u8>) -> CellBuffer<'static> {
        CellBuffer {
            width,
            bytes: Cow::Owned(bytes),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Cells past the end of the buffer read as dead.
    pub fn get(&self, cell: CellCoord) -> CellState {
        if cell.col >= self.width {
            return CellState::Dead;
        }
        self.bytes
            .get(cell.index(self.width))
            .copied()
            .map_or(CellState::Dead, CellState::from_byte)
    }

    pub fn into_owned(self) -> CellBuffer<'static> {
        CellBuffer {
            width: self.width,
            bytes: Cow::Owned(self.bytes.into_owned()),
        }
    }
}

pub trait Engine {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn born_rules(&self) -> String;
    fn survive_rules(&self) -> String;
    fn cell_form_factor(&self) -> Result<Shape, UnsupportedShapeError>;
    /// Advances one generation and returns the new generation counter.
    fn tick(&mut self) -> u64;
    fn cells(&self) -> CellBuffer<'_>;
    fn cell_toggle(&mut self, col: u32, row: u32) -> CellState;
    fn restart(&mut self, born: &str, survive: &str, width: u32, height: u32, shape: Shape);
    fn clear_universe(&mut self);
}
