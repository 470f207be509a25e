use crate::engine::{CellBuffer, CellState, Engine};
use crate::error::UnsupportedShapeError;
use crate::geometry::{CellCoord, GridDimensions, Shape};

/// In-memory engine that records every call. Ticking only bumps the
/// generation counter; the buffer changes through toggle, clear and restart.
pub(crate) struct FakeEngine {
    pub width: u32,
    pub height: u32,
    pub shape_code: u8,
    pub born: String,
    pub survive: String,
    pub cells: Vec<u8>,
    pub generation: u64,
    pub ticks: usize,
    pub toggles: Vec<(u32, u32)>,
    pub clears: usize,
    pub restarts: usize,
    /// Largest side `restart` accepts; larger requests are clamped.
    pub max_side: u32,
    /// Makes the next `restart` leave a 0x0 grid.
    pub collapse_next_restart: bool,
}

impl FakeEngine {
    pub fn new(width: u32, height: u32, shape: Shape) -> Self {
        Self {
            width,
            height,
            shape_code: shape.code(),
            born: "2".into(),
            survive: "34".into(),
            cells: vec![0; (width * height) as usize],
            generation: 0,
            ticks: 0,
            toggles: Vec::new(),
            clears: 0,
            restarts: 0,
            max_side: u32::MAX,
            collapse_next_restart: false,
        }
    }

    pub fn set_alive(&mut self, cell: CellCoord) {
        let idx = cell.index(self.width);
        self.cells[idx] = 1;
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        let dims = GridDimensions::default();
        Self::new(dims.width(), dims.height(), Shape::default())
    }
}

impl Engine for FakeEngine {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn born_rules(&self) -> String {
        self.born.clone()
    }

    fn survive_rules(&self) -> String {
        self.survive.clone()
    }

    fn cell_form_factor(&self) -> Result<Shape, UnsupportedShapeError> {
        Shape::try_from(self.shape_code)
    }

    fn tick(&mut self) -> u64 {
        self.ticks += 1;
        self.generation += 1;
        self.generation
    }

    fn cells(&self) -> CellBuffer<'_> {
        CellBuffer::borrowed(self.width, &self.cells)
    }

    fn cell_toggle(&mut self, col: u32, row: u32) -> CellState {
        self.toggles.push((col, row));
        let idx = CellCoord::new(row, col).index(self.width);
        self.cells[idx] = if self.cells[idx] == 0 { 1 } else { 0 };
        CellState::from_byte(self.cells[idx])
    }

    fn restart(&mut self, born: &str, survive: &str, width: u32, height: u32, shape: Shape) {
        self.restarts += 1;
        self.born = born.to_owned();
        self.survive = survive.to_owned();
        if std::mem::take(&mut self.collapse_next_restart) {
            self.width = 0;
            self.height = 0;
        } else {
            self.width = width.min(self.max_side);
            self.height = height.min(self.max_side);
        }
        self.shape_code = shape.code();
        self.cells = vec![0; (self.width * self.height) as usize];
        self.generation = 0;
    }

    fn clear_universe(&mut self) {
        self.clears += 1;
        self.cells.iter_mut().for_each(|c| *c = 0);
    }
}
