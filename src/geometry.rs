//! Forward and inverse mapping between grid cells and canvas pixels.
//!
//! Every tessellation is described by a [`Tessellation`] entry: a forward
//! transform from a cell to its polygon, an inverse transform from a pixel to
//! the nearest valid cell, and the bounding box a surface needs to hold the
//! whole grid. The entries are plain function pointers in a static table, so
//! dispatch happens once per paint or click.

use crate::error::{ConfigurationError, UnsupportedShapeError};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// The polygon family tiling the grid. Discriminants are the side counts the
/// engine uses on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Shape {
    Triangle = 3,
    Square = 4,
    Hexagon = 6,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Square, Shape::Hexagon, Shape::Triangle];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn tessellation(self) -> &'static Tessellation {
        match self {
            Shape::Square => &SQUARE,
            Shape::Hexagon => &HEXAGON,
            Shape::Triangle => &TRIANGLE,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        crate::config::DEFAULT_SHAPE
    }
}

impl TryFrom<u8> for Shape {
    type Error = UnsupportedShapeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            3 => Ok(Shape::Triangle),
            4 => Ok(Shape::Square),
            6 => Ok(Shape::Hexagon),
            other => Err(UnsupportedShapeError(other)),
        }
    }
}

/// Grid size in cells. Both sides are at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGrid { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Row-major iteration over every cell.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        let Self { width, height } = self;
        (0..height).flat_map(move |row| (0..width).map(move |col| CellCoord { row, col }))
    }
}

/// Drawn size of a cell and the pitch it is tiled on. The difference between
/// the two is the gap left for the grid outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSizing {
    cell_size: f64,
    full_cell_size: f64,
}

impl CellSizing {
    pub fn new(cell_size: f64, full_cell_size: f64) -> Result<Self, ConfigurationError> {
        let valid = cell_size.is_finite()
            && full_cell_size.is_finite()
            && cell_size > 0.0
            && full_cell_size >= cell_size;
        if !valid {
            return Err(ConfigurationError::InvalidCellSizing {
                cell_size,
                full_cell_size,
            });
        }
        Ok(Self {
            cell_size,
            full_cell_size,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn full_cell_size(&self) -> f64 {
        self.full_cell_size
    }

    /// Horizontal half-pitch of the hexagon and triangle tilings.
    fn k_full(&self) -> f64 {
        SQRT_3 * self.full_cell_size / 4.0
    }

    fn k_cell(&self) -> f64 {
        SQRT_3 * self.cell_size / 4.0
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            width: crate::config::DEFAULT_WIDTH,
            height: crate::config::DEFAULT_HEIGHT,
        }
    }
}

impl Default for CellSizing {
    fn default() -> Self {
        Self {
            cell_size: crate::config::CELL_SIZE,
            full_cell_size: crate::config::FULL_CELL_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Offset into a row-major buffer of the given width.
    pub fn index(&self, width: u32) -> usize {
        self.row as usize * width as usize + self.col as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Up to six vertices, stored inline so painting a frame does not allocate
/// per cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
    vertices: [Point; 6],
    len: usize,
}

impl Polygon {
    fn from_slice(points: &[Point]) -> Self {
        let mut vertices = [Point::default(); 6];
        vertices[..points.len()].copy_from_slice(points);
        Self {
            vertices,
            len: points.len(),
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices[..self.len]
    }

    pub fn centroid(&self) -> Point {
        let n = self.len as f64;
        let (sx, sy) = self
            .vertices()
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

pub struct Tessellation {
    pub forward: fn(CellCoord, &CellSizing) -> Polygon,
    pub inverse: fn(Point, GridDimensions, &CellSizing) -> CellCoord,
    pub bounds: fn(GridDimensions, &CellSizing) -> (f64, f64),
}

static SQUARE: Tessellation = Tessellation {
    forward: square_polygon,
    inverse: square_cell,
    bounds: square_bounds,
};

static HEXAGON: Tessellation = Tessellation {
    forward: hexagon_polygon,
    inverse: hexagon_cell,
    bounds: hexagon_bounds,
};

static TRIANGLE: Tessellation = Tessellation {
    forward: triangle_polygon,
    inverse: triangle_cell,
    bounds: triangle_bounds,
};

pub fn to_polygon(shape: Shape, cell: CellCoord, sizing: &CellSizing) -> Polygon {
    (shape.tessellation().forward)(cell, sizing)
}

/// Maps a surface pixel to a cell. Points outside the grid resolve to the
/// nearest valid cell.
pub fn to_cell(shape: Shape, point: Point, dims: GridDimensions, sizing: &CellSizing) -> CellCoord {
    (shape.tessellation().inverse)(point, dims, sizing)
}

/// Smallest surface, in fractional pixels, that holds every cell polygon.
pub fn surface_bounds(shape: Shape, dims: GridDimensions, sizing: &CellSizing) -> (f64, f64) {
    (shape.tessellation().bounds)(dims, sizing)
}

/// Round half up, the tie-breaking the click mapping has always used.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn clamp_index(v: f64, len: u32) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, (len - 1) as f64) as u32
}

fn is_even(v: u32) -> bool {
    v % 2 == 0
}

/// Triangles point up when row and column parities differ.
fn triangle_points_up(row: i64, col: i64) -> bool {
    row.rem_euclid(2) != col.rem_euclid(2)
}

fn square_polygon(cell: CellCoord, sizing: &CellSizing) -> Polygon {
    let (c, f) = (sizing.cell_size, sizing.full_cell_size);
    let x = cell.col as f64 * f + (f - c);
    let y = cell.row as f64 * f + (f - c);
    Polygon::from_slice(&[
        Point::new(x, y),
        Point::new(x + c, y),
        Point::new(x + c, y + c),
        Point::new(x, y + c),
    ])
}

fn square_cell(p: Point, dims: GridDimensions, sizing: &CellSizing) -> CellCoord {
    let f = sizing.full_cell_size;
    let row = round_half_up((2.0 * p.y - f) / (2.0 * f));
    let col = round_half_up((2.0 * p.x - f) / (2.0 * f));
    CellCoord {
        row: clamp_index(row, dims.height),
        col: clamp_index(col, dims.width),
    }
}

fn square_bounds(dims: GridDimensions, sizing: &CellSizing) -> (f64, f64) {
    let f = sizing.full_cell_size;
    (f * dims.width as f64 + 1.0, f * dims.height as f64 + 1.0)
}

fn hexagon_center(cell: CellCoord, sizing: &CellSizing) -> Point {
    let k = sizing.k_full();
    let offset = if is_even(cell.row) { k } else { 0.0 };
    Point::new(
        offset + k * (1.0 + 2.0 * cell.col as f64),
        (2.0 + 3.0 * cell.row as f64) * sizing.full_cell_size / 4.0,
    )
}

fn hexagon_polygon(cell: CellCoord, sizing: &CellSizing) -> Polygon {
    let Point { x, y } = hexagon_center(cell, sizing);
    let c = sizing.cell_size;
    let kc = sizing.k_cell();
    Polygon::from_slice(&[
        Point::new(x, y + c / 2.0),
        Point::new(x + kc, y + c / 4.0),
        Point::new(x + kc, y - c / 4.0),
        Point::new(x, y - c / 2.0),
        Point::new(x - kc, y - c / 4.0),
        Point::new(x - kc, y + c / 4.0),
    ])
}

fn hexagon_cell(p: Point, dims: GridDimensions, sizing: &CellSizing) -> CellCoord {
    let f = sizing.full_cell_size;
    let row = clamp_index(
        round_half_up(2.0 * (2.0 * p.y - f) / (3.0 * f)),
        dims.height,
    );
    let shift = if is_even(row) { 1.0 } else { 0.5 };
    let col = round_half_up(p.x / (2.0 * sizing.k_full()) - shift);
    CellCoord {
        row,
        col: clamp_index(col, dims.width),
    }
}

fn hexagon_bounds(dims: GridDimensions, sizing: &CellSizing) -> (f64, f64) {
    let k = sizing.k_full();
    let offset = if is_even(dims.height) { k } else { 0.0 };
    (
        offset + k * (1.0 + 2.0 * dims.width as f64),
        (2.0 + 3.0 * dims.height as f64) * sizing.full_cell_size / 4.0,
    )
}

fn triangle_polygon(cell: CellCoord, sizing: &CellSizing) -> Polygon {
    let f = sizing.full_cell_size;
    let c = sizing.cell_size;
    let kc = sizing.k_cell();
    let up = triangle_points_up(cell.row as i64, cell.col as i64);

    let x = sizing.k_full() * (1.0 + cell.col as f64);
    let y = if up { f / 4.0 } else { f / 2.0 } + 3.0 * f * cell.row as f64 / 4.0;

    if up {
        Polygon::from_slice(&[
            Point::new(x, y + c / 2.0),
            Point::new(x + kc, y - c / 4.0),
            Point::new(x - kc, y - c / 4.0),
        ])
    } else {
        Polygon::from_slice(&[
            Point::new(x - kc, y + c / 4.0),
            Point::new(x + kc, y + c / 4.0),
            Point::new(x, y - c / 2.0),
        ])
    }
}

// Every row is a band of height 3F/4. Within a band the point sits between two
// column centres; the one pointing up is widest at the top of the band, the
// one pointing down at the bottom, so the depth into the band picks the cell.
fn triangle_cell(p: Point, dims: GridDimensions, sizing: &CellSizing) -> CellCoord {
    let band = p.y / (3.0 * sizing.full_cell_size / 4.0);
    let row = band.floor();
    let depth = band - row;

    let u = p.x / sizing.k_full() - 1.0;
    let left = u.floor();
    let offset = u - left;

    let left_up = triangle_points_up(row as i64, left as i64);
    let in_left = if left_up {
        offset <= 1.0 - depth
    } else {
        offset <= depth
    };
    let col = if in_left { left } else { left + 1.0 };

    CellCoord {
        row: clamp_index(row, dims.height),
        col: clamp_index(col, dims.width),
    }
}

fn triangle_bounds(dims: GridDimensions, sizing: &CellSizing) -> (f64, f64) {
    let f = sizing.full_cell_size;
    let up = triangle_points_up(dims.height as i64, dims.width as i64);
    (
        sizing.k_full() * (1.0 + dims.width as f64),
        if up { f / 4.0 } else { f / 2.0 } + 3.0 * f * dims.height as f64 / 4.0,
    )
}
