use super::{DrawingSurface, Palette};
use crate::engine::{CellBuffer, CellState};
use crate::geometry::{CellCoord, CellSizing, GridDimensions, Polygon, Shape, Tessellation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub dead: usize,
    pub alive: usize,
}

fn trace(surface: &mut impl DrawingSurface, polygon: &Polygon) {
    let Some((first, rest)) = polygon.vertices().split_first() else {
        return;
    };
    surface.move_to(first.x, first.y);
    for v in rest {
        surface.line_to(v.x, v.y);
    }
    surface.close_path();
}

/// Outlines every cell in one path and strokes it once.
pub fn paint_grid(
    surface: &mut impl DrawingSurface,
    palette: &Palette,
    shape: Shape,
    dims: GridDimensions,
    sizing: &CellSizing,
) {
    let Tessellation { forward, .. } = shape.tessellation();
    surface.set_stroke_style(&palette.grid);
    surface.begin_path();
    for cell in dims.cells() {
        trace(surface, &forward(cell, sizing));
    }
    surface.stroke();
}

/// Fills dead cells, then alive cells, switching fill style exactly twice
/// whatever the buffer holds.
pub fn paint_cells(
    surface: &mut impl DrawingSurface,
    palette: &Palette,
    shape: Shape,
    dims: GridDimensions,
    sizing: &CellSizing,
    cells: &CellBuffer<'_>,
) -> PaintStats {
    let Tessellation { forward, .. } = shape.tessellation();
    let mut stats = PaintStats::default();

    for (state, style) in [
        (CellState::Dead, &palette.dead),
        (CellState::Alive, &palette.alive),
    ] {
        surface.set_fill_style(style);
        surface.begin_path();
        for cell in dims.cells().filter(|&c| cells.get(c) == state) {
            trace(surface, &forward(cell, sizing));
            match state {
                CellState::Dead => stats.dead += 1,
                CellState::Alive => stats.alive += 1,
            }
        }
        surface.fill();
    }

    stats
}

pub fn paint_single_cell(
    surface: &mut impl DrawingSurface,
    palette: &Palette,
    shape: Shape,
    cell: CellCoord,
    sizing: &CellSizing,
    state: CellState,
) {
    let style = match state {
        CellState::Alive => &palette.alive,
        CellState::Dead => &palette.dead,
    };
    surface.set_fill_style(style);
    surface.begin_path();
    trace(surface, &(shape.tessellation().forward)(cell, sizing));
    surface.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::to_polygon;
    use crate::rendering::recording::{Op, RecordingSurface};

    fn dims(w: u32, h: u32) -> GridDimensions {
        GridDimensions::new(w, h).unwrap()
    }

    #[test]
    fn grid_is_one_path_one_stroke() {
        let mut surface = RecordingSurface::default();
        let palette = Palette::default();
        paint_grid(
            &mut surface,
            &palette,
            Shape::Hexagon,
            dims(4, 3),
            &CellSizing::default(),
        );
        assert_eq!(surface.count(|op| matches!(op, Op::BeginPath)), 1);
        assert_eq!(surface.count(|op| matches!(op, Op::Stroke)), 1);
        assert_eq!(surface.count(|op| matches!(op, Op::MoveTo(..))), 12);
        assert_eq!(surface.stroke_styles(), vec!["#cccccc"]);
        assert_eq!(surface.count(|op| matches!(op, Op::Fill)), 0);
    }

    #[test]
    fn all_dead_buffer_still_paints_two_passes() {
        let mut surface = RecordingSurface::default();
        let grid = dims(5, 5);
        let bytes = vec![0; grid.cell_count()];
        let stats = paint_cells(
            &mut surface,
            &Palette::default(),
            Shape::Square,
            grid,
            &CellSizing::default(),
            &CellBuffer::borrowed(5, &bytes),
        );
        assert_eq!(stats, PaintStats { dead: 25, alive: 0 });
        assert_eq!(surface.fill_styles(), vec!["#ffffff", "#000000"]);
        assert_eq!(surface.count(|op| matches!(op, Op::Fill)), 2);
    }

    #[test]
    fn mixed_buffer_paints_dead_before_alive() {
        let mut surface = RecordingSurface::default();
        let grid = dims(3, 2);
        let bytes = vec![1, 0, 1, 0, 1, 0];
        let sizing = CellSizing::default();
        let stats = paint_cells(
            &mut surface,
            &Palette::default(),
            Shape::Triangle,
            grid,
            &sizing,
            &CellBuffer::borrowed(3, &bytes),
        );
        assert_eq!(stats, PaintStats { dead: 3, alive: 3 });
        assert_eq!(surface.fill_styles(), vec!["#ffffff", "#000000"]);

        let passes = surface.filled_polygons();
        assert_eq!(passes.len(), 2);
        let alive_first = to_polygon(Shape::Triangle, CellCoord::new(0, 0), &sizing);
        assert_eq!(passes[1][0], alive_first.vertices().to_vec());
        assert_eq!(passes[0].len(), 3);
    }

    #[test]
    fn single_cell_paints_one_polygon() {
        let mut surface = RecordingSurface::default();
        let sizing = CellSizing::default();
        let cell = CellCoord::new(1, 1);
        paint_single_cell(
            &mut surface,
            &Palette::default(),
            Shape::Hexagon,
            cell,
            &sizing,
            CellState::Alive,
        );
        assert_eq!(surface.fill_styles(), vec!["#000000"]);
        assert_eq!(
            surface.filled_polygons(),
            vec![vec![
                to_polygon(Shape::Hexagon, cell, &sizing).vertices().to_vec()
            ]]
        );
    }
}
