use super::{DrawingSurface, SurfaceSize};
use crate::geometry::Point;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Resize(SurfaceSize),
    Clear,
    FillStyle(String),
    StrokeStyle(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Fill,
    Stroke,
}

/// Surface that keeps a log of every drawing call.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub size: SurfaceSize,
    pub ops: Vec<Op>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            size: SurfaceSize { w_px: 300, h_px: 150 },
            ops: Vec::new(),
        }
    }
}

impl RecordingSurface {
    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn fill_styles(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::FillStyle(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn stroke_styles(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::StrokeStyle(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Polygons traced into each filled path, one entry per `fill`.
    pub fn filled_polygons(&self) -> Vec<Vec<Vec<Point>>> {
        let mut passes = Vec::new();
        let mut path: Vec<Vec<Point>> = Vec::new();
        for op in &self.ops {
            match *op {
                Op::BeginPath => path.clear(),
                Op::MoveTo(x, y) => path.push(vec![Point::new(x, y)]),
                Op::LineTo(x, y) => {
                    if let Some(poly) = path.last_mut() {
                        poly.push(Point::new(x, y));
                    }
                }
                Op::Fill => passes.push(std::mem::take(&mut path)),
                _ => {}
            }
        }
        passes
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn query_size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.ops.push(Op::Resize(size));
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(Op::FillStyle(style.to_owned()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ops.push(Op::StrokeStyle(style.to_owned()));
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
}
