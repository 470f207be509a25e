use anyhow::{Context, anyhow};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawingSurface, SurfaceSize};

/// A `<canvas>` element and its 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_element_id(id: &str) -> Result<Self, anyhow::Error> {
        let canvas: HtmlCanvasElement = web_sys::window()
            .context("no window")?
            .document()
            .context("no document")?
            .get_element_by_id(id)
            .with_context(|| format!("could not get element with id `{id}`"))?
            .dyn_into()
            .map_err(|_| anyhow!("`{id}` is not a canvas"))?;
        Self::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, anyhow::Error> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("failed to get 2d context: {e:?}"))?
            .context("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has an unexpected type"))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for CanvasSurface {
    fn query_size(&self) -> SurfaceSize {
        SurfaceSize {
            w_px: self.canvas.width(),
            h_px: self.canvas.height(),
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.w_px);
        self.canvas.set_height(size.h_px);
    }

    fn clear(&mut self) {
        let size = self.query_size();
        self.ctx
            .clear_rect(0.0, 0.0, size.w_px as f64, size.h_px as f64);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
