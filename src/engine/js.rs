//! Binding to the engine's exported `Universe` class. The cell buffer lives in
//! the engine module's own linear memory, so reads go through a `Uint8Array`
//! view over that memory and are copied out before any further call.

use js_sys::{Uint8Array, WebAssembly};
use wasm_bindgen::prelude::*;

use super::{CellBuffer, CellState, Engine};
use crate::error::UnsupportedShapeError;
use crate::geometry::Shape;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type Universe;

    #[wasm_bindgen(method)]
    fn width(this: &Universe) -> u32;
    #[wasm_bindgen(method)]
    fn height(this: &Universe) -> u32;
    #[wasm_bindgen(method)]
    fn born_rules(this: &Universe) -> String;
    #[wasm_bindgen(method)]
    fn survives_rules(this: &Universe) -> String;
    #[wasm_bindgen(method)]
    fn cell_form_factor(this: &Universe) -> u8;
    #[wasm_bindgen(method)]
    fn tick(this: &Universe) -> u32;
    /// Pointer into the engine's memory.
    #[wasm_bindgen(method)]
    fn cells(this: &Universe) -> u32;
    #[wasm_bindgen(method)]
    fn cell_toggle(this: &Universe, w: u32, h: u32) -> u8;
    #[wasm_bindgen(method)]
    fn restart(this: &Universe, born: &str, survives: &str, w: u32, h: u32, cell_form_factor: u8);
    #[wasm_bindgen(method)]
    fn clear_universe(this: &Universe);
}

pub struct JsEngine {
    universe: Universe,
    memory: WebAssembly::Memory,
}

impl JsEngine {
    pub fn new(universe: JsValue, memory: JsValue) -> Result<Self, anyhow::Error> {
        if universe.is_undefined() || universe.is_null() {
            anyhow::bail!("no universe was passed to the view");
        }
        let memory = memory
            .dyn_into::<WebAssembly::Memory>()
            .map_err(|_| anyhow::anyhow!("engine memory is not a WebAssembly.Memory"))?;
        Ok(Self {
            universe: universe.unchecked_into(),
            memory,
        })
    }
}

impl Engine for JsEngine {
    fn width(&self) -> u32 {
        self.universe.width()
    }

    fn height(&self) -> u32 {
        self.universe.height()
    }

    fn born_rules(&self) -> String {
        self.universe.born_rules()
    }

    fn survive_rules(&self) -> String {
        self.universe.survives_rules()
    }

    fn cell_form_factor(&self) -> Result<Shape, UnsupportedShapeError> {
        Shape::try_from(self.universe.cell_form_factor())
    }

    fn tick(&mut self) -> u64 {
        self.universe.tick() as u64
    }

    fn cells(&self) -> CellBuffer<'_> {
        let width = self.universe.width();
        let len = width * self.universe.height();
        let ptr = self.universe.cells();
        let view = Uint8Array::new_with_byte_offset_and_length(&self.memory.buffer(), ptr, len);
        CellBuffer::owned(width, view.to_vec())
    }

    fn cell_toggle(&mut self, col: u32, row: u32) -> CellState {
        CellState::from_byte(self.universe.cell_toggle(col, row))
    }

    fn restart(&mut self, born: &str, survive: &str, width: u32, height: u32, shape: Shape) {
        self.universe
            .restart(born, survive, width, height, shape.code());
    }

    fn clear_universe(&mut self) {
        self.universe.clear_universe();
    }
}
