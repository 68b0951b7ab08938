use wasm_bindgen::prelude::*;

/// Timing and counters for the last `advance` call.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) frame_ms: f64,
    pub(super) physics_ms: f64,
    pub(super) systems_ms: f64,
    pub(super) sub_steps: u32,
    pub(super) simulated_ms: f64,
    pub(super) accumulator_ms: f64,
    pub(super) boundary_corrections: u32,
    pub(super) session_frame: u32,
    pub(super) progress: f32,
    pub(super) settled: bool,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn systems_ms(&self) -> f64 { self.systems_ms }
    #[wasm_bindgen(getter)]
    pub fn sub_steps(&self) -> u32 { self.sub_steps }
    #[wasm_bindgen(getter)]
    pub fn simulated_ms(&self) -> f64 { self.simulated_ms }
    #[wasm_bindgen(getter)]
    pub fn accumulator_ms(&self) -> f64 { self.accumulator_ms }
    #[wasm_bindgen(getter)]
    pub fn boundary_corrections(&self) -> u32 { self.boundary_corrections }
    #[wasm_bindgen(getter)]
    pub fn session_frame(&self) -> u32 { self.session_frame }
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 { self.progress }
    #[wasm_bindgen(getter)]
    pub fn settled(&self) -> bool { self.settled }
}
