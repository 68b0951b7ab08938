use wasm_bindgen::prelude::*;

use crate::domain::config::EngineConfig;
use crate::domain::error::EngineError;
use crate::domain::outcome::Outcome;

use super::perf_stats::PerfStats;
use super::{EngineCore, SettledListener};

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Forwards the settled outcome to a JS callback as `(d1, d2, d3)`.
struct JsSettledListener {
    callback: js_sys::Function,
}

impl SettledListener for JsSettledListener {
    fn on_settled(&mut self, outcome: Outcome) {
        let [d1, d2, d3] = outcome.values();
        let result = self.callback.call3(
            &JsValue::NULL,
            &JsValue::from(d1),
            &JsValue::from(d2),
            &JsValue::from(d3),
        );
        if let Err(err) = result {
            tracing::warn!(error = ?err, "settled callback threw");
        }
    }
}

#[wasm_bindgen]
pub struct DiceEngine {
    core: EngineCore,
}

#[wasm_bindgen]
impl DiceEngine {
    /// Engine with the shipped default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<DiceEngine, JsValue> {
        let core = EngineCore::new(EngineConfig::default()).map_err(to_js)?;
        Ok(Self { core })
    }

    /// Engine from a (partial) JSON config; missing fields take defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<DiceEngine, JsValue> {
        let core = EngineCore::from_json(json).map_err(to_js)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> String {
        self.core.config_json()
    }

    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&mut self) -> bool {
        self.core.start_session()
    }

    #[wasm_bindgen(js_name = resetSession)]
    pub fn reset_session(&mut self) {
        self.core.reset_session();
    }

    pub fn reseed(&mut self, seed: u64) {
        self.core.reseed(seed);
    }

    #[wasm_bindgen(js_name = bindTargetOutcome)]
    pub fn bind_target_outcome(&mut self, d1: u8, d2: u8, d3: u8) -> Result<(), JsValue> {
        self.core.bind_target_outcome(d1, d2, d3).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearTarget)]
    pub fn clear_target(&mut self) {
        self.core.clear_target();
    }

    /// Drive the engine from the game state machine
    /// (`"betting" | "rolling" | "revealing" | "settled"`).
    #[wasm_bindgen(js_name = onGamePhase)]
    pub fn on_game_phase(&mut self, phase: &str) -> Result<(), JsValue> {
        self.core.on_game_phase_str(phase).map_err(to_js)
    }

    /// Register `callback(d1, d2, d3)`, called once when the dice settle.
    #[wasm_bindgen(js_name = onSettled)]
    pub fn on_settled(&mut self, callback: js_sys::Function) {
        self.core.set_settled_listener(JsSettledListener { callback });
    }

    #[wasm_bindgen(js_name = clearSettledListener)]
    pub fn clear_settled_listener(&mut self) {
        self.core.clear_settled_listener();
    }

    /// Advance by one rendered frame. Returns true on the frame the dice
    /// settled.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        let report = self.core.advance((elapsed_ms / 1000.0) as f32);
        report.settled.is_some()
    }

    #[wasm_bindgen(js_name = forceSettle)]
    pub fn force_settle(&mut self) -> bool {
        self.core.force_settle().is_some()
    }

    /// `[px, py, pz, qx, qy, qz, qw]` per die.
    pub fn transforms(&self) -> Vec<f32> {
        self.core.transforms()
    }

    #[wasm_bindgen(js_name = faceValues)]
    pub fn face_values(&self) -> Vec<u8> {
        self.core.face_values().iter().map(|face| face.value()).collect()
    }

    /// Settled outcome of the current session, empty until then.
    #[wasm_bindgen(js_name = lastOutcome)]
    pub fn last_outcome(&self) -> Vec<u8> {
        self.core
            .last_outcome()
            .map(|outcome| outcome.values().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter, js_name = engineState)]
    pub fn engine_state(&self) -> String {
        self.core.engine_state().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = sessionPhase)]
    pub fn session_phase(&self) -> String {
        self.core.session_phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 {
        self.core.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u32 {
        self.core.frame()
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last frame's perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }
}
