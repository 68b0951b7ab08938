//! Dice Cup Engine - physics-guided dice for the Sic Bo shaker animation
//!
//! Three dice tumble in a round cup under rigid body physics, then are
//! steered so that each lands showing the face of an externally decided
//! outcome.
//!
//! Architecture:
//! - core/          - Math helpers at the solver seam
//! - domain/        - Faces, outcomes, config, errors
//! - systems/       - Rigid body world and per-step systems
//! - simulation/    - Engine core, sessions, game phase bridge, wasm API
//! - logging        - tracing output to the browser console

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;
pub mod logging;

// Short paths used across the crate
pub use systems::boundary;
pub use systems::finalize;
pub use systems::guidance;
pub use systems::integrator;
pub use systems::rigid_body;
pub use systems::rigid_body_system;
pub use systems::shake;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    logging::init_console_tracing(tracing::Level::INFO);
    web_sys::console::log_1(&"🎲 Dice cup engine initialized!".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::config::EngineConfig;
pub use domain::error::EngineError;
pub use domain::faces::Face;
pub use domain::outcome::{Outcome, SharedTarget, DICE_COUNT};
pub use simulation::{
    DiceEngine, EngineCore, EngineState, FrameReport, GamePhase, PerfStats, SessionPhase,
    SettledListener,
};
