#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use dice_cup_engine::DiceEngine;

#[wasm_bindgen_test]
fn facade_rolls_to_the_bound_outcome() {
    let mut engine = DiceEngine::new().unwrap();
    engine.bind_target_outcome(2, 6, 1).unwrap();
    engine.on_game_phase("rolling").unwrap();
    assert_eq!(engine.engine_state(), "shaking");

    let mut settled = false;
    for _ in 0..400 {
        if engine.tick(16.0) {
            settled = true;
            break;
        }
    }
    assert!(settled);
    assert_eq!(engine.last_outcome(), vec![2, 6, 1]);
    assert_eq!(engine.face_values(), vec![2, 6, 1]);
    assert_eq!(engine.transforms().len(), 21);
}

#[wasm_bindgen_test]
fn facade_reports_bad_input() {
    let mut engine = DiceEngine::new().unwrap();
    assert!(engine.bind_target_outcome(0, 1, 2).is_err());
    assert!(engine.on_game_phase("cashout").is_err());
    assert!(DiceEngine::with_config("{broken").is_err());
}

#[wasm_bindgen_test]
fn console_tracing_installs_once() {
    dice_cup_engine::init();
    assert!(!dice_cup_engine::logging::init_console_tracing(tracing::Level::INFO));

    // Budget runs out with no target: the fallback warning goes to the console.
    let mut engine = DiceEngine::with_config(r#"{"session":{"max_frames":10}}"#).unwrap();
    engine.on_game_phase("rolling").unwrap();
    for _ in 0..20 {
        assert!(!engine.tick(16.0));
    }
    assert_eq!(engine.session_phase(), "finalizing");
}
