use std::cell::Cell;
use std::rc::Rc;

use dice_cup_engine::rigid_body::DieState;
use dice_cup_engine::{EngineConfig, EngineCore, EngineState, GamePhase, Outcome, SessionPhase};

const EPS: f32 = 1e-2;

fn engine() -> EngineCore {
    EngineCore::new(EngineConfig::default()).unwrap()
}

fn assert_contained(config: &EngineConfig, states: &[DieState]) {
    let h = config.world.die_half_extent;
    for state in states {
        assert!(
            state.radial_distance() <= config.max_radial_distance() + EPS,
            "die escaped radially: {:?}",
            state.position
        );
        assert!(state.position.y >= config.cage.floor + h - EPS, "die below floor");
        assert!(state.position.y <= config.cage.ceiling - h + EPS, "die above ceiling");
    }
}

fn counting_listener(engine: &mut EngineCore) -> Rc<Cell<u32>> {
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    engine.set_settled_listener(move |_: Outcome| counter.set(counter.get() + 1));
    fired
}

#[test]
fn triple_six_at_sixty_fps() {
    let mut engine = engine();
    let fired = counting_listener(&mut engine);
    let wanted = engine.bind_target_outcome(6, 6, 6).unwrap();
    engine.start_session();

    let budget = engine.session().max_frames();
    let mut settled = Vec::new();
    for _ in 0..(budget + 30) {
        let report = engine.advance(0.016);
        assert_contained(engine.config(), &engine.die_states());
        settled.extend(report.settled);
    }

    assert_eq!(settled, vec![wanted]);
    assert_eq!(fired.get(), 1);
    let faces: Vec<u8> = engine.face_values().iter().map(|f| f.value()).collect();
    assert_eq!(faces, vec![6, 6, 6]);
    assert!(engine.die_states().iter().all(|s| s.is_at_rest() && s.sleeping));
}

#[test]
fn late_bind_after_ninety_five_percent() {
    let mut engine = engine();
    let fired = counting_listener(&mut engine);
    engine.start_session();

    while engine.progress() <= 0.95 {
        assert!(engine.advance(0.016).settled.is_none());
    }
    assert!(engine.target().is_none());
    let wanted = engine.bind_target_outcome(1, 3, 5).unwrap();

    let mut settled = None;
    for _ in 0..60 {
        if let Some(outcome) = engine.advance(0.016).settled {
            settled = Some(outcome);
            break;
        }
    }
    assert_eq!(settled, Some(wanted));
    assert_eq!(Outcome::from_faces(engine.face_values()), wanted);
    assert_eq!(fired.get(), 1);
}

#[test]
fn sub_step_counts_match_across_frame_rates() {
    let mut fast = engine();
    let mut slow = engine();
    fast.start_session();
    slow.start_session();

    // Equal wall time, well inside the session budget.
    let mut fast_steps = 0;
    for _ in 0..66 {
        fast_steps += fast.advance(0.016).sub_steps;
    }
    let mut slow_steps = 0;
    for _ in 0..32 {
        slow_steps += slow.advance(0.033).sub_steps;
    }
    assert!((fast_steps as i64 - slow_steps as i64).abs() <= 1);
}

#[test]
fn settle_time_is_frame_rate_independent() {
    let mut results = Vec::new();
    for elapsed in [0.016f32, 0.033, 1.0 / 144.0] {
        let mut engine = engine();
        engine.bind_target_outcome(2, 5, 3).unwrap();
        engine.start_session();
        let mut steps = 0;
        let mut settled = None;
        for _ in 0..2000 {
            let report = engine.advance(elapsed);
            steps += report.sub_steps;
            if report.settled.is_some() {
                settled = report.settled;
                break;
            }
        }
        assert!(settled.is_some());
        results.push(steps);
    }
    let budget = EngineConfig::default().session.max_frames;
    assert!(results.iter().all(|&steps| steps == budget), "{results:?}");
}

#[test]
fn guidance_weights_never_decrease() {
    let mut engine = engine();
    engine.bind_target_outcome(4, 1, 6).unwrap();
    engine.start_session();

    let mut last = engine.session().weights();
    for _ in 0..400 {
        let report = engine.advance(0.016);
        let weights = engine.session().weights();
        assert!(weights.progress >= last.progress);
        assert!(weights.orientation >= last.orientation);
        assert!(weights.live >= last.live);
        last = weights;
        if report.settled.is_some() {
            break;
        }
    }
    assert!(last.orientation > 0.9);
}

fn record_roll(engine: &mut EngineCore, frames: usize) -> Vec<Vec<f32>> {
    (0..frames)
        .map(|_| {
            engine.advance(0.016);
            engine.transforms()
        })
        .collect()
}

fn play_round(engine: &mut EngineCore, outcome: (u8, u8, u8)) {
    engine.on_game_phase(GamePhase::Betting);
    engine.bind_target_outcome(outcome.0, outcome.1, outcome.2).unwrap();
    engine.on_game_phase(GamePhase::Rolling);
    for _ in 0..400 {
        if engine.advance(0.016).settled.is_some() {
            break;
        }
    }
    assert_eq!(engine.engine_state(), EngineState::Settled);
}

#[test]
fn reseeded_engine_replays_a_fresh_one() {
    let mut fresh = engine();
    fresh.bind_target_outcome(2, 2, 2).unwrap();
    fresh.start_session();
    let expected = record_roll(&mut fresh, 150);

    let mut reused = engine();
    play_round(&mut reused, (3, 3, 2));
    reused.reset_session();
    assert_eq!(reused.frame(), 0);
    assert!(!reused.session().is_finalized());
    assert!(!reused.session().has_corrected());
    assert!(reused.die_states().iter().all(|s| s.is_at_rest()));

    reused.reseed(EngineConfig::default().seed);
    reused.bind_target_outcome(2, 2, 2).unwrap();
    reused.start_session();
    let replay = record_roll(&mut reused, 150);

    let diverged = expected.iter().zip(&replay).position(|(a, b)| a != b);
    assert_eq!(diverged, None);
}

#[test]
fn engines_with_the_same_history_match() {
    let mut a = engine();
    let mut b = engine();
    for outcome in [(1, 1, 4), (6, 2, 5)] {
        play_round(&mut a, outcome);
        play_round(&mut b, outcome);
    }

    a.on_game_phase(GamePhase::Betting);
    b.on_game_phase(GamePhase::Betting);
    a.on_game_phase(GamePhase::Rolling);
    b.on_game_phase(GamePhase::Rolling);
    let third_a = record_roll(&mut a, 120);
    let third_b = record_roll(&mut b, 120);
    assert_eq!(third_a, third_b);

    // A different round index draws different shake randomness.
    let mut first = engine();
    first.on_game_phase(GamePhase::Rolling);
    assert_ne!(record_roll(&mut first, 30), third_a[..30].to_vec());
}

#[test]
fn revealing_forces_an_early_settle() {
    let mut engine = engine();
    let fired = counting_listener(&mut engine);
    engine.on_game_phase(GamePhase::Rolling);
    for _ in 0..20 {
        engine.advance(0.016);
    }
    let wanted = engine.bind_target_outcome(5, 2, 2).unwrap();
    engine.on_game_phase(GamePhase::Revealing);

    assert_eq!(engine.engine_state(), EngineState::Settled);
    assert_eq!(engine.last_outcome(), Some(wanted));
    assert_eq!(Outcome::from_faces(engine.face_values()), wanted);

    engine.on_game_phase(GamePhase::Settled);
    engine.advance(0.016);
    assert_eq!(fired.get(), 1);
}

#[test]
fn revealing_without_target_waits_then_settles() {
    let mut engine = engine();
    engine.on_game_phase(GamePhase::Rolling);
    engine.advance(0.016);
    engine.on_game_phase(GamePhase::Revealing);
    assert_eq!(engine.session_phase(), SessionPhase::Finalizing);
    assert_eq!(engine.engine_state(), EngineState::Shaking);

    for _ in 0..10 {
        assert!(engine.advance(0.016).settled.is_none());
    }
    let wanted = engine.bind_target_outcome(6, 3, 1).unwrap();
    let mut settled = None;
    for _ in 0..5 {
        settled = settled.or(engine.advance(0.016).settled);
    }
    assert_eq!(settled, Some(wanted));
}

#[test]
fn rolling_does_not_interrupt_a_running_session() {
    let mut engine = engine();
    engine.on_game_phase(GamePhase::Rolling);
    for _ in 0..30 {
        engine.advance(0.016);
    }
    let frame = engine.frame();
    engine.on_game_phase(GamePhase::Rolling);
    assert_eq!(engine.frame(), frame);
    assert_eq!(engine.engine_state(), EngineState::Shaking);
}

#[test]
fn config_json_round_trips_through_the_engine() {
    let json = r#"{"session":{"max_frames":120},"seed":99}"#;
    let engine = EngineCore::from_json(json).unwrap();
    assert_eq!(engine.config().session.max_frames, 120);
    assert_eq!(engine.seed(), 99);
    let again = EngineCore::from_json(&engine.config_json()).unwrap();
    assert_eq!(again.config(), engine.config());
}
