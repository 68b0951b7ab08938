use dice_cup_engine::{EngineConfig, EngineCore, EngineState, GamePhase, Outcome};

const FRAME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60;

fn engine() -> EngineCore {
    let mut config = EngineConfig::default();
    config.session.max_frames = MAX_FRAMES;
    EngineCore::new(config).unwrap()
}

fn all_outcomes() -> impl Iterator<Item = Outcome> {
    (1..=6u8).flat_map(|a| {
        (1..=6u8).flat_map(move |b| (1..=6u8).map(move |c| Outcome::new(a, b, c).unwrap()))
    })
}

fn settle(engine: &mut EngineCore) -> Outcome {
    for _ in 0..(MAX_FRAMES * 2) {
        if let Some(outcome) = engine.advance(FRAME).settled {
            return outcome;
        }
    }
    panic!("session did not settle");
}

fn shown(engine: &EngineCore) -> Outcome {
    Outcome::from_faces(engine.face_values())
}

#[test]
fn every_outcome_bound_before_the_roll_is_shown() {
    let mut engine = engine();
    let mut count = 0;
    for wanted in all_outcomes() {
        engine.on_game_phase(GamePhase::Betting);
        engine.bind_target(wanted);
        engine.on_game_phase(GamePhase::Rolling);

        let settled = settle(&mut engine);
        assert_eq!(settled, wanted);
        assert_eq!(shown(&engine), wanted);
        assert_eq!(engine.engine_state(), EngineState::Settled);
        count += 1;
    }
    assert_eq!(count, 216);
}

#[test]
fn every_outcome_bound_mid_roll_is_shown() {
    let mut engine = engine();
    for (i, wanted) in all_outcomes().enumerate() {
        engine.on_game_phase(GamePhase::Betting);
        engine.on_game_phase(GamePhase::Rolling);

        // Spread the bind point over the whole session, shake window included.
        let bind_at = (i as u32 * 7) % MAX_FRAMES;
        while engine.frame() < bind_at {
            assert!(engine.advance(FRAME).settled.is_none());
        }
        engine.bind_target(wanted);

        assert_eq!(settle(&mut engine), wanted);
        assert_eq!(shown(&engine), wanted);
    }
}
