use dice_cup_engine::{EngineConfig, EngineCore};

#[test]
fn perf_smoke_frame() {
    let mut engine = EngineCore::new(EngineConfig::default()).unwrap();
    engine.enable_perf_metrics(true);
    engine.bind_target_outcome(3, 1, 2).unwrap();
    engine.start_session();
    engine.advance(1.0 / 30.0);
    let stats = engine.get_perf_stats();
    assert!(stats.frame_ms() >= 0.0);
    assert!(stats.physics_ms() >= 0.0);
    assert_eq!(stats.sub_steps(), 2);
}
