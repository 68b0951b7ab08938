use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::config::EngineConfig;
use crate::domain::outcome::{SharedTarget, DICE_COUNT};
use crate::integrator::FixedStepper;
use crate::rigid_body_system::DiceWorld;

use super::perf_stats::PerfStats;
use super::session::AnimationSession;
use super::EngineCore;

pub(super) fn create_engine_core(config: EngineConfig) -> EngineCore {
    EngineCore {
        world: DiceWorld::new(&config),
        stepper: FixedStepper::new(&config.stepper),
        session: AnimationSession::new(&config),
        target: SharedTarget::new(),
        rng: session_rng(config.seed, 0),
        seed: config.seed,
        rounds: 0,
        listener: None,
        last_outcome: None,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        config,
    }
}

/// Shake randomness for the `round`-th session of `seed`: one ChaCha stream
/// per round, so consecutive rolls differ but replay from the same seed.
pub(super) fn session_rng(seed: u64, round: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(round);
    rng
}

/// Random unit vector, falling back to +X for the degenerate draw.
fn random_direction(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    )
    .try_normalize()
    .unwrap_or(Vec3::X)
}

/// Put the dice on a jittered ring near the cup center with random
/// orientations and small velocities, restore base damping and wake them.
pub(super) fn spawn_dice(world: &mut DiceWorld, config: &EngineConfig, rng: &mut impl Rng) {
    let session = &config.session;
    let h = config.world.die_half_extent;
    let jitter = session.spawn_jitter;
    let ring_phase = rng.gen_range(0.0..TAU);

    for die in 0..DICE_COUNT {
        let angle = ring_phase
            + die as f32 * TAU / DICE_COUNT as f32
            + rng.gen_range(-jitter..=jitter);
        let radius = (session.spawn_radius + rng.gen_range(-jitter..=jitter))
            .clamp(0.0, config.max_radial_distance());
        let height = (config.cage.floor + h + 0.05 + rng.gen_range(0.0..=jitter))
            .min(config.cage.ceiling - h);
        let position = Vec3::new(radius * angle.cos(), height, radius * angle.sin());

        let orientation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        )
        .normalize();
        let linear = random_direction(rng) * session.spawn_speed * rng.gen_range(0.5..=1.0);
        let angular = random_direction(rng) * session.spawn_spin * rng.gen_range(0.5..=1.0);

        world.set_pose(die, position, orientation, linear, angular);
        world.set_damping(die, config.world.linear_damping, config.world.angular_damping);
    }
    world.wake_all();
}
