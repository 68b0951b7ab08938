//! Shake force generator.
//!
//! Not a model of a real shaker: a handful of procedural impulses that make
//! the dice tumble and collide near the middle of the cup, fading out before
//! guidance takes over.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::core::math::{clamp_length_finite, horizontal, to_na_point, to_na_vec};
use crate::domain::config::{EngineConfig, ShakeConfig};
use crate::domain::outcome::DICE_COUNT;
use crate::rigid_body_system::DiceWorld;

/// Force multiplier for a session progress: full strength until
/// `decay_start`, then `1 - t^2` down to zero at `shake_end`.
pub fn force_scale(progress: f32, decay_start: f32, shake_end: f32) -> f32 {
    if progress <= decay_start {
        return 1.0;
    }
    if progress >= shake_end {
        return 0.0;
    }
    let t = (progress - decay_start) / (shake_end - decay_start);
    (1.0 - t * t).max(0.0)
}

/// Phase offset so the three dice never move in lockstep.
#[inline]
fn die_phase(die: usize) -> f32 {
    die as f32 * TAU / DICE_COUNT as f32
}

/// Cyclical shake direction at `time` for a die (before scaling).
pub fn cyclical_impulse(shake: &ShakeConfig, die: usize, time: f32) -> Vec3 {
    let phase = shake.cycle_frequency * time + die_phase(die);
    let sway = Vec3::new(phase.sin(), 0.0, phase.cos()) * shake.cycle_strength;
    let lift = Vec3::Y * shake.lift_strength * (2.0 * phase).sin().max(0.0);
    sway + lift
}

/// Apply one sub-step of shake impulses to every die.
pub fn apply_shake(
    world: &mut DiceWorld,
    config: &EngineConfig,
    progress: f32,
    time: f32,
    dt: f32,
    rng: &mut impl Rng,
) {
    let shake = &config.shake;
    let scale = force_scale(progress, shake.decay_start, config.session.shake_end);
    let half_extent = config.world.die_half_extent;

    for die in 0..DICE_COUNT {
        let state = world.state(die);
        let body = world.body_mut(die);
        let mass = body.mass();

        // Pull grows with distance from the axis.
        let center_pull = -horizontal(state.position) * shake.center_pull;
        let cycle = cyclical_impulse(shake, die, time) * scale;
        let impulse = (center_pull + cycle) * mass * dt;

        // Off-center application turns part of the push into tumbling.
        let offset = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ) * half_extent
            * shake.offset_fraction;
        body.apply_impulse_at_point(
            to_na_vec(impulse),
            to_na_point(state.position + offset),
            true,
        );

        if scale > 0.0 && state.angular_velocity.length() < shake.spin_floor {
            let axis = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .try_normalize()
            .unwrap_or(Vec3::X);
            body.apply_torque_impulse(to_na_vec(axis * shake.spin_kick * mass * scale), true);
        }
    }
}

/// Clamp every die's speeds and zero any non-finite velocity.
pub fn clamp_speeds(world: &mut DiceWorld, shake: &ShakeConfig) {
    for die in 0..DICE_COUNT {
        let state = world.state(die);
        let linear = clamp_length_finite(state.linear_velocity, shake.max_linear_speed);
        let angular = clamp_length_finite(state.angular_velocity, shake.max_angular_speed);
        if linear != state.linear_velocity || angular != state.angular_velocity {
            world.set_velocities(die, linear, angular);
        }
    }
}
