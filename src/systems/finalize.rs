//! Stabilization finalizer.
//!
//! Puts every die into its exact, bit-stable resting state: the exact target
//! orientation (not the blended approximation), zero velocity, near-maximum
//! damping, a floor position rounded to a fixed grid, and the body asleep.

use std::f32::consts::SQRT_2;

use glam::{Quat, Vec3};

use crate::core::math::{horizontal, quantize_vec};
use crate::domain::config::EngineConfig;
use crate::domain::outcome::{Outcome, DICE_COUNT};
use crate::rigid_body_system::DiceWorld;

/// Snap all dice to `targets` and return the faces they now show.
pub fn snap_to_targets(
    world: &mut DiceWorld,
    config: &EngineConfig,
    targets: &[Quat; DICE_COUNT],
) -> Outcome {
    let precision = config.finalize.position_precision;
    let damping = config.finalize.settled_damping;

    let states = world.states();
    let resting = resting_positions(config, std::array::from_fn(|die| states[die].position));

    for die in 0..DICE_COUNT {
        let position = quantize_vec(resting[die], precision);
        world.set_pose(die, position, targets[die], Vec3::ZERO, Vec3::ZERO);
        world.set_damping(die, damping, damping);
        world.body_mut(die).sleep();
    }

    let states = world.states();
    Outcome::from_faces(std::array::from_fn(|die| states[die].up_face()))
}

/// Where each die rests once snapped face-flat: on the floor, footprints
/// pushed apart horizontally and kept inside the cage.
///
/// A forced settle can catch dice mid-air or stacked, so height is never
/// taken from the live pose.
pub fn resting_positions(
    config: &EngineConfig,
    positions: [Vec3; DICE_COUNT],
) -> [Vec3; DICE_COUNT] {
    let h = config.world.die_half_extent;
    let rest_y = config.cage.floor + h;
    let max_radius = config.max_radial_distance();
    // Footprint circles of two dice with any heading about UP.
    let min_gap = 2.0 * h * SQRT_2;

    let mut positions = positions.map(|p| Vec3::new(p.x, rest_y, p.z));
    for _ in 0..16 {
        let mut moved = false;
        for a in 0..DICE_COUNT {
            for b in (a + 1)..DICE_COUNT {
                let delta = horizontal(positions[b] - positions[a]);
                let distance = delta.length();
                if distance >= min_gap {
                    continue;
                }
                let dir = if distance > 1e-6 {
                    delta / distance
                } else {
                    let angle = b as f32;
                    Vec3::new(angle.cos(), 0.0, angle.sin())
                };
                let push = dir * (min_gap - distance) * 0.5;
                positions[a] -= push;
                positions[b] += push;
                moved = true;
            }
        }
        for p in positions.iter_mut() {
            let radial = horizontal(*p);
            let distance = radial.length();
            if distance > max_radius {
                let inside = radial / distance * max_radius;
                p.x = inside.x;
                p.z = inside.z;
            }
        }
        if !moved {
            break;
        }
    }
    positions
}

/// Strong damping used while a session has run out of frames but still has
/// no target to snap to.
pub fn apply_fallback_damping(world: &mut DiceWorld, config: &EngineConfig) {
    let scale = config.finalize.fallback_velocity_scale;
    let damping = config.finalize.fallback_damping;
    for die in 0..DICE_COUNT {
        let state = world.state(die);
        world.set_velocities(
            die,
            state.linear_velocity * scale,
            state.angular_velocity * scale,
        );
        world.set_damping(die, damping, damping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::faces::target_orientation;
    use glam::EulerRot;

    #[test]
    fn snap_shows_target_faces_at_rest() {
        let config = EngineConfig::default();
        let mut world = DiceWorld::new(&config);
        let wanted = Outcome::new(2, 6, 4).unwrap();
        let mut targets = [Quat::IDENTITY; DICE_COUNT];
        for die in 0..DICE_COUNT {
            let q = Quat::from_euler(EulerRot::XYZ, die as f32, 0.5, 1.0 - die as f32);
            let state = world.state(die);
            world.set_pose(
                die,
                state.position + Vec3::new(0.000_37, 0.0, -0.000_21),
                q,
                Vec3::ONE,
                Vec3::ONE,
            );
            targets[die] = target_orientation(q, wanted.face(die));
        }

        let shown = snap_to_targets(&mut world, &config, &targets);
        assert_eq!(shown, wanted);

        for state in world.states() {
            assert!(state.is_at_rest());
            assert!(state.sleeping);
            let p = state.position / config.finalize.position_precision;
            assert!((p - p.round()).abs().max_element() < 1e-2);
        }
    }

    #[test]
    fn snap_drops_airborne_dice_to_the_floor() {
        let config = EngineConfig::default();
        let mut world = DiceWorld::new(&config);
        let wanted = Outcome::new(5, 5, 1).unwrap();
        let mut targets = [Quat::IDENTITY; DICE_COUNT];
        for die in 0..DICE_COUNT {
            // Stacked on the cage axis, well above the floor.
            let position = Vec3::new(0.0, 1.2 + die as f32, 0.0);
            let q = Quat::from_rotation_x(0.3 * die as f32);
            world.set_pose(die, position, q, Vec3::ZERO, Vec3::ZERO);
            targets[die] = target_orientation(q, wanted.face(die));
        }

        assert_eq!(snap_to_targets(&mut world, &config, &targets), wanted);

        let rest_y = config.cage.floor + config.world.die_half_extent;
        let states = world.states();
        for state in states.iter() {
            assert!((state.position.y - rest_y).abs() <= config.finalize.position_precision);
            assert!(state.radial_distance() <= config.max_radial_distance() + 1e-3);
        }
        for a in 0..DICE_COUNT {
            for b in (a + 1)..DICE_COUNT {
                let gap = (states[a].position - states[b].position).length();
                assert!(gap >= 2.0 * config.world.die_half_extent, "dice {a} and {b} overlap");
            }
        }
    }

    #[test]
    fn resting_positions_keep_separated_dice_in_place() {
        let config = EngineConfig::default();
        let spread = [
            Vec3::new(-1.5, 0.9, 0.0),
            Vec3::new(0.0, 0.5, 1.5),
            Vec3::new(1.5, 0.7, 0.0),
        ];
        let rest_y = config.cage.floor + config.world.die_half_extent;
        for (placed, start) in resting_positions(&config, spread).iter().zip(spread) {
            assert_eq!(placed.x, start.x);
            assert_eq!(placed.z, start.z);
            assert_eq!(placed.y, rest_y);
        }
    }

    #[test]
    fn fallback_damping_bleeds_velocity() {
        let config = EngineConfig::default();
        let mut world = DiceWorld::new(&config);
        world.set_velocities(1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0));
        apply_fallback_damping(&mut world, &config);
        let state = world.state(1);
        assert!(state.linear_velocity.x < 2.0);
        assert!(state.angular_velocity.y < 4.0);
        assert_eq!(state.linear_damping, config.finalize.fallback_damping);
    }
}
