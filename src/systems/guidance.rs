//! Outcome guidance blender.
//!
//! Late in a session each die is steered toward the orientation that shows its
//! target face. Two blends run together: the orientation is pulled from the
//! live physics pose toward an eased interpolation between the pose captured at
//! guidance entry and the target, while velocities bleed off in step. Because
//! the interpolation starts from wherever the die was when guidance began, the
//! hand-off from free physics is continuous.

use glam::Quat;

use crate::core::math::{ease_out_quad, lerp};
use crate::domain::config::EngineConfig;
use crate::domain::outcome::DICE_COUNT;
use crate::rigid_body_system::DiceWorld;

/// Blend factors for one sub-step. All three are non-decreasing in session
/// progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GuidanceWeights {
    /// Linear guidance progress in `[0, 1]`.
    pub progress: f32,
    /// Eased weight from the captured pose toward the target.
    pub orientation: f32,
    /// Weight from the live physics pose toward the guided pose.
    pub live: f32,
}

impl GuidanceWeights {
    pub fn at(session_progress: f32, shake_end: f32) -> Self {
        let progress = ((session_progress - shake_end) / (1.0 - shake_end)).clamp(0.0, 1.0);
        let orientation = ease_out_quad(progress);
        Self {
            progress,
            orientation,
            live: orientation * orientation,
        }
    }
}

/// Apply one guidance sub-step to every die.
pub fn apply_guidance(
    world: &mut DiceWorld,
    config: &EngineConfig,
    weights: GuidanceWeights,
    initial: &[Quat; DICE_COUNT],
    targets: &[Quat; DICE_COUNT],
) {
    let g = &config.guidance;
    let angular_scale = lerp(g.angular_scale_start, g.angular_scale_end, weights.progress);
    let linear_scale = lerp(g.linear_scale_start, g.linear_scale_end, weights.progress);
    let linear_damping = config.world.linear_damping + g.linear_damping_ramp * weights.progress;
    let angular_damping = config.world.angular_damping + g.angular_damping_ramp * weights.progress;

    for die in 0..DICE_COUNT {
        let state = world.state(die);
        let guided = initial[die].slerp(targets[die], weights.orientation);
        let blended = state.orientation.slerp(guided, weights.live).normalize();

        world.set_orientation(die, blended);
        world.set_velocities(
            die,
            state.linear_velocity * linear_scale,
            state.angular_velocity * angular_scale,
        );
        world.set_damping(die, linear_damping, angular_damping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::faces::{target_orientation, up_face, Face};
    use glam::{EulerRot, Vec3};

    #[test]
    fn weights_start_at_zero_and_end_at_one() {
        let start = GuidanceWeights::at(0.7, 0.7);
        assert_eq!(start, GuidanceWeights::default());
        let end = GuidanceWeights::at(1.0, 0.7);
        assert_eq!(end.orientation, 1.0);
        assert_eq!(end.live, 1.0);
    }

    #[test]
    fn weights_are_monotonic() {
        let mut last = GuidanceWeights::default();
        for i in 0..=200 {
            let w = GuidanceWeights::at(0.6 + i as f32 * 0.002, 0.7);
            assert!(w.progress >= last.progress);
            assert!(w.orientation >= last.orientation);
            assert!(w.live >= last.live);
            last = w;
        }
    }

    #[test]
    fn full_weight_lands_on_target_and_bleeds_velocity() {
        let config = EngineConfig::default();
        let mut world = DiceWorld::new(&config);
        let start = Quat::from_euler(EulerRot::XYZ, 0.7, 0.2, -1.9);
        let mut initial = [Quat::IDENTITY; DICE_COUNT];
        let mut targets = [Quat::IDENTITY; DICE_COUNT];
        for die in 0..DICE_COUNT {
            let state = world.state(die);
            world.set_pose(die, state.position, start, Vec3::X, Vec3::Y * 10.0);
            initial[die] = start;
            targets[die] = target_orientation(start, Face::new(5).unwrap());
        }

        apply_guidance(&mut world, &config, GuidanceWeights::at(1.0, 0.7), &initial, &targets);

        for die in 0..DICE_COUNT {
            let state = world.state(die);
            assert_eq!(up_face(state.orientation).value(), 5);
            assert!(state.angular_velocity.length() < 10.0 * 0.79);
            assert!(state.angular_damping > config.world.angular_damping);
        }
    }
}
