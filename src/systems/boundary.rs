//! Boundary enforcer.
//!
//! The cup walls are a finite prism, so a die can poke past the round cage at
//! the polygon corners. Every sub-step each die is clamped back inside the
//! cylinder `radius - half_extent` and between floor and ceiling, with the
//! offending velocity component reflected at a damped fraction.

use glam::Vec3;

use crate::core::math::horizontal;
use crate::domain::config::EngineConfig;
use crate::domain::outcome::DICE_COUNT;
use crate::rigid_body_system::DiceWorld;

/// Result of clamping one die.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correction {
    pub position: Vec3,
    pub velocity: Vec3,
    pub clamped: bool,
}

/// Clamp a single position/velocity pair against the cage.
pub fn correct(config: &EngineConfig, position: Vec3, velocity: Vec3) -> Correction {
    let h = config.world.die_half_extent;
    let max_radius = config.max_radial_distance();
    let bounce = config.cage.boundary_bounce;
    let mut position = position;
    let mut velocity = velocity;
    let mut clamped = false;

    let radial = horizontal(position);
    let distance = radial.length();
    if distance > max_radius && distance > 0.0 {
        let normal = radial / distance;
        position.x = normal.x * max_radius;
        position.z = normal.z * max_radius;
        let outward = velocity.dot(normal);
        if outward > 0.0 {
            // Damped reflection: remove the outward part, send a fraction back.
            velocity -= normal * outward * (1.0 + bounce);
        }
        clamped = true;
    }

    let floor = config.cage.floor + h;
    let ceiling = config.cage.ceiling - h;
    if position.y < floor {
        position.y = floor;
        if velocity.y < 0.0 {
            velocity.y = -velocity.y * bounce;
        }
        clamped = true;
    } else if position.y > ceiling {
        position.y = ceiling;
        if velocity.y > 0.0 {
            velocity.y = -velocity.y * bounce;
        }
        clamped = true;
    }

    Correction { position, velocity, clamped }
}

/// Run the boundary pass over all dice. Returns how many were corrected.
pub fn enforce_boundary(world: &mut DiceWorld, config: &EngineConfig) -> u32 {
    let mut corrected = 0;
    for die in 0..DICE_COUNT {
        let state = world.state(die);
        let fix = correct(config, state.position, state.linear_velocity);
        if fix.clamped {
            world.set_position(die, fix.position);
            world.set_velocities(die, fix.velocity, state.angular_velocity);
            corrected += 1;
        }
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_radially_and_reflects_outward_velocity() {
        let config = EngineConfig::default();
        let max = config.max_radial_distance();
        let fix = correct(&config, Vec3::new(max + 1.0, 1.0, 0.0), Vec3::new(4.0, 0.0, 2.0));
        assert!(fix.clamped);
        assert!((horizontal(fix.position).length() - max).abs() < 1e-5);
        let bounce = config.cage.boundary_bounce;
        assert!((fix.velocity.x + 4.0 * bounce).abs() < 1e-5);
        assert_eq!(fix.velocity.z, 2.0);
    }

    #[test]
    fn inward_velocity_is_kept() {
        let config = EngineConfig::default();
        let max = config.max_radial_distance();
        let fix = correct(&config, Vec3::new(0.0, 1.0, -(max + 0.2)), Vec3::new(0.0, 0.0, 3.0));
        assert!(fix.clamped);
        assert_eq!(fix.velocity, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn clamps_floor_and_ceiling() {
        let config = EngineConfig::default();
        let h = config.world.die_half_extent;
        let low = correct(&config, Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(low.position.y, config.cage.floor + h);
        assert!(low.velocity.y >= 0.0);

        let high = correct(&config, Vec3::new(0.0, 99.0, 0.0), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(high.position.y, config.cage.ceiling - h);
        assert!(high.velocity.y <= 0.0);
    }

    #[test]
    fn inside_is_untouched() {
        let config = EngineConfig::default();
        let fix = correct(&config, Vec3::new(0.5, 1.0, 0.5), Vec3::new(1.0, 1.0, 1.0));
        assert!(!fix.clamped);
        assert_eq!(fix.position, Vec3::new(0.5, 1.0, 0.5));
    }
}
