//! Engine configuration.
//!
//! Every tuning constant that shapes the "feel" of a roll lives here rather
//! than in the systems. Correctness only depends on the invariants checked by
//! [`EngineConfig::validate`]; the default values are what the cup animation
//! ships with.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub cage: CageConfig,
    pub materials: MaterialsConfig,
    pub stepper: StepperConfig,
    pub session: SessionConfig,
    pub shake: ShakeConfig,
    pub guidance: GuidanceConfig,
    pub finalize: FinalizeConfig,
    /// Seed for the shake RNG. Each session restarts from it.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            cage: CageConfig::default(),
            materials: MaterialsConfig::default(),
            stepper: StepperConfig::default(),
            session: SessionConfig::default(),
            shake: ShakeConfig::default(),
            guidance: GuidanceConfig::default(),
            finalize: FinalizeConfig::default(),
            seed: 0x5eed_d1ce,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Vertical gravity (negative = down).
    pub gravity: f32,
    pub die_half_extent: f32,
    pub die_density: f32,
    /// Baseline body damping, restored at the start of every session.
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_linear_threshold: f32,
    pub sleep_angular_threshold: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: -30.0,
            die_half_extent: 0.5,
            die_density: 1.0,
            linear_damping: 0.1,
            angular_damping: 0.1,
            sleep_linear_threshold: 0.05,
            sleep_angular_threshold: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CageConfig {
    pub radius: f32,
    pub floor: f32,
    pub ceiling: f32,
    /// Sides of the prism approximating the round cup.
    pub wall_segments: u32,
    pub wall_thickness: f32,
    /// Fraction of outward velocity reflected by the manual boundary clamp.
    pub boundary_bounce: f32,
}

impl Default for CageConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            floor: 0.0,
            ceiling: 4.0,
            wall_segments: 12,
            wall_thickness: 0.5,
            boundary_bounce: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    pub die_die: ContactMaterial,
    pub die_floor: ContactMaterial,
    pub die_wall: ContactMaterial,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        // Low bounce, moderate friction: dice settle instead of rattling forever.
        Self {
            die_die: ContactMaterial { friction: 0.4, restitution: 0.15 },
            die_floor: ContactMaterial { friction: 0.6, restitution: 0.1 },
            die_wall: ContactMaterial { friction: 0.3, restitution: 0.2 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Fixed physics step in seconds.
    pub step_size: f32,
    pub max_sub_steps: u32,
    /// Per-frame elapsed time is clamped to this before accumulation.
    pub max_frame_delta: f32,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            step_size: 1.0 / 60.0,
            max_sub_steps: 6,
            max_frame_delta: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session length in fixed sub-steps.
    pub max_frames: u32,
    /// Progress at which shaking stops and guidance may begin.
    pub shake_end: f32,
    /// Horizontal spawn ring radius around the cage axis.
    pub spawn_radius: f32,
    pub spawn_jitter: f32,
    pub spawn_speed: f32,
    pub spawn_spin: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frames: 180,
            shake_end: 0.7,
            spawn_radius: 1.1,
            spawn_jitter: 0.2,
            spawn_speed: 1.5,
            spawn_spin: 6.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Progress after which the force scale starts decaying.
    pub decay_start: f32,
    /// Center-seeking impulse per unit of radial distance (scaled by mass * dt).
    pub center_pull: f32,
    pub cycle_strength: f32,
    /// Angular frequency of the cyclical shake in rad/s.
    pub cycle_frequency: f32,
    pub lift_strength: f32,
    /// Impulse offset from the center of mass, as a fraction of the half extent.
    pub offset_fraction: f32,
    /// Angular speed below which a die gets an extra spin kick.
    pub spin_floor: f32,
    pub spin_kick: f32,
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            decay_start: 0.4,
            center_pull: 2.5,
            cycle_strength: 6.0,
            cycle_frequency: 9.0,
            lift_strength: 45.0,
            offset_fraction: 0.5,
            spin_floor: 4.0,
            spin_kick: 1.5,
            max_linear_speed: 8.0,
            max_angular_speed: 25.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub angular_scale_start: f32,
    pub angular_scale_end: f32,
    pub linear_scale_start: f32,
    pub linear_scale_end: f32,
    /// Body damping added at full guidance progress.
    pub linear_damping_ramp: f32,
    pub angular_damping_ramp: f32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            angular_scale_start: 0.88,
            angular_scale_end: 0.78,
            linear_scale_start: 0.92,
            linear_scale_end: 0.85,
            linear_damping_ramp: 4.0,
            angular_damping_ramp: 6.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeConfig {
    pub settled_damping: f32,
    /// Grid that final positions are rounded to.
    pub position_precision: f32,
    /// Per-step velocity scale while waiting for a late target.
    pub fallback_velocity_scale: f32,
    pub fallback_damping: f32,
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            settled_damping: 100.0,
            position_precision: 0.001,
            fallback_velocity_scale: 0.8,
            fallback_damping: 10.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        fn fail(msg: impl Into<String>) -> Result<(), EngineError> {
            Err(EngineError::InvalidConfig(msg.into()))
        }

        let h = self.world.die_half_extent;
        if !(h > 0.0) {
            return fail("world.die_half_extent must be positive");
        }
        if !(self.world.die_density > 0.0) {
            return fail("world.die_density must be positive");
        }
        if self.cage.radius <= h * 2.0 {
            return fail("cage.radius must leave room for a die");
        }
        if self.cage.ceiling - self.cage.floor <= h * 2.0 {
            return fail("cage.ceiling must be above floor by more than a die");
        }
        if self.cage.wall_segments < 3 {
            return fail("cage.wall_segments must be at least 3");
        }
        if !(0.0..=1.0).contains(&self.cage.boundary_bounce) {
            return fail("cage.boundary_bounce must be in [0, 1]");
        }
        if !(self.stepper.step_size > 0.0) {
            return fail("stepper.step_size must be positive");
        }
        if self.stepper.max_sub_steps == 0 {
            return fail("stepper.max_sub_steps must be at least 1");
        }
        if !(self.stepper.max_frame_delta >= self.stepper.step_size) {
            return fail("stepper.max_frame_delta must cover at least one step");
        }
        if self.session.max_frames == 0 {
            return fail("session.max_frames must be at least 1");
        }
        let shake_end = self.session.shake_end;
        if !(shake_end > 0.0 && shake_end < 1.0) {
            return fail("session.shake_end must be in (0, 1)");
        }
        if !(self.shake.decay_start >= 0.0 && self.shake.decay_start < shake_end) {
            return fail("shake.decay_start must be in [0, session.shake_end)");
        }
        if !(self.session.spawn_jitter >= 0.0
            && self.session.spawn_speed >= 0.0
            && self.session.spawn_spin >= 0.0)
        {
            return fail("session spawn jitter, speed and spin must not be negative");
        }
        if self.session.spawn_radius + h > self.cage.radius - h {
            return fail("session.spawn_radius places dice outside the cage");
        }
        for (name, scale) in [
            ("guidance.angular_scale_start", self.guidance.angular_scale_start),
            ("guidance.angular_scale_end", self.guidance.angular_scale_end),
            ("guidance.linear_scale_start", self.guidance.linear_scale_start),
            ("guidance.linear_scale_end", self.guidance.linear_scale_end),
            ("finalize.fallback_velocity_scale", self.finalize.fallback_velocity_scale),
        ] {
            if !(0.0..=1.0).contains(&scale) {
                return fail(format!("{name} must be in [0, 1]"));
            }
        }
        if self.finalize.position_precision < 0.0 {
            return fail("finalize.position_precision must not be negative");
        }
        Ok(())
    }

    /// Horizontal distance from the axis a die center may reach.
    pub fn max_radial_distance(&self) -> f32 {
        self.cage.radius - self.world.die_half_extent
    }
}
