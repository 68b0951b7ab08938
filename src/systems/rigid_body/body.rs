use glam::{Quat, Vec3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::domain::faces::{up_face, Face};

/// One of the three pooled dice.
#[derive(Clone, Copy, Debug)]
pub struct Die {
    /// Slot in the outcome triple.
    pub index: usize,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Snapshot of a die read back from the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DieState {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleeping: bool,
}

impl DieState {
    /// Face currently pointing up.
    pub fn up_face(&self) -> Face {
        up_face(self.orientation)
    }

    /// Distance from the cage axis in the horizontal plane.
    pub fn radial_distance(&self) -> f32 {
        Vec3::new(self.position.x, 0.0, self.position.z).length()
    }

    pub fn is_at_rest(&self) -> bool {
        self.linear_velocity == Vec3::ZERO && self.angular_velocity == Vec3::ZERO
    }
}
