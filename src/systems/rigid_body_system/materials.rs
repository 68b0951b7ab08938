use rapier3d::prelude::{ContactModificationContext, PhysicsHooks};

use crate::domain::config::{ContactMaterial, MaterialsConfig};

/// Surface class stored in a collider's `user_data`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceClass {
    Die,
    Floor,
    Wall,
}

impl SurfaceClass {
    pub fn user_data(self) -> u128 {
        match self {
            SurfaceClass::Die => 1,
            SurfaceClass::Floor => 2,
            SurfaceClass::Wall => 3,
        }
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(SurfaceClass::Die),
            2 => Some(SurfaceClass::Floor),
            3 => Some(SurfaceClass::Wall),
            _ => None,
        }
    }
}

/// Per-pair contact materials.
///
/// Rapier combines per-collider coefficients, which cannot express three
/// independent pair classes, so the die colliders opt into solver contact
/// modification and the coefficients are overwritten here.
#[derive(Clone, Debug)]
pub struct ContactMaterials {
    die_die: ContactMaterial,
    die_floor: ContactMaterial,
    die_wall: ContactMaterial,
}

impl ContactMaterials {
    pub fn new(config: &MaterialsConfig) -> Self {
        Self {
            die_die: config.die_die,
            die_floor: config.die_floor,
            die_wall: config.die_wall,
        }
    }

    /// Material for a pair of surfaces. Pairs that never touch a die have none.
    pub fn lookup(&self, a: SurfaceClass, b: SurfaceClass) -> Option<ContactMaterial> {
        use SurfaceClass::*;
        match (a, b) {
            (Die, Die) => Some(self.die_die),
            (Die, Floor) | (Floor, Die) => Some(self.die_floor),
            (Die, Wall) | (Wall, Die) => Some(self.die_wall),
            _ => None,
        }
    }
}

impl PhysicsHooks for ContactMaterials {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let class = |handle| {
            context
                .colliders
                .get(handle)
                .and_then(|c| SurfaceClass::from_user_data(c.user_data))
        };
        let (Some(a), Some(b)) = (class(context.collider1), class(context.collider2)) else {
            return;
        };
        let Some(material) = self.lookup(a, b) else {
            return;
        };
        for contact in context.solver_contacts.iter_mut() {
            contact.friction = material.friction;
            contact.restitution = material.restitution;
        }
    }
}
