//! DiceWorld - the rigid body world the cup animation runs in.
//!
//! Wraps a rapier pipeline with three pooled dice, the static cup geometry
//! and per-pair contact materials. The world lives as long as the engine and
//! the dice keep their handles; a reset rebuilds the solver storage behind
//! them so no contact history survives into the next round. Everything above this layer talks in `glam` types through
//! [`DiceWorld`] accessors.

mod cage;
mod materials;
mod system;

pub use materials::{ContactMaterials, SurfaceClass};
pub use system::DiceWorld;
