//! Die bodies: pooled handles into the rigid body world plus plain snapshots
//! of their state.
//!
//! The world owns the actual rapier bodies; this module only describes a die
//! (which handles belong to it) and what the rest of the engine reads back.

mod body;

pub use body::{Die, DieState};
