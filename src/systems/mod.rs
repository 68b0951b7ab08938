//! Per-step systems. Each one is a free function over the dice world and the
//! engine config; the session pipeline decides when each runs.

pub mod boundary;
pub mod finalize;
pub mod guidance;
pub mod integrator;
pub mod rigid_body;
pub mod rigid_body_system;
pub mod shake;
