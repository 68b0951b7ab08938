//! Domain types: die faces, outcomes, engine configuration and errors.

pub mod config;
pub mod error;
pub mod faces;
pub mod outcome;
