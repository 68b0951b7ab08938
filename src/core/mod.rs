//! Core helpers shared by every system: math conversions at the solver seam
//! and the easing/quantization functions the session pipeline uses.

pub mod math;
