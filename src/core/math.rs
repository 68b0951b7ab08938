//! Math glue between `glam` (engine logic) and `nalgebra` (rapier's types).
//!
//! All engine systems reason in `glam::Vec3` / `glam::Quat`; the rigid body
//! world converts at its boundary so nothing else needs to know rapier's
//! representation.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::{Point, Real, Rotation, Vector};

/// World up axis. Up-face evaluation and the cage both use +Y.
pub const UP: Vec3 = Vec3::Y;

#[inline]
pub fn to_na_vec(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_na_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_na_vec(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_na_rot(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_na_rot(r: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w).normalize()
}

/// Horizontal (XZ plane) component of a vector.
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Standard quadratic ease-out: fast start, gentle finish.
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Round to a fixed precision grid (e.g. `1e-3`). Non-positive precision is a no-op.
#[inline]
pub fn quantize(value: f32, precision: f32) -> f32 {
    if precision <= 0.0 {
        return value;
    }
    (value / precision).round() * precision
}

#[inline]
pub fn quantize_vec(v: Vec3, precision: f32) -> Vec3 {
    Vec3::new(
        quantize(v.x, precision),
        quantize(v.y, precision),
        quantize(v.z, precision),
    )
}

/// Clamp a vector's length. Non-finite vectors collapse to zero.
#[inline]
pub fn clamp_length_finite(v: Vec3, max: f32) -> Vec3 {
    if !v.is_finite() {
        return Vec3::ZERO;
    }
    v.clamp_length_max(max)
}
