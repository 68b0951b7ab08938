//! Die face layout and orientation math.
//!
//! Each die carries the same fixed local-to-face map: six unit axes, one per
//! face value, with opposite faces summing to 7. The up-face of a die is the
//! face whose world-space normal has the largest dot product with `UP`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::math::UP;

use super::error::EngineError;

/// A single face value in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(value: u8) -> Result<Self, EngineError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Face(value))
        } else {
            Err(EngineError::InvalidFace(value))
        }
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Every face, lowest first.
    pub fn all() -> impl Iterator<Item = Face> {
        (Self::MIN..=Self::MAX).map(Face)
    }

    /// Local outward normal of this face.
    pub fn local_normal(self) -> Vec3 {
        FACE_NORMALS
            .iter()
            .find(|(face, _)| *face == self.0)
            .map(|(_, normal)| *normal)
            .unwrap_or(Vec3::Y)
    }
}

impl TryFrom<u8> for Face {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.0
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local face normals (face value, outward axis).
pub const FACE_NORMALS: [(u8, Vec3); 6] = [
    (1, Vec3::Y),
    (6, Vec3::NEG_Y),
    (2, Vec3::X),
    (5, Vec3::NEG_X),
    (3, Vec3::Z),
    (4, Vec3::NEG_Z),
];

/// Face currently pointing up for a die with the given world orientation.
pub fn up_face(orientation: Quat) -> Face {
    let mut best = (1u8, f32::NEG_INFINITY);
    for (face, normal) in FACE_NORMALS.iter() {
        let d = (orientation * *normal).dot(UP);
        if d > best.1 {
            best = (*face, d);
        }
    }
    Face(best.0)
}

/// How closely the die's up-face normal aligns with `UP` (1.0 = flat on a face).
pub fn up_alignment(orientation: Quat) -> f32 {
    let face = up_face(orientation);
    (orientation * face.local_normal()).dot(UP)
}

/// Orientation that puts `face` up, reached by the smallest rotation from
/// `current`; heading about `UP` is preserved.
pub fn target_orientation(current: Quat, face: Face) -> Quat {
    let current = current.normalize();
    let world_normal = (current * face.local_normal()).normalize();
    let correction = Quat::from_rotation_arc(world_normal, UP);
    (correction * current).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::EulerRot;

    #[test]
    fn opposite_faces_sum_to_seven() {
        for (face, normal) in FACE_NORMALS.iter() {
            let opposite = FACE_NORMALS
                .iter()
                .find(|(_, n)| (*n + *normal).length() < 1e-6)
                .map(|(f, _)| *f)
                .unwrap();
            assert_eq!(face + opposite, 7);
        }
    }

    #[test]
    fn face_rejects_out_of_range() {
        assert!(Face::new(0).is_err());
        assert!(Face::new(7).is_err());
        assert_eq!(Face::new(4).unwrap().value(), 4);
    }

    #[test]
    fn identity_shows_one() {
        assert_eq!(up_face(Quat::IDENTITY).value(), 1);
    }

    #[test]
    fn target_orientation_places_every_face_up_from_any_start() {
        let starts = [
            Quat::IDENTITY,
            Quat::from_euler(EulerRot::XYZ, 0.4, 1.3, -2.2),
            Quat::from_euler(EulerRot::XYZ, std::f32::consts::PI, 0.0, 0.0),
            Quat::from_euler(EulerRot::YXZ, -0.9, 2.7, 0.1),
        ];
        for start in starts {
            for face in Face::all() {
                let q = target_orientation(start, face);
                assert_eq!(up_face(q), face, "start {start:?} face {face}");
                assert!(up_alignment(q) > 0.9999);
            }
        }
    }

    #[test]
    fn target_orientation_is_identity_when_already_up() {
        let start = Quat::from_rotation_y(0.8);
        let q = target_orientation(start, Face::new(1).unwrap());
        assert!(q.dot(start).abs() > 0.9999);
    }
}
