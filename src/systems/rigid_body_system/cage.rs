use std::f32::consts::PI;

use rapier3d::prelude::{ColliderBuilder, ColliderSet, Vector};

use crate::domain::config::{CageConfig, MaterialsConfig};

use super::materials::SurfaceClass;

/// Builds the static cup: floor, ceiling and a prism of wall slabs whose inner
/// faces touch the cage circle. The prism corners leak slightly past the
/// circle; the boundary pass clamps what the walls miss.
pub(super) fn build_cage(
    cage: &CageConfig,
    materials: &MaterialsConfig,
    colliders: &mut ColliderSet,
) -> usize {
    let t = cage.wall_thickness * 0.5;
    let height = cage.ceiling - cage.floor;
    let mid_y = cage.floor + height * 0.5;
    // Slabs extend past the axis-aligned floor footprint so nothing slips through corners.
    let span = cage.radius + cage.wall_thickness;
    let mut count = 0;

    colliders.insert(
        ColliderBuilder::cuboid(span, t, span)
            .translation(Vector::new(0.0, cage.floor - t, 0.0))
            .friction(materials.die_floor.friction)
            .restitution(materials.die_floor.restitution)
            .user_data(SurfaceClass::Floor.user_data())
            .build(),
    );
    count += 1;

    colliders.insert(
        ColliderBuilder::cuboid(span, t, span)
            .translation(Vector::new(0.0, cage.ceiling + t, 0.0))
            .friction(materials.die_wall.friction)
            .restitution(materials.die_wall.restitution)
            .user_data(SurfaceClass::Wall.user_data())
            .build(),
    );
    count += 1;

    let segments = cage.wall_segments.max(3);
    // Half length of one polygon side, padded so neighbouring slabs overlap.
    let half_side = cage.radius * (PI / segments as f32).tan() + t;
    for i in 0..segments {
        let theta = 2.0 * PI * (i as f32) / (segments as f32);
        let center = cage.radius + t;
        colliders.insert(
            ColliderBuilder::cuboid(t, height * 0.5 + t, half_side)
                .translation(Vector::new(center * theta.cos(), mid_y, center * theta.sin()))
                // Local +X points outward along the slab normal.
                .rotation(Vector::new(0.0, -theta, 0.0))
                .friction(materials.die_wall.friction)
                .restitution(materials.die_wall.restitution)
                .user_data(SurfaceClass::Wall.user_data())
                .build(),
        );
        count += 1;
    }

    count
}
