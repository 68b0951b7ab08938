use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Translation3};
use rapier3d::prelude::{
    ActiveHooks, BroadPhase, CCDSolver, ColliderBuilder, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBody, RigidBodyBuilder, RigidBodySet, Vector,
};

use crate::core::math::{from_na_rot, from_na_vec, to_na_rot, to_na_vec};
use crate::domain::config::EngineConfig;
use crate::domain::outcome::DICE_COUNT;
use crate::rigid_body::{Die, DieState};

use super::cage::build_cage;
use super::materials::{ContactMaterials, SurfaceClass};

/// Owns the rapier world: gravity, the three pooled dice, the static cup and
/// the per-pair contact materials.
pub struct DiceWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    materials: ContactMaterials,
    dice: [Die; DICE_COUNT],
    static_colliders: usize,
}

impl DiceWorld {
    pub fn new(config: &EngineConfig) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let static_colliders = build_cage(&config.cage, &config.materials, &mut colliders);

        let h = config.world.die_half_extent;
        let dice = std::array::from_fn(|index| {
            let x = (index as f32 - 1.0) * (h * 2.5);
            let mut body = RigidBodyBuilder::dynamic()
                .translation(Vector::new(x, config.cage.floor + h, 0.0))
                .linear_damping(config.world.linear_damping)
                .angular_damping(config.world.angular_damping)
                .ccd_enabled(true)
                .can_sleep(true)
                .build();
            body.activation_mut().linear_threshold = config.world.sleep_linear_threshold;
            body.activation_mut().angular_threshold = config.world.sleep_angular_threshold;
            let handle = bodies.insert(body);

            let collider = ColliderBuilder::cuboid(h, h, h)
                .density(config.world.die_density)
                .friction(config.materials.die_die.friction)
                .restitution(config.materials.die_die.restitution)
                .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
                .user_data(SurfaceClass::Die.user_data())
                .build();
            let collider = colliders.insert_with_parent(collider, handle, &mut bodies);

            Die { index, body: handle, collider }
        });

        let mut params = IntegrationParameters::default();
        params.dt = config.stepper.step_size;

        let mut world = Self {
            gravity: Vector::new(0.0, config.world.gravity, 0.0),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            materials: ContactMaterials::new(&config.materials),
            dice,
            static_colliders,
        };
        world.sleep_all();
        world
    }

    /// Rebuild the world from `config`: dice back on their resting line and
    /// asleep, with no contact, island or broad-phase state carried over from
    /// earlier steps.
    pub fn reset(&mut self, config: &EngineConfig) {
        *self = Self::new(config);
    }

    /// Advance the solver by exactly `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &self.materials,
            &(),
        );
    }

    pub fn dice(&self) -> &[Die; DICE_COUNT] {
        &self.dice
    }

    pub fn static_collider_count(&self) -> usize {
        self.static_colliders
    }

    pub fn body(&self, die: usize) -> &RigidBody {
        &self.bodies[self.dice[die].body]
    }

    pub fn body_mut(&mut self, die: usize) -> &mut RigidBody {
        &mut self.bodies[self.dice[die].body]
    }

    pub fn state(&self, die: usize) -> DieState {
        let body = self.body(die);
        DieState {
            position: from_na_vec(body.translation()),
            orientation: from_na_rot(body.rotation()),
            linear_velocity: from_na_vec(body.linvel()),
            angular_velocity: from_na_vec(body.angvel()),
            linear_damping: body.linear_damping(),
            angular_damping: body.angular_damping(),
            sleeping: body.is_sleeping(),
        }
    }

    /// Position and orientation only.
    pub fn pose(&self, die: usize) -> (Vec3, Quat) {
        let body = self.body(die);
        (from_na_vec(body.translation()), from_na_rot(body.rotation()))
    }

    pub fn states(&self) -> [DieState; DICE_COUNT] {
        std::array::from_fn(|die| self.state(die))
    }

    /// Teleport a die. Velocities are written as given; the body is not woken.
    pub fn set_pose(
        &mut self,
        die: usize,
        position: Vec3,
        orientation: Quat,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
    ) {
        let body = self.body_mut(die);
        let iso = Isometry3::from_parts(Translation3::from(to_na_vec(position)), to_na_rot(orientation));
        body.set_position(iso, false);
        body.set_linvel(to_na_vec(linear_velocity), false);
        body.set_angvel(to_na_vec(angular_velocity), false);
    }

    pub fn set_orientation(&mut self, die: usize, orientation: Quat) {
        let body = self.body_mut(die);
        let mut iso = *body.position();
        iso.rotation = to_na_rot(orientation);
        body.set_position(iso, false);
    }

    pub fn set_position(&mut self, die: usize, position: Vec3) {
        let body = self.body_mut(die);
        let mut iso = *body.position();
        iso.translation = Translation3::from(to_na_vec(position));
        body.set_position(iso, false);
    }

    pub fn set_velocities(&mut self, die: usize, linear: Vec3, angular: Vec3) {
        let body = self.body_mut(die);
        body.set_linvel(to_na_vec(linear), false);
        body.set_angvel(to_na_vec(angular), false);
    }

    pub fn set_damping(&mut self, die: usize, linear: f32, angular: f32) {
        let body = self.body_mut(die);
        body.set_linear_damping(linear);
        body.set_angular_damping(angular);
    }

    pub fn wake_all(&mut self) {
        for die in 0..DICE_COUNT {
            self.body_mut(die).wake_up(true);
        }
    }

    pub fn sleep_all(&mut self) {
        for die in 0..DICE_COUNT {
            self.body_mut(die).sleep();
        }
    }
}
