use crate::core::GameObjectId;
use crate::physics::{BuiltBody, CollisionShape};
use nalgebra::Vector3;
use rapier3d::parry::bounding_volume::Aabb;
use rapier3d::prelude::*;
use std::collections::HashMap;

const EARTH_GRAVITY: f32 = 9.81;

/// Owning record for an inserted body, stored on its game object. Removing
/// it tears the body and collider out of the simulation; the shape record
/// travels with it so the bridge can re-derive and re-scale geometry.
#[derive(Debug)]
pub struct BodyHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub shape: CollisionShape,
}

/// The simulation world: the rapier set bundle plus the bridge's
/// between-step AABB cache.
///
/// Kinematic bodies only get their broad-phase volume refreshed during
/// [`PhysicsWorld::step`]; explicit moves in between go through
/// [`PhysicsWorld::update_single_aabb`].
pub struct PhysicsWorld {
    pub gravity: Vector3<f32>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub physics_hooks: (),
    pub event_handler: (),
    collider_bounds: HashMap<ColliderHandle, Aabb>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld {
            // Z is up in this engine.
            gravity: Vector3::new(0.0, 0.0, -EARTH_GRAVITY),
            rigid_body_set: RigidBodySet::default(),
            collider_set: ColliderSet::default(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::default(),
            island_manager: IslandManager::default(),
            broad_phase: DefaultBroadPhase::default(),
            narrow_phase: NarrowPhase::default(),
            impulse_joint_set: ImpulseJointSet::default(),
            multibody_joint_set: MultibodyJointSet::default(),
            ccd_solver: CCDSolver,
            physics_hooks: (),
            event_handler: (),
            collider_bounds: HashMap::new(),
        }
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        PhysicsWorld::default()
    }

    /// Advances the simulation by one fixed step and refreshes the whole
    /// AABB cache.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(), // no hooks
            &(), // no events
        );

        for (handle, collider) in self.collider_set.iter() {
            self.collider_bounds.insert(handle, collider.compute_aabb());
        }
    }

    /// Moves a built body into the world and stamps the owner id on both
    /// halves as the body → object back-reference.
    pub fn insert(&mut self, built: BuiltBody, owner: GameObjectId) -> BodyHandle {
        let BuiltBody {
            shape,
            mut body,
            mut collider,
        } = built;

        body.user_data = owner.as_ffi() as u128;
        collider.user_data = owner.as_ffi() as u128;

        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        if let Some(collider) = self.collider_set.get(collider_handle) {
            self.collider_bounds
                .insert(collider_handle, collider.compute_aabb());
        }

        BodyHandle {
            body: body_handle,
            collider: collider_handle,
            shape,
        }
    }

    /// Removes a body and its collider; called when the owning object is
    /// destroyed.
    pub fn remove(&mut self, handle: BodyHandle) {
        self.collider_bounds.remove(&handle.collider);
        self.rigid_body_set.remove(
            handle.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    #[inline]
    pub fn is_inserted(&self, handle: &BodyHandle) -> bool {
        self.rigid_body_set.contains(handle.body)
    }

    #[inline]
    pub fn body(&self, handle: &BodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle.body)
    }

    #[inline]
    pub fn body_mut(&mut self, handle: &BodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle.body)
    }

    #[inline]
    pub fn collider(&self, handle: &BodyHandle) -> Option<&Collider> {
        self.collider_set.get(handle.collider)
    }

    #[inline]
    pub fn collider_mut(&mut self, handle: &BodyHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle.collider)
    }

    /// Strongly wakes a body so the next steps re-examine it.
    pub fn wake(&mut self, handle: &BodyHandle) {
        self.wake_raw(handle.body);
    }

    pub(crate) fn wake_raw(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.wake_up(true);
        }
    }

    /// Recomputes the cached world AABB of one collider. Kinematic bodies
    /// need this after an explicit move; the integrator does not do it for
    /// them between steps.
    pub fn update_single_aabb(&mut self, handle: ColliderHandle) {
        if let Some(collider) = self.collider_set.get(handle) {
            self.collider_bounds.insert(handle, collider.compute_aabb());
        }
    }

    /// The cached world AABB of a body's collider, as of the last step or
    /// explicit refresh.
    pub fn collider_aabb(&self, handle: &BodyHandle) -> Option<Aabb> {
        self.collider_bounds.get(&handle.collider).copied()
    }
}
