use crate::assets::Mesh;
use crate::core::{GameObjectId, Scene};
use crate::physics::{BodyHandle, BoundsType, CollisionShape, PhysicsWorld, ShapeError, build_shape};
use bitflags::bitflags;
use rapier3d::prelude::*;
use snafu::{OptionExt, Snafu};
use tracing::trace;

/// Simulation category of a body. Decides collision flags and the angular
/// motion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Immovable from the simulator's point of view; position driven by the
    /// scene, collides against dynamic bodies.
    Static,
    /// Simulated linear motion only. Orientation stays externally driven,
    /// so the angular factor is forced to zero.
    Dynamic,
    /// Fully simulated, rotation included.
    RigidBody,
    /// Detects overlap without being moved by or obstructing collisions.
    /// Position driven externally.
    Sensor,
}

/// Per-object physics settings, snapshotted at body creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub margin: f32,
    pub compound: bool,
    pub mass: f32,
    /// Keep the body out of contact response entirely.
    pub ghost: bool,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            margin: 0.04,
            compound: false,
            mass: 1.0,
            ghost: false,
            restitution: 0.0,
            friction: 0.5,
        }
    }
}

bitflags! {
    /// Bridge-level view of a body's collision behavior. Never stored;
    /// always derived from the live simulator state so reads reflect any
    /// runtime mutation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CollisionFlags: u8 {
        /// Position driven externally, not by the integrator.
        const KINEMATIC = 1;
        /// Overlap reported, contacts not resolved.
        const NO_CONTACT_RESPONSE = 1 << 1;
    }
}

impl CollisionFlags {
    /// The flag policy applied at construction time.
    pub fn for_body_type(body_type: BodyType, ghost: bool) -> Self {
        match body_type {
            BodyType::Sensor => CollisionFlags::KINEMATIC | CollisionFlags::NO_CONTACT_RESPONSE,
            BodyType::Static if ghost => {
                CollisionFlags::KINEMATIC | CollisionFlags::NO_CONTACT_RESPONSE
            }
            BodyType::Static => CollisionFlags::KINEMATIC,
            BodyType::Dynamic | BodyType::RigidBody if ghost => CollisionFlags::NO_CONTACT_RESPONSE,
            BodyType::Dynamic | BodyType::RigidBody => CollisionFlags::empty(),
        }
    }

    /// Reads the flags back off a live body and its collider.
    pub fn of(body: &RigidBody, collider: &Collider) -> Self {
        let mut flags = CollisionFlags::empty();
        if body.is_kinematic() {
            flags |= CollisionFlags::KINEMATIC;
        }
        if collider.is_sensor() {
            flags |= CollisionFlags::NO_CONTACT_RESPONSE;
        }
        flags
    }
}

/// A body ready for insertion into the [`PhysicsWorld`]. The caller owns
/// inserting it and wiring up the owning object.
#[derive(Debug)]
pub struct BuiltBody {
    pub shape: CollisionShape,
    pub body: RigidBody,
    pub collider: Collider,
}

#[derive(Debug, Snafu)]
pub enum CloneError {
    #[snafu(display("The source body is no longer in the simulation world"))]
    BodyRemoved,

    #[snafu(display("The body's owning object is no longer alive"))]
    OwnerGone,

    #[snafu(transparent)]
    Shape { source: ShapeError },
}

/// Builds a rigid body from a mesh, a body category and a physics config.
///
/// The shape comes from [`build_shape`] with the config's margin and
/// compound flag; the local inertia is derived by the simulator from the
/// shape and the configured mass (mass 0 yields an immovable body). The
/// motion state starts at the identity.
pub fn build_body(
    mesh: &Mesh,
    body_type: BodyType,
    bounds: BoundsType,
    config: &PhysicsConfig,
) -> Result<BuiltBody, ShapeError> {
    let shape = build_shape(mesh, bounds, config.margin, config.compound)?;
    let flags = CollisionFlags::for_body_type(body_type, config.ghost);

    let spin = body_type != BodyType::Dynamic;

    trace!("building {:?} body with {:?}", body_type, flags);

    Ok(assemble(
        shape,
        flags,
        [spin; 3],
        config.mass,
        config.restitution,
        config.friction,
    ))
}

/// Rebuilds an equivalent body for a duplicated game object.
///
/// Geometry is re-derived rather than shared: mass and bounds category come
/// from the live owning object (they may have mutated since creation), the
/// margin and compound flag from the source shape record, and flags,
/// rotation locks, restitution and friction from the live source body. An
/// owner without renderable geometry gets the fixed fallback box.
pub fn clone_body(
    scene: &Scene,
    physics: &PhysicsWorld,
    source: &BodyHandle,
) -> Result<BuiltBody, CloneError> {
    let src_body = physics.body(source).context(BodyRemovedSnafu)?;
    let src_collider = physics.collider(source).context(BodyRemovedSnafu)?;

    let owner_id = GameObjectId::from_ffi(src_collider.user_data as u64);
    let owner = scene.get(owner_id).context(OwnerGoneSnafu)?;

    // A compound source reports margin 0 here, so its clone re-derives with
    // margin 0 as well. Long-standing behavior, kept as is.
    let margin = source.shape.margin();
    let compound = source.shape.is_compound();

    let shape = match &owner.mesh {
        Some(mesh) => build_shape(mesh, owner.bounds, margin, compound)?,
        None => CollisionShape::fallback(margin),
    };

    let locked = src_body.is_rotation_locked();

    Ok(assemble(
        shape,
        CollisionFlags::of(src_body, src_collider),
        [!locked[0], !locked[1], !locked[2]],
        owner.mass,
        src_collider.restitution(),
        src_collider.friction(),
    ))
}

fn assemble(
    shape: CollisionShape,
    flags: CollisionFlags,
    rotations_enabled: [bool; 3],
    mass: f32,
    restitution: f32,
    friction: f32,
) -> BuiltBody {
    let builder = if flags.contains(CollisionFlags::KINEMATIC) {
        RigidBodyBuilder::kinematic_position_based()
    } else {
        RigidBodyBuilder::dynamic()
    };
    let body = builder
        .enabled_rotations(
            rotations_enabled[0],
            rotations_enabled[1],
            rotations_enabled[2],
        )
        .build();

    let collider = ColliderBuilder::new(shape.shared())
        .mass(mass)
        .contact_skin(shape.margin())
        .restitution(restitution)
        .friction(friction)
        .sensor(flags.contains(CollisionFlags::NO_CONTACT_RESPONSE))
        .build();

    BuiltBody {
        shape,
        body,
        collider,
    }
}
