use crate::core::{GameObjectId, Scene};
use crate::physics::{BoundsType, PhysicsWorld};

/// Full transform sync: position/orientation and scale.
pub fn update_body(scene: &mut Scene, physics: &mut PhysicsWorld, id: GameObjectId) {
    update_body_partial(scene, physics, id, true, true);
}

/// Pushes the authoritative scene transform of `id` into its body.
///
/// Kinematic bodies (static and sensor categories) produce no wake signal of
/// their own, so after a move their broad-phase volume is refreshed
/// explicitly and every object currently touching them is forced awake.
/// Non-kinematic bodies are simply reactivated themselves.
///
/// Objects without a body, or whose body is not inserted in the world, are
/// left untouched.
pub fn update_body_partial(
    scene: &mut Scene,
    physics: &mut PhysicsWorld,
    id: GameObjectId,
    update_pose: bool,
    update_scale: bool,
) {
    let Some(object) = scene.get_mut(id) else {
        return;
    };

    // Primitive colliders sit at the bounds center, so an off-center mesh
    // needs the bounds-adjusted transform. Mesh-derived colliders share the
    // mesh's own origin and follow the raw transform.
    let off_center = object.mesh.as_ref().is_some_and(|m| m.median.norm() != 0.0);
    let primitive = !matches!(
        object.bounds,
        BoundsType::TriangleMesh | BoundsType::ConvexHull
    );
    let transform = if update_pose && off_center && primitive {
        object.bounds_transform()
    } else {
        object.transform
    };

    let touching = object.touching.clone();

    let Some(handle) = object.body.as_mut() else {
        return;
    };

    if update_scale {
        handle.shape.set_local_scaling(transform.scale);
    }
    let new_shape = update_scale.then(|| handle.shape.shared());
    let (body_handle, collider_handle) = (handle.body, handle.collider);

    let pose = transform.isometry();

    let Some(body) = physics.rigid_body_set.get_mut(body_handle) else {
        // Built but not inserted; nothing to sync against yet.
        return;
    };

    if update_pose {
        body.set_position(pose, false);
        if body.is_kinematic() {
            // The motion-state side of the write; position-based kinematic
            // bodies consume this on the next step.
            body.set_next_kinematic_position(pose);
        }
    }
    let kinematic = body.is_kinematic();

    if let Some(collider) = physics.collider_set.get_mut(collider_handle) {
        if update_pose {
            // The step would propagate the body pose eventually; writing it
            // through keeps the explicit AABB refresh below accurate.
            collider.set_position(pose);
        }
        if let Some(shape) = new_shape {
            collider.set_shape(shape);
        }
    }

    if kinematic {
        physics.update_single_aabb(collider_handle);
        for other in touching {
            let Some(other_handle) = scene.get(other).and_then(|o| o.body.as_ref()) else {
                continue;
            };
            physics.wake(other_handle);
        }
    } else {
        physics.wake_raw(body_handle);
    }
}
