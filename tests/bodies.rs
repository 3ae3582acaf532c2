use ballast::assets::{Mesh, Vertex3D};
use ballast::core::{GameObject, Scene};
use ballast::nalgebra::Vector3;
use ballast::physics::{
    BodyType, BoundsType, CloneError, CollisionFlags, FALLBACK_HALF_EXTENT, PhysicsConfig,
    PhysicsWorld, build_body, clone_body,
};
use std::sync::Arc;

fn box_mesh(hx: f32, hy: f32, hz: f32) -> Mesh {
    let mut vertices = Vec::with_capacity(8);
    for i in 0..8u16 {
        let x = if i & 1 == 0 { -hx } else { hx };
        let y = if i & 2 == 0 { -hy } else { hy };
        let z = if i & 4 == 0 { -hz } else { hz };
        vertices.push(Vertex3D::position_only(Vector3::new(x, y, z)));
    }
    let indices: Vec<u16> = vec![
        0, 1, 2, 2, 1, 3, 4, 6, 5, 5, 6, 7, 0, 4, 1, 1, 4, 5, 2, 3, 6, 6, 3, 7, 0, 2, 4, 4, 2, 6,
        1, 5, 3, 3, 5, 7,
    ];
    Mesh::from_vertices(vertices, indices)
}

fn spawn_with_body(
    scene: &mut Scene,
    physics: &mut PhysicsWorld,
    body_type: BodyType,
    config: &PhysicsConfig,
    with_mesh: bool,
) -> ballast::core::GameObjectId {
    let mesh = box_mesh(1.0, 1.0, 1.0);
    let mut object = GameObject::new("test object");
    object.body_type = body_type;
    object.bounds = BoundsType::Box;
    if with_mesh {
        object.mesh = Some(Arc::new(mesh.clone()));
    }
    let id = scene.spawn(object);

    let built = build_body(&mesh, body_type, BoundsType::Box, config).unwrap();
    scene.attach_body(physics, id, built).unwrap();
    id
}

fn live_flags(scene: &Scene, physics: &PhysicsWorld, id: ballast::core::GameObjectId) -> CollisionFlags {
    let handle = scene.get(id).unwrap().body.as_ref().unwrap();
    CollisionFlags::of(
        physics.body(handle).unwrap(),
        physics.collider(handle).unwrap(),
    )
}

#[test]
fn sensor_bodies_are_kinematic_and_contactless() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let id = spawn_with_body(
        &mut scene,
        &mut physics,
        BodyType::Sensor,
        &PhysicsConfig::default(),
        true,
    );

    assert_eq!(
        live_flags(&scene, &physics, id),
        CollisionFlags::KINEMATIC | CollisionFlags::NO_CONTACT_RESPONSE
    );
}

#[test]
fn static_bodies_are_kinematic_with_contact_response() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let id = spawn_with_body(
        &mut scene,
        &mut physics,
        BodyType::Static,
        &PhysicsConfig::default(),
        true,
    );

    assert_eq!(live_flags(&scene, &physics, id), CollisionFlags::KINEMATIC);
}

#[test]
fn ghost_adds_no_contact_response() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let config = PhysicsConfig {
        ghost: true,
        ..Default::default()
    };

    let stat = spawn_with_body(&mut scene, &mut physics, BodyType::Static, &config, true);
    let dynamic = spawn_with_body(&mut scene, &mut physics, BodyType::Dynamic, &config, true);

    assert_eq!(
        live_flags(&scene, &physics, stat),
        CollisionFlags::KINEMATIC | CollisionFlags::NO_CONTACT_RESPONSE
    );
    assert_eq!(
        live_flags(&scene, &physics, dynamic),
        CollisionFlags::NO_CONTACT_RESPONSE
    );
}

#[test]
fn dynamic_bodies_lock_rotation_rigid_bodies_do_not() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let config = PhysicsConfig::default();

    let dynamic = spawn_with_body(&mut scene, &mut physics, BodyType::Dynamic, &config, true);
    let rigid = spawn_with_body(&mut scene, &mut physics, BodyType::RigidBody, &config, true);

    assert_eq!(live_flags(&scene, &physics, dynamic), CollisionFlags::empty());
    assert_eq!(live_flags(&scene, &physics, rigid), CollisionFlags::empty());

    let dyn_handle = scene.get(dynamic).unwrap().body.as_ref().unwrap();
    let dyn_body = physics.body(dyn_handle).unwrap();
    assert!(dyn_body.is_dynamic());
    assert_eq!(dyn_body.is_rotation_locked(), [true, true, true]);

    let rigid_handle = scene.get(rigid).unwrap().body.as_ref().unwrap();
    let rigid_body = physics.body(rigid_handle).unwrap();
    assert!(rigid_body.is_dynamic());
    assert_eq!(rigid_body.is_rotation_locked(), [false, false, false]);
}

#[test]
fn material_and_mass_come_from_the_config() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let config = PhysicsConfig {
        mass: 5.0,
        restitution: 0.3,
        friction: 0.8,
        margin: 0.02,
        ..Default::default()
    };

    let id = spawn_with_body(&mut scene, &mut physics, BodyType::RigidBody, &config, true);
    let handle = scene.get(id).unwrap().body.as_ref().unwrap();

    let collider = physics.collider(handle).unwrap();
    assert_eq!(collider.restitution(), 0.3);
    assert_eq!(collider.friction(), 0.8);
    assert_eq!(collider.contact_skin(), 0.02);

    let body = physics.body(handle).unwrap();
    assert!((body.mass() - 5.0).abs() < 1e-4);
}

#[test]
fn compound_bodies_carry_zero_contact_skin() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let config = PhysicsConfig {
        compound: true,
        margin: 0.04,
        ..Default::default()
    };

    let id = spawn_with_body(&mut scene, &mut physics, BodyType::Static, &config, true);
    let handle = scene.get(id).unwrap().body.as_ref().unwrap();

    assert_eq!(physics.collider(handle).unwrap().contact_skin(), 0.0);
    assert_eq!(handle.shape.leaf_margin(), 0.04);
}

#[test]
fn clone_copies_live_values_not_the_original_config() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let id = spawn_with_body(
        &mut scene,
        &mut physics,
        BodyType::Static,
        &PhysicsConfig::default(),
        true,
    );

    // Mutate material and flags at runtime, past the original config.
    {
        let handle = scene.get(id).unwrap().body.as_ref().unwrap();
        let collider_handle = handle.collider;
        let collider = physics.collider_set.get_mut(collider_handle).unwrap();
        collider.set_friction(0.9);
        collider.set_restitution(0.25);
        collider.set_sensor(true);
    }
    scene.get_mut(id).unwrap().mass = 3.0;

    let source = scene.get(id).unwrap().body.as_ref().unwrap();
    let cloned = clone_body(&scene, &physics, source).unwrap();

    assert_eq!(cloned.collider.friction(), 0.9);
    assert_eq!(cloned.collider.restitution(), 0.25);
    assert!(cloned.collider.is_sensor());
    assert!(cloned.body.is_kinematic());

    // Same geometry, distinct instance.
    let src_cuboid = source.shape.leaf().as_cuboid().copied().unwrap();
    let new_cuboid = cloned.shape.leaf().as_cuboid().copied().unwrap();
    assert_eq!(src_cuboid.half_extents, new_cuboid.half_extents);
    assert!(!Arc::ptr_eq(&source.shape.leaf().0, &cloned.shape.leaf().0));
}

#[test]
fn clone_of_meshless_owner_falls_back_to_small_box() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();
    let id = spawn_with_body(
        &mut scene,
        &mut physics,
        BodyType::Dynamic,
        &PhysicsConfig::default(),
        false,
    );

    let source = scene.get(id).unwrap().body.as_ref().unwrap();
    let cloned = clone_body(&scene, &physics, source).unwrap();

    let cuboid = cloned.shape.leaf().as_cuboid().copied().unwrap();
    assert_eq!(
        cuboid.half_extents,
        Vector3::new(
            FALLBACK_HALF_EXTENT,
            FALLBACK_HALF_EXTENT,
            FALLBACK_HALF_EXTENT
        )
    );
    // Angular lock is carried over from the live source body.
    assert_eq!(cloned.body.is_rotation_locked(), [true, true, true]);
}

#[test]
fn clone_with_dead_owner_fails() {
    let mut scene = Scene::new();
    let mut physics = PhysicsWorld::new();

    let mesh = box_mesh(1.0, 1.0, 1.0);
    let object = GameObject::new("short lived");
    let id = scene.spawn(object);
    let built = build_body(
        &mesh,
        BodyType::Static,
        BoundsType::Box,
        &PhysicsConfig::default(),
    )
    .unwrap();
    let handle = physics.insert(built, id);

    scene.remove_raw(id);

    let err = clone_body(&scene, &physics, &handle).unwrap_err();
    assert!(matches!(err, CloneError::OwnerGone));
}
