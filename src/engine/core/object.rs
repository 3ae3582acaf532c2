use crate::assets::Mesh;
use crate::core::Transform;
use crate::physics::{BodyHandle, BodyType, BoundsType, BuiltBody, PhysicsWorld};
use slotmap::{Key, KeyData, SlotMap, new_key_type};
use std::sync::Arc;
use tracing::warn;

new_key_type! {
    /// Uniquely identifies a game object within a scene.
    pub struct GameObjectId;
}

impl GameObjectId {
    /// Stable integer form, used as the simulator-side back-reference
    /// (`user_data`) from a body to its owning object.
    #[inline]
    pub fn as_ffi(self) -> u64 {
        self.data().as_ffi()
    }

    #[inline]
    pub fn from_ffi(value: u64) -> Self {
        KeyData::from_ffi(value).into()
    }
}

/// A scene object as the physics bridge sees it.
///
/// The scene graph, contact detection and game logic own and mutate these;
/// the bridge reads the authoritative transform and the touching set, and
/// owns only the `body` record.
#[derive(Debug)]
pub struct GameObject {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Arc<Mesh>>,
    pub bounds: BoundsType,
    pub body_type: BodyType,
    pub mass: f32,
    pub body: Option<BodyHandle>,
    /// Objects currently in contact with this one. Populated by the contact
    /// detection pass, read-only here.
    pub touching: Vec<GameObjectId>,
}

impl GameObject {
    pub fn new(name: impl Into<String>) -> Self {
        GameObject {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            bounds: BoundsType::Box,
            body_type: BodyType::Static,
            mass: 1.0,
            body: None,
            touching: Vec::new(),
        }
    }

    /// The object transform shifted by the mesh centroid, in object space.
    ///
    /// Primitive colliders are sized from the mesh bounds, so an off-center
    /// mesh needs its collider placed at the bounds center rather than the
    /// mesh origin.
    pub fn bounds_transform(&self) -> Transform {
        let mut t = self.transform;
        if let Some(mesh) = &self.mesh {
            t.position += t.rotation * mesh.median.component_mul(&t.scale);
        }
        t
    }
}

/// Registry of live game objects.
///
/// Bodies reference their owner through a [`GameObjectId`] resolved here,
/// never through a pointer, so a destroyed object is observable instead of
/// dangling.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<GameObjectId, GameObject>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn spawn(&mut self, object: GameObject) -> GameObjectId {
        self.objects.insert(object)
    }

    #[inline]
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: GameObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameObjectId, &GameObject)> {
        self.objects.iter()
    }

    /// Inserts a freshly built body into the world and records the handle on
    /// its owner.
    pub fn attach_body(
        &mut self,
        physics: &mut PhysicsWorld,
        id: GameObjectId,
        built: BuiltBody,
    ) -> Option<&BodyHandle> {
        let handle = physics.insert(built, id);
        match self.objects.get_mut(id) {
            Some(object) => {
                if let Some(old) = object.body.replace(handle) {
                    warn!("object {:?} already had a body, replacing it", id);
                    physics.remove(old);
                }
                object.body.as_ref()
            }
            None => {
                warn!("attach_body on dead object {:?}", id);
                physics.remove(handle);
                None
            }
        }
    }

    /// Removes an object together with its body. The two always tear down
    /// at the same time; a body never outlives its owner.
    pub fn despawn(&mut self, physics: &mut PhysicsWorld, id: GameObjectId) {
        if let Some(mut object) = self.objects.remove(id)
            && let Some(handle) = object.body.take()
        {
            physics.remove(handle);
        }
    }

    /// Removes an object without touching the physics world. Exists for the
    /// scene loader's bulk teardown, where the whole world is dropped next.
    pub fn remove_raw(&mut self, id: GameObjectId) -> Option<GameObject> {
        self.objects.remove(id)
    }
}
