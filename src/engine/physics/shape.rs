use crate::assets::Mesh;
use itertools::Either;
use nalgebra::Vector3;
use rapier3d::parry::shape::TriMeshBuilderError;
use rapier3d::prelude::*;
use snafu::{OptionExt, ResultExt, Snafu};
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use tracing::{trace, warn};

/// Collider geometry category, chosen per object in the scene data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsType {
    /// Static triangle mesh. Only linearly scalable, meant for immovable
    /// colliders.
    TriangleMesh,
    /// Convex hull over the mesh point cloud.
    ConvexHull,
    Sphere,
    Box,
    Cylinder,
    Capsule,
    Cone,
}

/// Stand-in half-extent for bodies cloned off mesh-less objects. Arbitrary,
/// kept for compatibility with existing scenes.
pub const FALLBACK_HALF_EXTENT: f32 = 0.25;

/// Subdivision count when a non-uniform scale turns a round shape into a
/// convex approximation.
const SCALE_SUBDIVS: u32 = 10;

#[derive(Debug, Snafu)]
pub enum ShapeError {
    #[snafu(display("The simulator rejected the triangle mesh: {source}"))]
    DegenerateTriangleMesh { source: TriMeshBuilderError },

    #[snafu(display("No convex hull could be computed from the mesh point cloud"))]
    DegenerateHull,
}

/// A collider's geometry together with the bridge-level state rapier does
/// not carry for us: the collision margin, the compound wrapper and the
/// current local scaling.
///
/// Each body owns exactly one record; records are never shared, since local
/// scaling is per-body mutable state.
#[derive(Clone)]
pub struct CollisionShape {
    leaf: SharedShape,
    /// Pose of the leaf inside the emitted shape. Identity for most leaves;
    /// cylinders and cones carry the rotation standing their canonical Y
    /// axis up along the engine's Z.
    leaf_pose: Isometry<f32>,
    leaf_margin: f32,
    compound: bool,
    scaling: Vector3<f32>,
}

impl CollisionShape {
    pub(crate) fn new(
        leaf: SharedShape,
        leaf_pose: Isometry<f32>,
        margin: f32,
        compound: bool,
    ) -> Self {
        CollisionShape {
            leaf,
            leaf_pose,
            leaf_margin: margin,
            compound,
            scaling: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Stand-in collider for logic-only objects without renderable geometry.
    pub(crate) fn fallback(margin: f32) -> Self {
        let leaf = SharedShape::cuboid(
            FALLBACK_HALF_EXTENT,
            FALLBACK_HALF_EXTENT,
            FALLBACK_HALF_EXTENT,
        );
        CollisionShape::new(leaf, Isometry::identity(), margin, false)
    }

    /// The effective margin of this shape. A compound wrapper always reports
    /// 0; the real margin lives on the wrapped child.
    #[inline]
    pub fn margin(&self) -> f32 {
        if self.compound { 0.0 } else { self.leaf_margin }
    }

    /// The margin of the wrapped geometry itself.
    #[inline]
    pub fn leaf_margin(&self) -> f32 {
        self.leaf_margin
    }

    #[inline]
    pub fn is_compound(&self) -> bool {
        self.compound
    }

    /// Unscaled base geometry.
    #[inline]
    pub fn leaf(&self) -> &SharedShape {
        &self.leaf
    }

    #[inline]
    pub fn local_scaling(&self) -> Vector3<f32> {
        self.scaling
    }

    pub fn set_local_scaling(&mut self, scaling: Vector3<f32>) {
        self.scaling = scaling;
    }

    /// The shape actually handed to the simulator: the leaf under the
    /// current local scaling, wrapped as the sole child of a compound
    /// whenever the compound flag is set or the leaf carries a non-identity
    /// pose.
    pub fn shared(&self) -> SharedShape {
        let leaf = self.scaled_leaf();
        if self.compound || self.leaf_pose != Isometry::identity() {
            SharedShape::compound(vec![(self.leaf_pose, leaf)])
        } else {
            leaf
        }
    }

    fn scaled_leaf(&self) -> SharedShape {
        if self.scaling == Vector3::new(1.0, 1.0, 1.0) {
            return self.leaf.clone();
        }
        // The scaling is given in engine space; rotate it into the leaf's
        // canonical frame before applying it.
        let scale = (self.leaf_pose.rotation.inverse() * self.scaling).abs();
        match scale_shape(&self.leaf, &scale) {
            Some(scaled) => scaled,
            None => {
                warn!(
                    "shape {:?} does not support scaling by {:?}, keeping it unscaled",
                    self.leaf.shape_type(),
                    self.scaling
                );
                self.leaf.clone()
            }
        }
    }
}

impl fmt::Debug for CollisionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionShape")
            .field("shape", &self.leaf.shape_type())
            .field("margin", &self.leaf_margin)
            .field("compound", &self.compound)
            .field("scaling", &self.scaling)
            .finish()
    }
}

/// Derives a collision shape from mesh geometry.
///
/// Primitive bounds are sized from the mesh half-extents; mesh bounds use
/// the index/vertex buffers directly. Convex hulls and cones carry half the
/// configured margin. With `compound` set, the shape is returned wrapped in
/// a single-child compound whose own margin is forced to 0.
pub fn build_shape(
    mesh: &Mesh,
    bounds: BoundsType,
    margin: f32,
    compound: bool,
) -> Result<CollisionShape, ShapeError> {
    let mut margin = margin;
    let mut pose = Isometry::identity();
    let d = mesh.half_extents();

    let leaf = match bounds {
        BoundsType::TriangleMesh => {
            let points = mesh.data.make_point_cloud();
            let triangles = mesh.data.make_triangle_indices();
            SharedShape::trimesh(points, triangles).context(DegenerateTriangleMeshSnafu)?
        }
        BoundsType::ConvexHull => {
            margin *= 0.5;
            let points = mesh.data.make_point_cloud();
            SharedShape::convex_hull(&points).context(DegenerateHullSnafu)?
        }
        BoundsType::Sphere => SharedShape::ball(d.x.max(d.y).max(d.z)),
        BoundsType::Box => SharedShape::cuboid(d.x, d.y, d.z),
        BoundsType::Cylinder => {
            pose = upright();
            SharedShape::cylinder(d.z, d.x.max(d.y))
        }
        BoundsType::Capsule => {
            let radius = d.x.max(d.y);
            let height = (d.z - radius) * 2.0;
            SharedShape::capsule_z(height * 0.5, radius)
        }
        BoundsType::Cone => {
            margin *= 0.5;
            pose = upright();
            SharedShape::cone(d.z, d.x.max(d.y))
        }
    };

    trace!(
        "built {:?} collider from {} vertices, margin {}",
        bounds,
        mesh.vertex_count(),
        margin
    );

    Ok(CollisionShape::new(leaf, pose, margin, compound))
}

/// Parry builds cylinders and cones around the Y axis; the engine is Z-up.
fn upright() -> Isometry<f32> {
    Isometry::rotation(Vector3::x() * FRAC_PI_2)
}

/// Applies a (possibly non-uniform) scale to a shape we built. Round shapes
/// fall back to a convex approximation when the scale breaks their symmetry.
fn scale_shape(shape: &SharedShape, scale: &Vector3<f32>) -> Option<SharedShape> {
    let scaled = match shape.as_typed_shape() {
        TypedShape::Ball(b) => match b.scaled(scale, SCALE_SUBDIVS)? {
            Either::Left(ball) => SharedShape::new(ball),
            Either::Right(convex) => SharedShape::new(convex),
        },
        TypedShape::Cuboid(c) => SharedShape::new(c.scaled(scale)),
        TypedShape::Capsule(c) => match c.scaled(scale, SCALE_SUBDIVS)? {
            Either::Left(capsule) => SharedShape::new(capsule),
            Either::Right(convex) => SharedShape::new(convex),
        },
        TypedShape::Cylinder(c) => match c.scaled(scale, SCALE_SUBDIVS)? {
            Either::Left(cylinder) => SharedShape::new(cylinder),
            Either::Right(convex) => SharedShape::new(convex),
        },
        TypedShape::Cone(c) => match c.scaled(scale, SCALE_SUBDIVS)? {
            Either::Left(cone) => SharedShape::new(cone),
            Either::Right(convex) => SharedShape::new(convex),
        },
        TypedShape::TriMesh(t) => SharedShape::new(t.clone().scaled(scale)),
        TypedShape::ConvexPolyhedron(c) => SharedShape::new(c.clone().scaled(scale)?),
        _ => return None,
    };
    Some(scaled)
}
