use nalgebra::{Point3, Vector2, Vector3};
use std::sync::Arc;

/// Packed render vertex. Position, normal and uv are laid out back to back,
/// so a vertex stream is a flat `f32` buffer with a stride of eight floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3D {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Vertex3D {
    pub fn basic(position: Vector3<f32>, uv: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Vertex3D {
            position,
            normal,
            uv,
        }
    }

    pub fn position_only(position: Vector3<f32>) -> Self {
        Vertex3D {
            position,
            normal: Vector3::zeros(),
            uv: Vector2::zeros(),
        }
    }
}

/// Shared vertex/index buffers, in the layout the renderer uploads.
///
/// Indices use the 16-bit render format. The conversion helpers below widen
/// and re-chunk them into what the simulator expects; they only borrow, the
/// buffers stay untouched for the next render pass.
#[derive(Debug, Clone)]
pub struct MeshVertexData {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u16>,
}

impl MeshVertexData {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u16>) -> Self {
        MeshVertexData { vertices, indices }
    }

    /// Triangle index triples in the simulator's native width.
    ///
    /// A mesh without an index buffer is treated as a raw triangle soup.
    pub fn make_triangle_indices(&self) -> Vec<[u32; 3]> {
        if self.indices.is_empty() {
            (0u32..self.vertices.len() as u32)
                .collect::<Vec<_>>()
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect()
        } else {
            self.indices
                .chunks_exact(3)
                .map(|c| [c[0] as u32, c[1] as u32, c[2] as u32])
                .collect()
        }
    }

    /// Stride-extracts the position components of every vertex.
    pub fn make_point_cloud(&self) -> Vec<Point3<f32>> {
        self.vertices.iter().map(|v| Point3::from(v.position)).collect()
    }
}

/// Geometry record handed over by the asset layer.
///
/// `dimensions` are the full axis-aligned extents of the vertex bounds and
/// `median` is the centroid offset from the mesh's local origin. Both are
/// baked at load time; the physics bridge never mutates a mesh.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub data: Arc<MeshVertexData>,
    pub dimensions: Vector3<f32>,
    pub median: Vector3<f32>,
}

impl Mesh {
    /// Builds a mesh and derives its extents and centroid from the vertex
    /// bounds.
    pub fn from_vertices(vertices: Vec<Vertex3D>, indices: Vec<u16>) -> Self {
        let (dimensions, median) = bounds_of(&vertices);
        Mesh {
            data: Arc::new(MeshVertexData::new(vertices, indices)),
            dimensions,
            median,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        if self.data.indices.is_empty() {
            self.vertex_count() / 3
        } else {
            self.data.indices.len() / 3
        }
    }

    /// Half of the full extents, the quantity primitive colliders are sized
    /// from.
    #[inline]
    pub fn half_extents(&self) -> Vector3<f32> {
        self.dimensions * 0.5
    }
}

fn bounds_of(vertices: &[Vertex3D]) -> (Vector3<f32>, Vector3<f32>) {
    let mut it = vertices.iter();
    let Some(first) = it.next() else {
        return (Vector3::zeros(), Vector3::zeros());
    };

    let mut min = first.position;
    let mut max = first.position;
    for v in it {
        min = min.inf(&v.position);
        max = max.sup(&v.position);
    }

    (max - min, (max + min) * 0.5)
}
