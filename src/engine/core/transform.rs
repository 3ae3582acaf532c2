use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

/// Stores the translation, rotation and scale of a game object.
///
/// The components are kept decomposed, so the scale-free rigid part the
/// simulator consumes is available without a matrix decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }

    /// The scale-free rigid transform.
    #[inline]
    pub fn isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Full affine matrix, scale included.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.isometry().to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    pub fn rotate(&mut self, rot: UnitQuaternion<f32>) {
        self.rotation = rot * self.rotation;
    }
}
