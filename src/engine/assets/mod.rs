//! Mesh data consumed by the physics bridge.
//!
//! Meshes are produced and owned by the asset layer; this crate only reads
//! their buffers to derive collision geometry.

pub mod mesh;

pub use mesh::*;
