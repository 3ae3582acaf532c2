//! The scene ⇄ simulation bridge, powered by `rapier`.
//!
//! Object creation goes through [`build_shape`]/[`build_body`] to produce a
//! body the caller inserts into the [`PhysicsWorld`]; per-frame transform
//! changes are pushed with [`update_body`]; duplication goes through
//! [`clone_body`]; and [`DebugDrawAdapter`] exposes the simulator's debug
//! geometry to a line renderer.

pub mod body;
pub mod debug_draw;
pub mod shape;
pub mod sync;
pub mod world;

pub use body::*;
pub use debug_draw::*;
pub use shape::*;
pub use sync::*;
pub use world::*;

pub use ::rapier3d;
