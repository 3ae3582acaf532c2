//! Core data structures used throughout the bridge.
//!
//! This includes game objects, their transforms and the scene registry the
//! physics layer resolves object ids against.

pub mod object;
pub mod transform;

pub use object::*;
pub use transform::*;
