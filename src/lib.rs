pub mod engine;

pub use engine::*;

pub use ::nalgebra;
pub use ::tracing;
