//! Pawn engine crate.
//!
//! Tessellates simple solids, uploads them to the GPU, and draws them through
//! a shader program loaded from a dual-section WGSL file. The platform side
//! (window, event loop, surface) is a thin layer over `winit` and `wgpu`.

pub mod core;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use error::{MeshError, ShaderError};
