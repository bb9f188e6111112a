//! GPU rendering subsystem.
//!
//! `GraphicsBackend` and `DrawPass` are the only way the scene reaches the
//! GPU. The wgpu implementation lives next to them; `SceneRenderer` drives
//! one frame on top of it.
//!
//! Convention:
//! - every vertex attribute is a tightly packed `vec3<f32>` buffer
//! - every uniform is a `mat4x4<f32>` in its own bind group
//! - clip space depth is `[0, 1]`; shaders remap from `[-1, 1]` themselves

mod backend;
mod scene_renderer;
mod target;
mod wgpu_backend;
mod wgpu_pass;

pub use backend::{AttributeScope, DrawPass, GraphicsBackend};
pub use scene_renderer::SceneRenderer;
pub use target::RenderTarget;
pub use wgpu_backend::{WgpuBackend, WgpuBuffer, WgpuProgram, WgpuUniform, DEPTH_FORMAT};
pub use wgpu_pass::WgpuPass;
