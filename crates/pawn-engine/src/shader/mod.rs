//! Shader program loading.
//!
//! A program is read from a single text file holding a vertex and a fragment
//! section (WGSL), split, compiled and validated stage by stage with `naga`,
//! reflected for attribute/uniform locations, then linked by the active
//! [`GraphicsBackend`](crate::render::GraphicsBackend).
//!
//! File format:
//! ```text
//! #shader vertex
//! ...vertex WGSL...
//! #shader fragment
//! ...fragment WGSL...
//! ```

mod compile;
mod layout;
mod program;
mod source;

pub use compile::{check_interface, compile_stage, CompiledStage, Stage};
pub use layout::{AttributeBinding, ProgramLayout, UniformBinding, UniformLocation};
pub use program::ShaderProgram;
pub use source::{load_shader_source, parse_shader, shader_path, ShaderSource, SHADER_DIR};
