use std::path::PathBuf;

use thiserror::Error;

use crate::shader::Stage;

/// Failures while loading, compiling, or linking a shader program.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader source has no {0} section")]
    MissingSection(Stage),

    #[error("failed to compile {stage} shader:\n{diagnostic}")]
    Compile { stage: Stage, diagnostic: String },

    #[error("{stage} shader declares no {stage} entry point")]
    MissingEntryPoint { stage: Stage },

    #[error("vertex attribute `{name}` must be vec3<f32>")]
    UnsupportedAttribute { name: String },

    #[error("uniform `{name}` must be mat4x4<f32>")]
    UnsupportedUniform { name: String },

    #[error("shader program declares no uniform named `{0}`")]
    MissingUniform(String),

    #[error("failed to link shader program: {diagnostic}")]
    Link { diagnostic: String },
}

/// Attribute arrays that break the triple/vertex-count invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("{attribute} array has {len} floats, not a multiple of 3")]
    NotTriples { attribute: &'static str, len: usize },

    #[error("{attribute} array holds {actual} vertices, positions hold {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}
