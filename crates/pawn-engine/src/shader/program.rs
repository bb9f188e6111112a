use std::path::Path;

use crate::error::ShaderError;
use crate::render::GraphicsBackend;

use super::{
    check_interface, compile_stage, load_shader_source, ProgramLayout, ShaderSource, Stage,
    UniformLocation,
};

/// A linked shader program plus its reflected attribute/uniform tables.
///
/// Created once at startup and kept for the lifetime of the renderer; the
/// backend program is released when this value is dropped.
pub struct ShaderProgram<B: GraphicsBackend> {
    raw: B::Program,
    layout: ProgramLayout,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    /// Compiles both stages, checks their interface, reflects, and links.
    ///
    /// Both stages are compiled before bailing so that every diagnostic is
    /// logged. Nothing is linked unless both stages compiled.
    pub fn create(gpu: &B, source: &ShaderSource) -> Result<Self, ShaderError> {
        let vertex = compile_stage(Stage::Vertex, &source.vertex);
        let fragment = compile_stage(Stage::Fragment, &source.fragment);
        let (vertex, fragment) = (vertex?, fragment?);

        check_interface(&vertex, &fragment).inspect_err(|e| log::error!("{e}"))?;
        let layout = ProgramLayout::reflect(&vertex, &fragment)?;

        let raw = gpu
            .link_program(vertex, fragment, &layout)
            .inspect_err(|e| log::error!("{e}"))?;

        log::info!(
            "shader program linked: {} attribute(s), {} uniform(s)",
            layout.attributes().len(),
            layout.uniforms().len()
        );

        Ok(Self { raw, layout })
    }

    /// Reads `path`, splits it into stages, and creates the program.
    pub fn load(gpu: &B, path: &Path) -> Result<Self, ShaderError> {
        let source = load_shader_source(path)?;
        Self::create(gpu, &source)
    }

    #[inline]
    pub fn raw(&self) -> &B::Program {
        &self.raw
    }

    #[inline]
    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    #[inline]
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.layout.attribute_location(name)
    }

    #[inline]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.layout.uniform_location(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::parse_shader;
    use crate::testing::{BackendEvent, RecordingBackend, TEST_SHADER};

    #[test]
    fn create_links_once_after_both_stages_compile() {
        let gpu = RecordingBackend::new();
        let program = ShaderProgram::create(&gpu, &parse_shader(TEST_SHADER).unwrap()).unwrap();

        assert_eq!(program.attribute_location("inPosition"), Some(0));
        assert!(program.uniform_location("transform").is_some());
        assert_eq!(gpu.events(), vec![BackendEvent::LinkProgram]);
    }

    #[test]
    fn compile_failure_never_reaches_link() {
        let gpu = RecordingBackend::new();
        let source = ShaderSource {
            vertex: "this is not wgsl".into(),
            fragment: "neither is this".into(),
        };

        let err = ShaderProgram::create(&gpu, &source).err().unwrap();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Vertex, .. }));
        assert!(gpu.events().is_empty());
    }

    #[test]
    fn fragment_failure_alone_aborts() {
        let gpu = RecordingBackend::new();
        let mut source = parse_shader(TEST_SHADER).unwrap();
        source.fragment.push_str("\nfn dangling(");

        let err = ShaderProgram::create(&gpu, &source).err().unwrap();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Fragment, .. }));
        assert!(gpu.events().is_empty());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let gpu = RecordingBackend::new();
        let err = ShaderProgram::load(&gpu, Path::new("/nope/pawn.shader")).err().unwrap();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
