use glam::Mat4;

use crate::error::ShaderError;
use crate::shader::{CompiledStage, ProgramLayout, UniformLocation};

/// Graphics API seam used by the scene.
///
/// Shapes, rotations, and programs only talk to the GPU through this trait:
/// buffer and uniform creation here, draw-time binding through [`DrawPass`].
/// Owned handles (`Buffer`, `Uniform`, `Program`) release their GPU resource
/// when dropped.
pub trait GraphicsBackend {
    /// Vertex attribute buffer holding `f32` triples.
    type Buffer;
    /// A `mat4x4<f32>` uniform slot.
    type Uniform;
    /// A linked program.
    type Program;

    /// Uploads `data` into a new vertex buffer.
    fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> Self::Buffer;

    /// Creates a uniform slot at `location` of `program`, initialised to `value`.
    ///
    /// Fails with [`ShaderError::MissingUniform`] if `program` has nothing
    /// bound at `location`.
    fn create_uniform(
        &self,
        program: &Self::Program,
        location: UniformLocation,
        value: &Mat4,
    ) -> Result<Self::Uniform, ShaderError>;

    /// Overwrites the contents of `uniform`.
    fn write_uniform(&self, uniform: &Self::Uniform, value: &Mat4);

    /// Links two compiled stages into a program.
    ///
    /// The stages are consumed; whatever intermediate objects the backend
    /// builds from them are released once the program exists.
    fn link_program(
        &self,
        vertex: CompiledStage,
        fragment: CompiledStage,
        layout: &ProgramLayout,
    ) -> Result<Self::Program, ShaderError>;
}

/// Draw-time binding state of one pass.
///
/// Mirrors the classic enable/bind/draw/disable sequence. Attribute and
/// uniform bindings are not expected to survive a `draw_triangles` call;
/// wrap attribute handling in [`AttributeScope`] so they are released.
pub trait DrawPass<B: GraphicsBackend> {
    fn enable_attribute(&mut self, location: u32, buffer: &B::Buffer);
    fn disable_attribute(&mut self, location: u32);
    fn bind_uniform(&mut self, location: UniformLocation, uniform: &B::Uniform);
    fn draw_triangles(&mut self, vertex_count: u32);
}

/// Scoped attribute bindings on a [`DrawPass`].
///
/// Every attribute enabled through the scope is disabled again when the
/// scope is dropped, in reverse order.
pub struct AttributeScope<'a, B: GraphicsBackend> {
    pass: &'a mut dyn DrawPass<B>,
    enabled: Vec<u32>,
}

impl<'a, B: GraphicsBackend> AttributeScope<'a, B> {
    #[inline]
    pub fn new(pass: &'a mut dyn DrawPass<B>) -> Self {
        Self {
            pass,
            enabled: Vec::with_capacity(3),
        }
    }

    pub fn enable(&mut self, location: u32, buffer: &B::Buffer) {
        self.pass.enable_attribute(location, buffer);
        self.enabled.push(location);
    }

    #[inline]
    pub fn draw_triangles(&mut self, vertex_count: u32) {
        self.pass.draw_triangles(vertex_count);
    }
}

impl<B: GraphicsBackend> Drop for AttributeScope<'_, B> {
    fn drop(&mut self) {
        while let Some(location) = self.enabled.pop() {
            self.pass.disable_attribute(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PassEvent, RecordingBackend, RecordingPass};

    #[test]
    fn scope_disables_in_reverse_order() {
        let gpu = RecordingBackend::new();
        let a = gpu.create_vertex_buffer("a", &[0.0; 3]);
        let b = gpu.create_vertex_buffer("b", &[0.0; 3]);
        let mut pass = RecordingPass::default();

        {
            let mut scope = AttributeScope::<RecordingBackend>::new(&mut pass);
            scope.enable(0, &a);
            scope.enable(2, &b);
            scope.draw_triangles(1);
        }

        assert_eq!(
            pass.events,
            vec![
                PassEvent::Enable { location: 0, buffer: a.id },
                PassEvent::Enable { location: 2, buffer: b.id },
                PassEvent::Draw { vertices: 1 },
                PassEvent::Disable { location: 2 },
                PassEvent::Disable { location: 0 },
            ]
        );
    }

    #[test]
    fn scope_disables_without_draw() {
        let gpu = RecordingBackend::new();
        let a = gpu.create_vertex_buffer("a", &[0.0; 3]);
        let mut pass = RecordingPass::default();

        drop({
            let mut scope = AttributeScope::<RecordingBackend>::new(&mut pass);
            scope.enable(1, &a);
            scope
        });

        assert_eq!(pass.events.last(), Some(&PassEvent::Disable { location: 1 }));
    }
}
