use crate::error::ShaderError;
use crate::render::{DrawPass, GraphicsBackend};
use crate::shader::ShaderProgram;

use super::Shape;

/// Ordered collection of shapes drawn as one scene.
///
/// Members are owned exclusively and visited in insertion order. Dropping
/// the composition drops every member and with it every GPU buffer.
pub struct Composition<B: GraphicsBackend> {
    shapes: Vec<Box<dyn Shape<B>>>,
}

impl<B: GraphicsBackend> Composition<B> {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn add(&mut self, shape: impl Shape<B> + 'static) {
        self.shapes.push(Box::new(shape));
    }

    pub fn add_boxed(&mut self, shape: Box<dyn Shape<B>>) {
        self.shapes.push(shape);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Shape<B>> {
        self.shapes.iter().map(|s| s.as_ref())
    }

    /// Largest per-draw vertex count among the members, `0` when empty.
    pub fn max_vertex_count(&self) -> u32 {
        self.shapes.iter().map(|s| s.vertex_count()).max().unwrap_or(0)
    }

    /// Initializes rotation on every rotatable member.
    ///
    /// Stops at the first failure; members before it stay initialized.
    pub fn init_rotation(&mut self, gpu: &B, program: &ShaderProgram<B>) -> Result<(), ShaderError> {
        for shape in self.shapes.iter_mut() {
            if let Some(r) = shape.as_rotatable_mut() {
                r.init_rotation(gpu, program)?;
            }
        }
        Ok(())
    }

    /// Advances rotation by one step on every rotatable member.
    pub fn apply_rotation(&mut self, gpu: &B) {
        for shape in self.shapes.iter_mut() {
            if let Some(r) = shape.as_rotatable_mut() {
                r.apply_rotation(gpu);
            }
        }
    }

    pub fn draw_composition(&self, program: &ShaderProgram<B>, pass: &mut dyn DrawPass<B>) {
        for shape in &self.shapes {
            shape.draw(program, pass);
        }
    }
}

impl<B: GraphicsBackend> Default for Composition<B> {
    fn default() -> Self {
        Self::new()
    }
}
